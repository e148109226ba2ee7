//! Maze generation

use rand::Rng;
use tracing::{debug, trace};

use crate::{grid::Grid, Direction, Maze, MazeError};

/// Something that carves passages into a maze
pub trait MazeGenerator {
    /// Carve passages starting from cell `(col, row)`.
    ///
    /// Returns the number of walls that were opened.
    fn generate(&mut self, col: usize, row: usize) -> usize;
}

/// Randomized depth-first (recursive backtracker) generator
///
/// See [Wikipedia](https://en.wikipedia.org/wiki/Maze_generation_algorithm#Randomized_depth-first_search).
/// Cells marked visited before [MazeGenerator::generate] is called are never
/// entered, which keeps pre-opened areas such as the goal out of the walk.
pub struct DepthFirst<'a, R> {
    maze: &'a mut Maze,
    visited: Grid<bool>,
    random: R,
    /// Probability of continuing in the direction the cell was entered from
    straightforward: f64,
}

/// One level of the walk: a cell and the directions not tried yet
struct Frame {
    col: usize,
    row: usize,
    heading: Option<Direction>,
    pending: Vec<Direction>,
}

impl Frame {
    fn new(col: usize, row: usize, heading: Option<Direction>) -> Self {
        Frame {
            col,
            row,
            heading,
            pending: Direction::ALL.to_vec(),
        }
    }
}

impl<'a, R: Rng> DepthFirst<'a, R> {
    pub fn new(maze: &'a mut Maze, random: R) -> Self {
        let visited = Grid::filled(maze.cols(), maze.rows(), false);
        Self {
            maze,
            visited,
            random,
            straightforward: 0.0,
        }
    }

    /// Prefer straight corridors
    ///
    /// With probability `straightforward` the walk keeps its current heading
    /// when that is still an untried option; `0.0` gives uniform turns.
    pub fn with_straightforward(mut self, straightforward: f64) -> Result<Self, MazeError> {
        if !(0.0..=1.0).contains(&straightforward) {
            return Err(MazeError::InvalidStraightforward(straightforward));
        }
        self.straightforward = straightforward;
        Ok(self)
    }

    pub fn is_visited(&self, col: usize, row: usize) -> bool {
        self.visited.get(col, row).copied().unwrap_or(false)
    }

    /// Mark a cell before generation. Cells outside the maze are ignored.
    pub fn set_visited(&mut self, col: usize, row: usize, visited: bool) {
        if let Some(cell) = self.visited.get_mut(col, row) {
            *cell = visited;
        }
    }

    fn visit(&mut self, col: usize, row: usize) {
        self.set_visited(col, row, true);
    }

    /// Take the next direction out of `pending`
    fn draw(
        random: &mut R,
        straightforward: f64,
        pending: &mut Vec<Direction>,
        heading: Option<Direction>,
    ) -> Option<Direction> {
        if pending.is_empty() {
            return None;
        }
        if straightforward > 0.0 {
            if let Some(i) = heading.and_then(|h| pending.iter().position(|d| *d == h)) {
                if random.gen_bool(straightforward) {
                    return Some(pending.remove(i));
                }
            }
        }
        let i = random.gen_range(0..pending.len());
        Some(pending.remove(i))
    }
}

impl<R: Rng> MazeGenerator for DepthFirst<'_, R> {
    /// Walk from `(col, row)`, opening a wall into every unvisited cell.
    ///
    /// Each step fully explores the subtree of the new cell before the
    /// remaining directions of the current cell are tried, exactly like the
    /// recursive formulation. Frames live on the heap, so large mazes do not
    /// exhaust the thread stack.
    fn generate(&mut self, col: usize, row: usize) -> usize {
        if !self.visited.contains(col, row) || self.is_visited(col, row) {
            debug!(col, row, "start cell is outside the maze or already visited");
            return 0;
        }

        let mut carved = 0;
        self.visit(col, row);
        let mut stack = vec![Frame::new(col, row, None)];

        while let Some(frame) = stack.last_mut() {
            let (col, row) = (frame.col, frame.row);
            let next = Self::draw(
                &mut self.random,
                self.straightforward,
                &mut frame.pending,
                frame.heading,
            );
            let Some(direction) = next else {
                stack.pop();
                continue;
            };
            let Some((c, r)) = self.maze.neighbor(col, row, direction) else {
                continue;
            };
            if self.is_visited(c, r) {
                continue;
            }
            if self.maze.unset_wall(col, row, direction).is_ok() {
                trace!(col, row, ?direction, "carve");
                carved += 1;
                self.visit(c, r);
                stack.push(Frame::new(c, r, Some(direction)));
            }
        }

        debug!(carved, "depth-first walk finished");
        carved
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        maze_generator::{DepthFirst, MazeGenerator},
        Direction, GoalMode, Maze, MazeError, WallInit,
    };

    fn generate(cols: usize, rows: usize, seed: u64, straightforward: f64) -> Maze {
        let mut maze = Maze::new(cols, rows, WallInit::Full, GoalMode::Center);
        DepthFirst::new(&mut maze, StdRng::seed_from_u64(seed))
            .with_straightforward(straightforward)
            .unwrap()
            .generate(0, 0);
        maze
    }

    /// Number of cells where the passage does not continue straight on
    fn turns(maze: &Maze) -> usize {
        (0..maze.rows())
            .cartesian_product(0..maze.cols())
            .filter(|&(r, c)| {
                let open = Direction::ALL
                    .iter()
                    .filter(|d| !maze.has_wall(c, r, **d))
                    .collect_vec();
                !(open.len() == 2 && open[0].opposite() == *open[1])
            })
            .count()
    }

    #[test]
    fn generates_spanning_tree() {
        for seed in 0..20 {
            let maze = generate(9, 7, seed, 0.0);
            let graph = maze.passage_graph();
            assert_eq!(graph.edge_count(), 9 * 7 - 1);
            assert_eq!(connected_components(&graph), 1);
            assert!(!is_cyclic_undirected(&graph));
        }
    }

    #[test]
    fn straightforward_keeps_spanning_tree() {
        for straightforward in [0.25, 0.5, 1.0] {
            let graph = generate(12, 12, 3, straightforward).passage_graph();
            assert_eq!(graph.edge_count(), 12 * 12 - 1);
            assert_eq!(connected_components(&graph), 1);
            assert!(!is_cyclic_undirected(&graph));
        }
    }

    #[test]
    fn walls_stay_symmetric() {
        let maze = generate(10, 6, 11, 0.5);
        for (c, r) in (0..10).cartesian_product(0..6) {
            for d in Direction::ALL {
                if let Some((nc, nr)) = maze.neighbor(c, r, d) {
                    assert_eq!(maze.has_wall(c, r, d), maze.has_wall(nc, nr, d.opposite()));
                } else {
                    assert!(maze.has_wall(c, r, d));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        assert_eq!(generate(16, 16, 42, 0.5), generate(16, 16, 42, 0.5));
        assert_eq!(generate(16, 16, 42, 0.0), generate(16, 16, 42, 0.0));
        assert_ne!(generate(16, 16, 42, 0.0), generate(16, 16, 43, 0.0));
    }

    #[test]
    fn straightforward_reduces_turns() {
        let total = |p: f64| (0..10).map(|seed| turns(&generate(16, 16, seed, p))).sum::<usize>();
        assert!(total(1.0) < total(0.0));
    }

    #[test]
    fn small_maze_scenario() {
        for seed in 0..10 {
            let mut maze = Maze::new(4, 4, WallInit::Full, GoalMode::Center);
            maze.unset_wall(0, 3, Direction::N).unwrap();
            let mut gen = DepthFirst::new(&mut maze, StdRng::seed_from_u64(seed));
            // Start cell is reached through the entrance only
            gen.set_visited(0, 3, true);
            assert_eq!(gen.generate(2, 0), 14);

            let graph = maze.passage_graph();
            assert_eq!(graph.edge_count(), 15);
            assert_eq!(connected_components(&graph), 1);
            assert!(!is_cyclic_undirected(&graph));
        }
    }

    #[test]
    fn pre_visited_cells_are_not_entered() {
        let pocket = [(3, 3), (4, 3), (3, 4), (4, 4)];
        for seed in 0..10 {
            let mut maze = Maze::new(8, 8, WallInit::Full, GoalMode::Center);
            let mut gen = DepthFirst::new(&mut maze, StdRng::seed_from_u64(seed));
            for (c, r) in pocket {
                gen.set_visited(c, r, true);
            }
            assert_eq!(gen.generate(0, 0), 8 * 8 - 4 - 1);

            for (c, r) in pocket {
                assert!(Direction::ALL.iter().all(|d| maze.has_wall(c, r, *d)));
            }
            assert_eq!(connected_components(&maze.passage_graph()), 5);
        }
    }

    #[test]
    fn invalid_start_carves_nothing() {
        let mut maze = Maze::new(4, 4, WallInit::Full, GoalMode::Center);
        let mut gen = DepthFirst::new(&mut maze, StdRng::seed_from_u64(1));
        assert_eq!(gen.generate(4, 0), 0);
        assert_eq!(gen.generate(0, 17), 0);

        gen.set_visited(1, 1, true);
        assert!(gen.is_visited(1, 1));
        assert!(!gen.is_visited(9, 9));
        assert_eq!(gen.generate(1, 1), 0);
        assert_eq!(maze.passage_graph().edge_count(), 0);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut maze = Maze::new(5, 5, WallInit::Full, GoalMode::Center);
        let mut gen = DepthFirst::new(&mut maze, StdRng::seed_from_u64(5));
        assert_eq!(gen.generate(2, 2), 24);
        assert_eq!(gen.generate(0, 0), 0);
    }

    #[test]
    fn rejects_bad_straightforward() {
        let mut maze = Maze::new(2, 2, WallInit::Full, GoalMode::Center);
        for p in [-0.1, 1.5, f64::NAN] {
            let res = DepthFirst::new(&mut maze, StdRng::seed_from_u64(0)).with_straightforward(p);
            assert!(matches!(res, Err(MazeError::InvalidStraightforward(_))));
        }
    }
}
