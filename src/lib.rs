//! Generate perfect mazes for the OSHWDEM robot contest
//!
//! # Examples
//! ## Contest maze with the goal in the center
//! ```
//! use oshwdem_maze::{layout::ContestLayout, GoalMode};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let layout = ContestLayout::new(16, 16, GoalMode::Center).unwrap();
//! let mut rng = StdRng::seed_from_u64(2015);
//! let maze = layout.build(&mut rng, 0.5).unwrap();
//! println!("{maze}");
//! assert_eq!(maze.passage_graph().edge_count(), 16 * 16);
//! ```
//!
//! ## Plain perfect maze
//! ```
//! use oshwdem_maze::{
//!     maze_generator::{DepthFirst, MazeGenerator},
//!     GoalMode, Maze, WallInit,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut maze = Maze::new(5, 4, WallInit::Full, GoalMode::Center);
//! let carved = DepthFirst::new(&mut maze, StdRng::seed_from_u64(7)).generate(0, 0);
//! assert_eq!(carved, 5 * 4 - 1);
//! print!("{maze}");
//! ```

use std::fmt;

use itertools::Itertools;
use petgraph::{Graph, Undirected};
use thiserror::Error;

pub mod grid;
pub mod layout;
pub mod maze_generator;

pub use grid::Direction;
use grid::{Grid, Walls};

/// Errors raised by maze construction and wall editing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MazeError {
    /// Cell is not inside the grid
    #[error("cell ({col}, {row}) is outside the {cols}x{rows} grid")]
    OutOfBounds {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    },
    /// Wall faces the outside of the grid, there is no neighbour to open into
    #[error("{direction:?} wall of cell ({col}, {row}) is an exterior wall")]
    ExteriorWall {
        col: usize,
        row: usize,
        direction: Direction,
    },
    /// Straightforward probability outside `[0, 1]`
    #[error("straightforward probability must be within 0.0..=1.0, got {0}")]
    InvalidStraightforward(f64),
    /// Grid cannot hold the contest layout
    #[error("maze must be at least {min}x{min} cells, got {cols}x{rows}")]
    TooSmall { cols: usize, rows: usize, min: usize },
}

/// Initial wall state of a new maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallInit {
    /// Every wall of every cell is standing
    Full,
    /// Only the outer border is walled
    Empty,
}

/// Where the 2x2 goal pocket is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalMode {
    /// Middle of the maze
    #[default]
    Center,
    /// Upper right corner
    Corner,
}

/// Rectangular maze of walled cells
///
/// Walls are kept symmetric: opening a wall from one side opens it from the
/// neighbouring cell as well.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    walls: Grid<Walls>,
    goal: GoalMode,
}

impl Maze {
    /// Create a new maze
    ///
    /// ## Arguments
    /// - `cols`: Number of cells from west to east.
    /// - `rows`: Number of cells from north to south.
    /// - `init`: Initial wall state.
    /// - `goal`: Goal placement recorded for the caller's layout.
    pub fn new(cols: usize, rows: usize, init: WallInit, goal: GoalMode) -> Self {
        let mut walls = Grid::filled(cols, rows, Walls::FULL);
        if init == WallInit::Empty {
            for (c, r) in walls.positions().collect_vec() {
                let mut cell = Walls::NONE;
                for d in Direction::ALL {
                    if walls.step(c, r, d).is_none() {
                        cell.insert(d);
                    }
                }
                if let Some(w) = walls.get_mut(c, r) {
                    *w = cell;
                }
            }
        }
        Maze { walls, goal }
    }

    pub fn cols(&self) -> usize {
        self.walls.cols()
    }

    pub fn rows(&self) -> usize {
        self.walls.rows()
    }

    pub fn goal(&self) -> GoalMode {
        self.goal
    }

    /// Neighbouring cell in `direction`, if it is inside the maze
    pub fn neighbor(&self, col: usize, row: usize, direction: Direction) -> Option<(usize, usize)> {
        self.walls.step(col, row, direction)
    }

    /// Whether the wall on side `direction` of the cell is standing.
    ///
    /// Cells outside the maze are solid and always report a wall.
    pub fn has_wall(&self, col: usize, row: usize, direction: Direction) -> bool {
        self.walls
            .get(col, row)
            .map_or(true, |walls| walls.contains(direction))
    }

    /// Open the wall between a cell and its neighbour in `direction`.
    ///
    /// Both sides of the wall are cleared. Exterior walls cannot be opened:
    /// the call is rejected and the maze is left untouched, as it is for a
    /// cell outside the grid.
    pub fn unset_wall(&mut self, col: usize, row: usize, direction: Direction) -> Result<(), MazeError> {
        if !self.walls.contains(col, row) {
            return Err(MazeError::OutOfBounds {
                col,
                row,
                cols: self.cols(),
                rows: self.rows(),
            });
        }
        let (c, r) = self
            .neighbor(col, row, direction)
            .ok_or(MazeError::ExteriorWall {
                col,
                row,
                direction,
            })?;

        if let Some(walls) = self.walls.get_mut(col, row) {
            walls.remove(direction);
        }
        if let Some(walls) = self.walls.get_mut(c, r) {
            walls.remove(direction.opposite());
        }
        Ok(())
    }

    /// Graph of the open passages
    ///
    /// Node weights are the `(col, row)` coordinates, node index is
    /// `row * cols + col`. Every open internal wall is one edge.
    pub fn passage_graph(&self) -> Graph<(usize, usize), (), Undirected> {
        let mut graph = Graph::with_capacity(self.cols() * self.rows(), 2 * self.cols() * self.rows());
        let nodes = self
            .walls
            .positions()
            .map(|pos| graph.add_node(pos))
            .collect_vec();

        for (c, r) in self.walls.positions() {
            // East and south only, the graph is undirected
            for d in [Direction::E, Direction::S] {
                if self.has_wall(c, r, d) {
                    continue;
                }
                if let Some((nc, nr)) = self.neighbor(c, r, d) {
                    graph.add_edge(
                        nodes[r * self.cols() + c],
                        nodes[nr * self.cols() + nc],
                        (),
                    );
                }
            }
        }
        graph
    }
}

impl fmt::Display for Maze {
    /// Draw the maze with `+` corners, `---` and `|` walls.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cols, rows) = (self.cols(), self.rows());
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        let horizontal = |row: usize, direction: Direction| {
            (0..cols)
                .map(|c| {
                    if self.has_wall(c, row, direction) {
                        "+---"
                    } else {
                        "+   "
                    }
                })
                .join("")
        };

        for r in 0..rows {
            writeln!(f, "{}+", horizontal(r, Direction::N))?;
            let cells = (0..cols)
                .map(|c| {
                    if self.has_wall(c, r, Direction::W) {
                        "|   "
                    } else {
                        "    "
                    }
                })
                .join("");
            let east = if self.has_wall(cols - 1, r, Direction::E) {
                "|"
            } else {
                " "
            };
            writeln!(f, "{cells}{east}")?;
        }
        writeln!(f, "{}+", horizontal(rows - 1, Direction::S))
    }
}
