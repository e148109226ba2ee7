//! OSHWDEM contest layout
//!
//! The robot enters at the bottom left cell, heading north, and looks for a
//! 2x2 open goal pocket either in the middle of the maze or in its upper
//! right corner.

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    maze_generator::{DepthFirst, MazeGenerator},
    Direction, GoalMode, Maze, MazeError, WallInit,
};

/// Smallest side that fits the entrance, the goal pocket and a path around it
pub const MIN_SIZE: usize = 4;

/// Placement of the fixed parts of a contest maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestLayout {
    cols: usize,
    rows: usize,
    goal: GoalMode,
}

impl ContestLayout {
    /// Returns error if either side is shorter than [MIN_SIZE].
    pub fn new(cols: usize, rows: usize, goal: GoalMode) -> Result<Self, MazeError> {
        if cols < MIN_SIZE || rows < MIN_SIZE {
            return Err(MazeError::TooSmall {
                cols,
                rows,
                min: MIN_SIZE,
            });
        }
        Ok(Self { cols, rows, goal })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn goal(&self) -> GoalMode {
        self.goal
    }

    /// Bottom left cell, where the robot starts
    pub fn start_cell(&self) -> (usize, usize) {
        (0, self.rows - 1)
    }

    /// Upper left cell of the goal pocket
    ///
    /// With an odd number of columns the centered pocket cannot be exactly
    /// in the middle and leans one cell east.
    fn goal_origin(&self) -> (usize, usize) {
        match self.goal {
            GoalMode::Center if self.cols % 2 == 0 => (self.cols / 2 - 1, self.rows / 2 - 1),
            GoalMode::Center => (self.cols / 2, self.rows / 2 - 1),
            GoalMode::Corner => (self.cols - 2, 0),
        }
    }

    /// The four cells of the goal pocket
    pub fn goal_cells(&self) -> [(usize, usize); 4] {
        let (c, r) = self.goal_origin();
        [(c, r), (c + 1, r), (c, r + 1), (c + 1, r + 1)]
    }

    pub fn is_goal(&self, col: usize, row: usize) -> bool {
        self.goal_cells().contains(&(col, row))
    }

    /// Cell where the depth-first walk begins
    ///
    /// Next to the top right corner, unless the goal pocket is there; then
    /// the cell the entrance leads into.
    pub fn generation_start(&self) -> (usize, usize) {
        let corner = (self.cols - 2, 0);
        if self.is_goal(corner.0, corner.1) {
            (0, self.rows - 2)
        } else {
            corner
        }
    }

    /// Open the north wall of the start cell
    pub fn open_entrance(&self, maze: &mut Maze) -> Result<(), MazeError> {
        let (c, r) = self.start_cell();
        maze.unset_wall(c, r, Direction::N)
    }

    /// Open the four walls inside the goal pocket
    pub fn open_goal(&self, maze: &mut Maze) -> Result<(), MazeError> {
        let (c, r) = self.goal_origin();
        maze.unset_wall(c, r, Direction::S)?;
        maze.unset_wall(c, r, Direction::E)?;
        maze.unset_wall(c + 1, r, Direction::S)?;
        maze.unset_wall(c, r + 1, Direction::E)
    }

    /// Keep the walk out of the goal pocket and the start cell
    pub fn seed_visited<R: Rng>(&self, generator: &mut DepthFirst<'_, R>) {
        let (c, r) = self.start_cell();
        generator.set_visited(c, r, true);
        for (c, r) in self.goal_cells() {
            generator.set_visited(c, r, true);
        }
    }

    /// Walls that could serve as the single way into the goal pocket
    ///
    /// Each entry is a pocket cell and the direction of a neighbour outside
    /// the pocket.
    pub fn goal_doors(&self, maze: &Maze) -> Vec<(usize, usize, Direction)> {
        self.goal_cells()
            .into_iter()
            .cartesian_product(Direction::ALL)
            .filter_map(|((c, r), d)| {
                let (nc, nr) = maze.neighbor(c, r, d)?;
                (!self.is_goal(nc, nr) && (nc, nr) != self.start_cell()).then_some((c, r, d))
            })
            .collect()
    }

    /// Generate a complete contest maze
    ///
    /// ## Arguments
    /// - `random`: Source of randomness for the walk and the goal door.
    /// - `straightforward`: Probability of keeping the heading, `0.0..=1.0`.
    pub fn build<R: Rng>(&self, random: &mut R, straightforward: f64) -> Result<Maze, MazeError> {
        let mut maze = Maze::new(self.cols, self.rows, WallInit::Full, self.goal);
        self.open_entrance(&mut maze)?;
        self.open_goal(&mut maze)?;

        let mut generator =
            DepthFirst::new(&mut maze, &mut *random).with_straightforward(straightforward)?;
        self.seed_visited(&mut generator);
        let (c, r) = self.generation_start();
        let carved = generator.generate(c, r);
        debug!(carved, start_col = c, start_row = r, "passages carved");

        let doors = self.goal_doors(&maze);
        if let Some(&(c, r, d)) = doors.choose(random) {
            debug!(col = c, row = r, direction = ?d, "goal door");
            maze.unset_wall(c, r, d)?;
        }
        Ok(maze)
    }
}
