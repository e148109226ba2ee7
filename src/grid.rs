//! Rectangular cell storage and wall masks

/// Compass direction of a wall, or of a move between cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    /// All directions, clockwise from north
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    /// Direction pointing the other way
    pub fn opposite(self) -> Self {
        match self {
            Direction::N => Direction::S,
            Direction::E => Direction::W,
            Direction::S => Direction::N,
            Direction::W => Direction::E,
        }
    }

    /// Unit step `(dc, dr)`; rows grow southwards.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::N => (0, -1),
            Direction::E => (1, 0),
            Direction::S => (0, 1),
            Direction::W => (-1, 0),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Direction::N => 0b0001,
            Direction::E => 0b0010,
            Direction::S => 0b0100,
            Direction::W => 0b1000,
        }
    }
}

/// Four-bit wall mask of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Walls(u8);

impl Walls {
    /// Every wall standing
    pub const FULL: Walls = Walls(0b1111);
    /// No walls at all
    pub const NONE: Walls = Walls(0);

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }
}

/// Row-major `cols × rows` storage addressed by `(col, row)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cols: usize,
    rows: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid where every cell starts as `value`
    pub fn filled(cols: usize, rows: usize, value: T) -> Self {
        Self {
            cols,
            rows,
            cells: vec![value; cols * rows],
        }
    }
}

impl<T> Grid<T> {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&T> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        self.index(col, row).map(|i| &mut self.cells[i])
    }

    /// Cell one step away in `direction`, if it lies inside the grid.
    pub fn step(&self, col: usize, row: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dc, dr) = direction.offset();
        let c = col.checked_add_signed(dc)?;
        let r = row.checked_add_signed(dr)?;
        self.contains(c, r).then_some((c, r))
    }

    /// Coordinates of every cell, row by row
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (c, r)))
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        self.contains(col, row).then(|| row * self.cols + col)
    }
}
