use core::fmt;

/// A grid coordinate. Rows grow downwards, columns grow to the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Number of unit steps between two cells on a 4-grid.
    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Squared Euclidean distance, without taking the square root. Saturates at [u64::MAX].
    pub fn squared_distance(&self, other: &Cell) -> u64 {
        let dr = self.row.abs_diff(other.row) as u64;
        let dc = self.col.abs_diff(other.col) as u64;
        dr.saturating_mul(dr).saturating_add(dc.saturating_mul(dc))
    }

    /// True if the cells differ by exactly one step along one axis.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Classification of a single cell. `Visited` and `Path` are traversal marks
/// owned by a search run, the rest are set by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    Wall,
    Free,
    Start,
    Goal,
    Visited,
    Path,
}

impl CellState {
    /// Marks which are wiped at the start of every run.
    pub fn is_traversal_mark(self) -> bool {
        matches!(self, CellState::Visited | CellState::Path)
    }

    pub(crate) fn symbol(self) -> char {
        match self {
            CellState::Wall => '#',
            CellState::Free => '.',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Visited => 'o',
            CellState::Path => '*',
        }
    }

    pub(crate) fn from_symbol(c: char) -> Option<CellState> {
        match c {
            '#' => Some(CellState::Wall),
            '.' => Some(CellState::Free),
            'S' => Some(CellState::Start),
            'G' => Some(CellState::Goal),
            'o' => Some(CellState::Visited),
            '*' => Some(CellState::Path),
            _ => None,
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CellState::Wall => "wall",
            CellState::Free => "free",
            CellState::Start => "start",
            CellState::Goal => "goal",
            CellState::Visited => "visited",
            CellState::Path => "path",
        };
        f.write_str(name)
    }
}
