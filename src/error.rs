//! Error types for grid edits and search runs

use thiserror::Error;

use crate::cell::{Cell, CellState};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("cell {cell} is outside the {height}x{width} grid")]
    InvalidCell {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("both a start and a goal cell must be placed before running")]
    NoStartOrGoal,

    #[error("a search run is already in progress")]
    ReentrantRun,

    #[error("the run was started on a {expected:?} grid, stepped with a {found:?} grid")]
    GridMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("grid must be at least 3x3, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("cell {0} is part of the border wall")]
    BorderCell(Cell),

    #[error("cells cannot be painted as {0}")]
    InvalidPaint(CellState),

    #[error("wall density must lie in [0, 1], got {0}")]
    InvalidDensity(f64),

    #[error("invalid grid layout: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
