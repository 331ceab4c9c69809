//! # grid_search
//!
//! The search engine behind an interactive grid pathfinding visualizer. A [Grid] bordered by
//! permanent walls holds user-painted walls, one start and one goal. A [SearchEngine] explores it
//! with one of five strategies:
//! [breadth-first](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [depth-first](https://en.wikipedia.org/wiki/Depth-first_search),
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm),
//! [uniform-cost](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm#Practical_optimizations_and_infinite_graphs)
//! and [iterative deepening](https://en.wikipedia.org/wiki/Iterative_deepening_depth-first_search).
//!
//! Runs advance one expansion at a time and report every cell state change as an [Event] so a
//! presentation layer can animate them at its own pace. The [Visualizer] bundles grid, engine
//! and settings behind the interface such a layer drives.
//!
//! Note that the A* heuristic is the squared Euclidean distance, which is not admissible on a
//! unit-cost grid: A* paths are not guaranteed to be shortest.
mod cell;
mod engine;
mod error;
pub mod frontier;
mod grid;
pub mod path;
mod visualizer;

pub use crate::cell::{Cell, CellState};
pub use crate::engine::{EngineState, Event, SearchConfig, SearchEngine, SearchResult};
pub use crate::error::{Error, Result};
pub use crate::frontier::{Algorithm, Frontier};
pub use crate::grid::{CellChange, Grid};
pub use crate::path::{reconstruct, Path, PredecessorMap};
pub use crate::visualizer::{Events, Visualizer};

/// Rows of the default grid, border included.
pub const DEFAULT_HEIGHT: usize = 20;
/// Columns of the default grid, border included.
pub const DEFAULT_WIDTH: usize = 30;
/// Wall probability used by the random pattern button.
pub const DEFAULT_DENSITY: f64 = 0.1;
