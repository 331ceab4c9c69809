//! Exploration orders. Each [Frontier] decides which discovered cell is expanded next and which
//! offers are suppressed as duplicates.
use crate::cell::Cell;
use crate::SearchConfig;
use core::fmt;
use std::str::FromStr;

pub mod deepening;
pub mod fifo;
pub mod lifo;
pub mod priority;

pub use deepening::DeepeningFrontier;
pub use fifo::FifoFrontier;
pub use lifo::LifoFrontier;
pub use priority::PriorityFrontier;

/// A discovered cell together with the number of steps taken from the start to reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub cell: Cell,
    pub cost: u32,
}

pub trait Frontier {
    /// Offers a cell reached after `cost_so_far` steps. Returns false if the strategy suppresses
    /// it, in which case the caller must not record a predecessor for it.
    fn offer(&mut self, cell: Cell, cost_so_far: u32) -> bool;

    fn take_next(&mut self) -> Option<Entry>;

    fn is_empty(&self) -> bool;

    /// Stack based strategies pop in reverse insertion order; offering the neighbours reversed
    /// makes them expand up, right, down, left.
    fn reverse_neighbors(&self) -> bool {
        false
    }

    /// Asked once the frontier has run dry. Returns true if the strategy wants another pass over
    /// the grid, after which the caller reseeds the start cell.
    fn next_pass(&mut self) -> bool {
        false
    }
}

/// The selectable search algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    Bfs,
    Dfs,
    AStar,
    Ucs,
    IterativeDeepening,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::AStar,
        Algorithm::Ucs,
        Algorithm::IterativeDeepening,
    ];

    /// Builds a fresh frontier for a run towards `goal`. `cells` is the grid size, used as the
    /// deepening limit when none is configured.
    pub fn frontier(&self, goal: Cell, cells: usize, config: &SearchConfig) -> Box<dyn Frontier> {
        match self {
            Algorithm::Bfs => Box::new(FifoFrontier::new()),
            Algorithm::Dfs => Box::new(LifoFrontier::new()),
            Algorithm::AStar => Box::new(PriorityFrontier::astar(goal)),
            Algorithm::Ucs => Box::new(PriorityFrontier::uniform_cost()),
            Algorithm::IterativeDeepening => {
                let max_depth = config
                    .max_depth
                    .unwrap_or_else(|| u32::try_from(cells).unwrap_or(u32::MAX));
                Box::new(DeepeningFrontier::new(max_depth))
            }
        }
    }

    /// The short label shown in the algorithm selector.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::AStar => "A*",
            Algorithm::Ucs => "UCS",
            Algorithm::IterativeDeepening => "ID",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Algorithm, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::Parse(format!("unknown algorithm '{}'", s)))
    }
}
