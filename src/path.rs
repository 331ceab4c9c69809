use crate::cell::Cell;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use itertools::Itertools;
use log::warn;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Ordered cells from start to goal inclusive. Empty when no path was found.
pub type Path = Vec<Cell>;

/// Records for each discovered cell the cell it was reached from. Iteration follows discovery
/// order. The start cell of a run never has an entry.
#[derive(Clone, Debug, Default)]
pub struct PredecessorMap {
    parents: FxIndexMap<Cell, Cell>,
}

impl PredecessorMap {
    pub fn new() -> PredecessorMap {
        PredecessorMap::default()
    }

    /// Sets the predecessor of `cell`, returning the one it replaces.
    pub fn record(&mut self, cell: Cell, predecessor: Cell) -> Option<Cell> {
        self.parents.insert(cell, predecessor)
    }

    pub fn get(&self, cell: &Cell) -> Option<Cell> {
        self.parents.get(cell).copied()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.parents.contains_key(cell)
    }

    pub fn clear(&mut self) {
        self.parents.clear();
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// `(cell, predecessor)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.parents.iter().map(|(c, p)| (*c, *p))
    }
}

/// Walks the predecessors back from `goal` until a cell without predecessor (the start) is
/// reached and returns the cells in start to goal order. Returns an empty path if `goal` has no
/// predecessor, which means it was never reached.
pub fn reconstruct(predecessors: &PredecessorMap, goal: Cell) -> Path {
    if !predecessors.contains(&goal) {
        return Vec::new();
    }
    let mut path: Path = std::iter::successors(Some(goal), |c| predecessors.get(c))
        .take(predecessors.len() + 2)
        .collect();
    if path.len() > predecessors.len() + 1 {
        warn!("Predecessors of {} form a cycle, discarding path", goal);
        return Vec::new();
    }
    path.reverse();
    path
}

/// Number of moves along a path.
pub fn path_steps(path: &[Cell]) -> usize {
    path.len().saturating_sub(1)
}

/// True if every consecutive pair of cells is one axis-aligned step apart.
pub fn is_contiguous(path: &[Cell]) -> bool {
    path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
}
