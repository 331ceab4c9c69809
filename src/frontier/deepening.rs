use fxhash::FxHashMap;

use crate::cell::Cell;
use crate::frontier::{Entry, Frontier};

/// Iterative deepening: a depth-first pass that refuses cells deeper than the current cap,
/// repeated with the cap raised by one until the goal is found or the cap would exceed
/// `max_depth`.
///
/// Within a pass a cell is accepted again only if it is reached at a strictly smaller depth than
/// before, which overwrites its predecessor. This keeps the first path found a shortest one.
#[derive(Clone, Debug)]
pub struct DeepeningFrontier {
    stack: Vec<Entry>,
    best_depth: FxHashMap<Cell, u32>,
    depth_cap: u32,
    max_depth: u32,
    cut_off: bool,
}

impl DeepeningFrontier {
    pub fn new(max_depth: u32) -> DeepeningFrontier {
        DeepeningFrontier {
            stack: Vec::new(),
            best_depth: FxHashMap::default(),
            depth_cap: 0,
            max_depth,
            cut_off: false,
        }
    }

    /// The cap of the pass in progress.
    pub fn depth_cap(&self) -> u32 {
        self.depth_cap
    }
}

impl Frontier for DeepeningFrontier {
    fn offer(&mut self, cell: Cell, cost_so_far: u32) -> bool {
        match self.best_depth.get(&cell) {
            Some(&depth) if depth <= cost_so_far => return false,
            _ => {}
        }
        if cost_so_far > self.depth_cap {
            self.cut_off = true;
            return false;
        }
        self.best_depth.insert(cell, cost_so_far);
        self.stack.push(Entry {
            cell,
            cost: cost_so_far,
        });
        true
    }

    fn take_next(&mut self) -> Option<Entry> {
        while let Some(entry) = self.stack.pop() {
            // The cell was re-accepted at a smaller depth after this entry was pushed.
            if self.best_depth.get(&entry.cell).is_some_and(|&d| d < entry.cost) {
                continue;
            }
            return Some(entry);
        }
        None
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn reverse_neighbors(&self) -> bool {
        true
    }

    /// Starts the next pass unless the last one explored everything reachable or the cap is
    /// already at `max_depth`.
    fn next_pass(&mut self) -> bool {
        if !self.cut_off || self.depth_cap >= self.max_depth {
            return false;
        }
        self.depth_cap += 1;
        self.cut_off = false;
        self.stack.clear();
        self.best_depth.clear();
        true
    }
}
