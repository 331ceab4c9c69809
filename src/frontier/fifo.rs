use std::collections::VecDeque;

use fxhash::FxHashSet;

use crate::cell::Cell;
use crate::frontier::{Entry, Frontier};

/// Breadth-first order. Cells are committed when offered, so each one is queued at most once
/// per run and the first discovery is along a shortest path.
#[derive(Clone, Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<Entry>,
    seen: FxHashSet<Cell>,
}

impl FifoFrontier {
    pub fn new() -> FifoFrontier {
        FifoFrontier::default()
    }
}

impl Frontier for FifoFrontier {
    fn offer(&mut self, cell: Cell, cost_so_far: u32) -> bool {
        if !self.seen.insert(cell) {
            return false;
        }
        self.queue.push_back(Entry {
            cell,
            cost: cost_so_far,
        });
        true
    }

    fn take_next(&mut self) -> Option<Entry> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
