use fxhash::FxHashSet;

use crate::cell::Cell;
use crate::frontier::{Entry, Frontier};

/// Depth-first order on a plain stack. An ever-queued set keeps every cell on the stack at most
/// once, so the stack never grows beyond the number of free cells and predecessors are never
/// overwritten.
#[derive(Clone, Debug, Default)]
pub struct LifoFrontier {
    stack: Vec<Entry>,
    queued: FxHashSet<Cell>,
}

impl LifoFrontier {
    pub fn new() -> LifoFrontier {
        LifoFrontier::default()
    }
}

impl Frontier for LifoFrontier {
    fn offer(&mut self, cell: Cell, cost_so_far: u32) -> bool {
        if !self.queued.insert(cell) {
            return false;
        }
        self.stack.push(Entry {
            cell,
            cost: cost_so_far,
        });
        true
    }

    fn take_next(&mut self) -> Option<Entry> {
        self.stack.pop()
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn reverse_neighbors(&self) -> bool {
        true
    }
}
