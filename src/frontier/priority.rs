use fxhash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cell::Cell;
use crate::frontier::{Entry, Frontier};

struct SmallestCostHolder {
    estimated_cost: u64,
    cost: u32,
    heuristic: u64,
    cell: Cell,
}

impl SmallestCostHolder {
    fn key(&self) -> (u64, u32, u64, usize, usize) {
        (
            self.estimated_cost,
            self.cost,
            self.heuristic,
            self.cell.col,
            self.cell.row,
        )
    }
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest (f, g, h, col, row) first.
        other.key().cmp(&self.key())
    }
}

/// Best-first order on a binary heap. With a goal this is A* using the squared Euclidean
/// distance as heuristic, which overestimates on a unit-cost grid and therefore does not
/// guarantee shortest paths. Without a goal the heuristic is zero and this is uniform-cost
/// search.
///
/// Cells are committed when offered, keeping the heap bounded by the number of free cells.
#[derive(Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<SmallestCostHolder>,
    seen: FxHashSet<Cell>,
    goal: Option<Cell>,
}

impl PriorityFrontier {
    pub fn astar(goal: Cell) -> PriorityFrontier {
        PriorityFrontier {
            goal: Some(goal),
            ..PriorityFrontier::default()
        }
    }

    pub fn uniform_cost() -> PriorityFrontier {
        PriorityFrontier::default()
    }

    /// `h(i, j) = (i - goal_row)^2 + (j - goal_col)^2`, or zero without a goal.
    pub fn heuristic(&self, cell: &Cell) -> u64 {
        self.goal.map_or(0, |goal| cell.squared_distance(&goal))
    }
}

impl Frontier for PriorityFrontier {
    fn offer(&mut self, cell: Cell, cost_so_far: u32) -> bool {
        if !self.seen.insert(cell) {
            return false;
        }
        let h = self.heuristic(&cell);
        self.heap.push(SmallestCostHolder {
            estimated_cost: u64::from(cost_so_far).saturating_add(h),
            cost: cost_so_far,
            heuristic: h,
            cell,
        });
        true
    }

    fn take_next(&mut self) -> Option<Entry> {
        self.heap.pop().map(|SmallestCostHolder { cell, cost, .. }| Entry { cell, cost })
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
