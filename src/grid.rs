use crate::cell::{Cell, CellState};
use crate::error::{Error, Result};
use core::fmt;
use itertools::iproduct;
use log::debug;
use petgraph::unionfind::UnionFind;
use rand::prelude::*;
use smallvec::SmallVec;
use std::str::FromStr;

/// A single `(cell, new_state)` notification for the renderer.
pub type CellChange = (Cell, CellState);

/// [Grid] is the fixed-size cell matrix searched by the engine. The outer frame is made of
/// permanent walls, the interior is painted by the user. It holds at most one start and one goal
/// and owns the traversal marks ([CellState::Visited], [CellState::Path]) written during a run.
///
/// Every effective mutation is recorded as a [CellChange] which the caller collects with
/// [drain_changes](Self::drain_changes).
#[derive(Clone, Debug)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<CellState>,
    start: Option<Cell>,
    goal: Option<Cell>,
    changes: Vec<CellChange>,
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::with_dimensions(crate::DEFAULT_HEIGHT, crate::DEFAULT_WIDTH)
    }
}

impl Grid {
    /// Creates a grid bordered by walls with a free interior. Both dimensions include the border
    /// and must be at least 3.
    pub fn new(height: usize, width: usize) -> Result<Grid> {
        if height < 3 || width < 3 {
            return Err(Error::InvalidDimensions { height, width });
        }
        Ok(Grid::with_dimensions(height, width))
    }

    fn with_dimensions(height: usize, width: usize) -> Grid {
        let mut grid = Grid {
            height,
            width,
            cells: vec![CellState::Free; height * width],
            start: None,
            goal: None,
            changes: Vec::new(),
        };
        for (row, col) in iproduct!(0..height, 0..width) {
            let cell = Cell::new(row, col);
            if grid.is_border(&cell) {
                let ix = grid.ix(&cell);
                grid.cells[ix] = CellState::Wall;
            }
        }
        grid
    }

    pub fn height(&self) -> usize {
        self.height
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn start(&self) -> Option<Cell> {
        self.start
    }
    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// True for the permanent frame. Out of bounds cells are not part of the border.
    pub fn is_border(&self, cell: &Cell) -> bool {
        self.in_bounds(cell)
            && (cell.row == 0
                || cell.col == 0
                || cell.row == self.height - 1
                || cell.col == self.width - 1)
    }

    fn ix(&self, cell: &Cell) -> usize {
        cell.row * self.width + cell.col
    }

    fn checked_ix(&self, cell: &Cell) -> Result<usize> {
        if self.in_bounds(cell) {
            Ok(self.ix(cell))
        } else {
            Err(Error::InvalidCell {
                cell: *cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    pub fn state(&self, cell: &Cell) -> Result<CellState> {
        self.checked_ix(cell).map(|ix| self.cells[ix])
    }

    /// Iterates over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        iproduct!(0..self.height, 0..self.width).map(move |(row, col)| {
            let cell = Cell::new(row, col);
            (cell, self.cells[self.ix(&cell)])
        })
    }

    /// Number of cells currently holding the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    fn interior(&self) -> impl Iterator<Item = Cell> {
        iproduct!(1..self.height - 1, 1..self.width - 1).map(|(row, col)| Cell::new(row, col))
    }

    /// Writes a state and records the change if it differs from the current one.
    fn write(&mut self, cell: Cell, state: CellState) {
        let ix = self.ix(&cell);
        if self.cells[ix] != state {
            self.cells[ix] = state;
            self.changes.push((cell, state));
        }
    }

    /// Forgets the start or goal marker if it sits on `cell`.
    fn release_markers(&mut self, cell: Cell) {
        if self.start == Some(cell) {
            self.start = None;
        }
        if self.goal == Some(cell) {
            self.goal = None;
        }
    }

    /// Paints an interior cell as a wall. Painting over the start or goal removes that marker.
    /// Border cells are walls already, so this is a no-op for them.
    pub fn set_wall(&mut self, cell: Cell) -> Result<()> {
        self.checked_ix(&cell)?;
        if self.is_border(&cell) {
            return Ok(());
        }
        self.release_markers(cell);
        self.write(cell, CellState::Wall);
        Ok(())
    }

    /// Paints an interior cell as free. Border cells are left untouched.
    pub fn set_free(&mut self, cell: Cell) -> Result<()> {
        self.checked_ix(&cell)?;
        if self.is_border(&cell) {
            debug!("Ignoring attempt to free border cell {}", cell);
            return Ok(());
        }
        self.release_markers(cell);
        self.write(cell, CellState::Free);
        Ok(())
    }

    /// Moves the start marker to `cell`; the previous start reverts to free.
    pub fn set_start(&mut self, cell: Cell) -> Result<()> {
        self.place_marker(cell, CellState::Start)
    }

    /// Moves the goal marker to `cell`; the previous goal reverts to free.
    pub fn set_goal(&mut self, cell: Cell) -> Result<()> {
        self.place_marker(cell, CellState::Goal)
    }

    fn place_marker(&mut self, cell: Cell, marker: CellState) -> Result<()> {
        self.checked_ix(&cell)?;
        if self.is_border(&cell) {
            return Err(Error::BorderCell(cell));
        }
        let previous = match marker {
            CellState::Start => self.start,
            _ => self.goal,
        };
        if let Some(previous) = previous.filter(|&p| p != cell) {
            self.write(previous, CellState::Free);
        }
        self.release_markers(cell);
        match marker {
            CellState::Start => self.start = Some(cell),
            _ => self.goal = Some(cell),
        }
        self.write(cell, marker);
        Ok(())
    }

    /// Frees the whole interior and removes both markers.
    pub fn clear(&mut self) {
        for cell in self.interior().collect::<Vec<_>>() {
            self.write(cell, CellState::Free);
        }
        self.start = None;
        self.goal = None;
    }

    /// Generates a random layout. Interior walls and traversal marks are cleared, a missing start
    /// or goal is placed on a random free cell and every other interior cell becomes a wall with
    /// probability `density`. The same seed always yields the same layout.
    pub fn random_fill(&mut self, density: f64, rng_seed: u64) -> Result<()> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::InvalidDensity(density));
        }
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let markers = [self.start, self.goal];
        let interior = self
            .interior()
            .filter(|c| !markers.contains(&Some(*c)))
            .collect::<Vec<_>>();
        for cell in &interior {
            self.write(*cell, CellState::Free);
        }
        if self.start.is_none() {
            if let Some(&cell) = self.free_interior(&interior).choose(&mut rng) {
                self.set_start(cell)?;
            }
        }
        if self.goal.is_none() {
            if let Some(&cell) = self.free_interior(&interior).choose(&mut rng) {
                self.set_goal(cell)?;
            }
        }
        for cell in interior {
            if self.state(&cell)? == CellState::Free && rng.gen_bool(density) {
                self.write(cell, CellState::Wall);
            }
        }
        Ok(())
    }

    fn free_interior(&self, interior: &[Cell]) -> Vec<Cell> {
        interior
            .iter()
            .copied()
            .filter(|c| self.cells[self.ix(c)] == CellState::Free)
            .collect()
    }

    /// The axis-aligned neighbours of `cell` that lie within bounds, ordered up, right, down,
    /// left. Walls are included; filter with [is_traversable](Self::is_traversable).
    pub fn neighbors(&self, cell: &Cell) -> Result<SmallVec<[Cell; 4]>> {
        self.checked_ix(cell)?;
        let mut neighbors = SmallVec::new();
        if cell.row > 0 {
            neighbors.push(Cell::new(cell.row - 1, cell.col));
        }
        if cell.col + 1 < self.width {
            neighbors.push(Cell::new(cell.row, cell.col + 1));
        }
        if cell.row + 1 < self.height {
            neighbors.push(Cell::new(cell.row + 1, cell.col));
        }
        if cell.col > 0 {
            neighbors.push(Cell::new(cell.row, cell.col - 1));
        }
        Ok(neighbors)
    }

    pub fn is_traversable(&self, cell: &Cell) -> bool {
        self.in_bounds(cell)
            && !self.is_border(cell)
            && self.cells[self.ix(cell)] != CellState::Wall
    }

    /// Marks a free cell as visited. Markers, walls and existing marks are kept.
    pub fn mark_visited(&mut self, cell: Cell) -> Result<()> {
        let ix = self.checked_ix(&cell)?;
        if self.cells[ix] == CellState::Free {
            self.write(cell, CellState::Visited);
        }
        Ok(())
    }

    /// Marks a free or visited cell as part of the path. Markers and walls are kept.
    pub fn mark_path(&mut self, cell: Cell) -> Result<()> {
        let ix = self.checked_ix(&cell)?;
        if matches!(self.cells[ix], CellState::Free | CellState::Visited) {
            self.write(cell, CellState::Path);
        }
        Ok(())
    }

    /// Reverts every visited and path cell back to free.
    pub fn reset_traversal_marks(&mut self) {
        for cell in self.interior().collect::<Vec<_>>() {
            if self.cells[self.ix(&cell)].is_traversal_mark() {
                self.write(cell, CellState::Free);
            }
        }
    }

    /// Takes the pending change notifications in the order they happened.
    pub fn drain_changes(&mut self) -> std::vec::Drain<'_, CellChange> {
        self.changes.drain(..)
    }

    /// Puts notifications that were drained but never delivered back in front of the pending
    /// ones.
    pub(crate) fn restore_changes(&mut self, undelivered: impl IntoIterator<Item = CellChange>) {
        self.changes.splice(0..0, undelivered);
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// A copy of the current layout without pending notifications.
    pub fn snapshot(&self) -> Grid {
        Grid {
            height: self.height,
            width: self.width,
            cells: self.cells.clone(),
            start: self.start,
            goal: self.goal,
            changes: Vec::new(),
        }
    }

    /// Generates a [UnionFind] structure linking up 4-connected traversable cells.
    pub fn generate_components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.height * self.width);
        for cell in self.interior().filter(|c| self.is_traversable(c)) {
            let parent_ix = self.ix(&cell);
            [
                Cell::new(cell.row + 1, cell.col),
                Cell::new(cell.row, cell.col + 1),
            ]
            .iter()
            .filter(|n| self.is_traversable(n))
            .for_each(|n| {
                components.union(parent_ix, self.ix(n));
            });
        }
        components
    }

    /// Checks if two traversable cells are on the same connected component.
    pub fn reachable(&self, from: &Cell, to: &Cell) -> bool {
        if !self.is_traversable(from) || !self.is_traversable(to) {
            return false;
        }
        self.generate_components()
            .equiv(self.ix(from), self.ix(to))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line = row.iter().map(|s| s.symbol()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the same alphabet [Display](fmt::Display) produces. Blank lines and surrounding
/// whitespace are ignored, the border must consist of walls.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Grid> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Grid::new(height, width)?;
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(Error::Parse(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    width
                )));
            }
            for (col, c) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                let state = CellState::from_symbol(c)
                    .ok_or_else(|| Error::Parse(format!("unknown symbol '{}' at {}", c, cell)))?;
                if grid.is_border(&cell) {
                    if state != CellState::Wall {
                        return Err(Error::Parse(format!("border cell {} must be a wall", cell)));
                    }
                    continue;
                }
                let occupied = match state {
                    CellState::Start => grid.start.replace(cell),
                    CellState::Goal => grid.goal.replace(cell),
                    _ => None,
                };
                if occupied.is_some() {
                    return Err(Error::Parse(format!("more than one {} marker", state)));
                }
                let ix = grid.ix(&cell);
                grid.cells[ix] = state;
            }
        }
        Ok(grid)
    }
}
