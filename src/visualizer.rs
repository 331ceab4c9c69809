use std::time::Duration;

use log::info;

use crate::cell::{Cell, CellState};
use crate::engine::{EngineState, Event, SearchConfig, SearchEngine, SearchResult};
use crate::error::{Error, Result};
use crate::frontier::Algorithm;
use crate::grid::Grid;
use crate::path::Path;

/// The interface a presentation layer drives: grid edits, algorithm selection and runs. It holds
/// no reference to any UI; the caller polls [next_event](Self::next_event) and renders what comes
/// out, waiting [pacing](Self::pacing) between events if it wants to animate.
pub struct Visualizer {
    grid: Grid,
    engine: SearchEngine,
    algorithm: Algorithm,
    pacing: Duration,
}

impl Default for Visualizer {
    fn default() -> Visualizer {
        Visualizer::new(Grid::default())
    }
}

impl Visualizer {
    pub fn new(grid: Grid) -> Visualizer {
        Visualizer {
            grid,
            engine: SearchEngine::default(),
            algorithm: Algorithm::default(),
            pacing: Duration::ZERO,
        }
    }

    pub fn with_config(grid: Grid, config: SearchConfig) -> Visualizer {
        Visualizer {
            engine: SearchEngine::new(config),
            ..Visualizer::new(grid)
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }
    pub fn state(&self) -> EngineState {
        self.engine.state()
    }
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Delay the presentation layer should leave between two events. The core never waits.
    pub fn set_pacing(&mut self, pacing: Duration) {
        self.pacing = pacing;
    }

    /// Applies a user edit. Only walls, free cells and the two markers can be painted.
    pub fn paint(&mut self, cell: Cell, state: CellState) -> Result<()> {
        match state {
            CellState::Wall => self.grid.set_wall(cell),
            CellState::Free => self.grid.set_free(cell),
            CellState::Start => self.grid.set_start(cell),
            CellState::Goal => self.grid.set_goal(cell),
            CellState::Visited | CellState::Path => Err(Error::InvalidPaint(state)),
        }
    }

    /// Starts the selected algorithm. Consume the run with [next_event](Self::next_event) or
    /// [events](Self::events).
    pub fn run(&mut self) -> Result<()> {
        self.engine.run(&mut self.grid, self.algorithm)
    }

    pub fn next_event(&mut self) -> Result<Option<Event>> {
        self.engine.step(&mut self.grid)
    }

    /// Iterates over the remaining events of the current run.
    pub fn events(&mut self) -> Events<'_> {
        Events { visualizer: self }
    }

    /// Runs the selected algorithm to the end and returns its outcome.
    pub fn run_to_completion(&mut self) -> Result<(SearchResult, Path)> {
        self.engine.run_to_completion(&mut self.grid, self.algorithm)
    }

    /// Stops a run in progress. Undelivered cell changes move to [drain_changes](Self::drain_changes).
    pub fn cancel(&mut self) {
        self.engine.cancel(&mut self.grid);
    }

    /// Fills the grid from a fresh random seed, which is returned so the layout can be recreated.
    pub fn random_fill(&mut self, density: f64) -> Result<u64> {
        let seed = rand::random::<u64>();
        info!("Random fill with density {} and seed {}", density, seed);
        self.random_fill_seeded(density, seed)?;
        Ok(seed)
    }

    pub fn random_fill_seeded(&mut self, density: f64, seed: u64) -> Result<()> {
        self.grid.random_fill(density, seed)
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Reverts visited and path marks to free, keeping walls and markers. Cancels a run in
    /// progress.
    pub fn undo(&mut self) {
        if self.engine.is_running() {
            self.engine.cancel(&mut self.grid);
        }
        self.grid.reset_traversal_marks();
    }

    /// Cell changes caused by edits outside a run. During a run they are part of the event
    /// stream instead.
    pub fn drain_changes(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.grid.drain_changes().map(Event::from)
    }
}

/// Borrowing iterator over the events of a run, see [Visualizer::events].
pub struct Events<'a> {
    visualizer: &'a mut Visualizer,
}

impl Iterator for Events<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Result<Event>> {
        self.visualizer.next_event().transpose()
    }
}
