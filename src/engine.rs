use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::cell::{Cell, CellState};
use crate::error::{Error, Result};
use crate::frontier::{Algorithm, Frontier};
use crate::grid::{CellChange, Grid};
use crate::path::{reconstruct, Path, PredecessorMap};

/// Terminal outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchResult {
    Found(Cell),
    /// The frontier emptied without reaching the goal.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Notifications for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    CellStateChanged { cell: Cell, state: CellState },
    RunCompleted { result: SearchResult, path: Path },
}

impl From<CellChange> for Event {
    fn from((cell, state): CellChange) -> Event {
        Event::CellStateChanged { cell, state }
    }
}

/// Tunables shared by all runs of an engine.
#[derive(Clone, Debug, Default)]
pub struct SearchConfig {
    /// Deepest cap iterative deepening tries. Defaults to the number of cells in the grid, which
    /// bounds the length of any simple path.
    pub max_depth: Option<u32>,
}

struct ActiveRun {
    algorithm: Algorithm,
    frontier: Box<dyn Frontier>,
    /// Layout frozen at [SearchEngine::run]; edits to the live grid do not affect the run.
    snapshot: Grid,
    start: Cell,
    goal: Cell,
}

enum Outcome {
    Continue,
    Finished(SearchResult, Path),
}

/// Runs one search at a time over a [Grid], one expansion per [step](Self::step).
///
/// The engine never sleeps. Every call to [step](Self::step) yields a single [Event]; a caller
/// that wants to animate the search waits between calls.
#[derive(Default)]
pub struct SearchEngine {
    pub config: SearchConfig,
    state: EngineState,
    active: Option<ActiveRun>,
    predecessors: PredecessorMap,
    pending: VecDeque<Event>,
    expansions: usize,
    passes: u32,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> SearchEngine {
        SearchEngine {
            config,
            ..SearchEngine::default()
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Predecessors recorded by the current or last run.
    pub fn predecessors(&self) -> &PredecessorMap {
        &self.predecessors
    }

    /// Cells expanded by the current or last run, the start included. Deepening passes add up.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Deepening passes started after the first one.
    pub fn restarts(&self) -> u32 {
        self.passes
    }

    /// Starts a run from the grid's start towards its goal. Clears the traversal marks on `grid`
    /// and the predecessors of any previous run.
    pub fn run(&mut self, grid: &mut Grid, algorithm: Algorithm) -> Result<()> {
        if self.is_running() {
            return Err(Error::ReentrantRun);
        }
        let (start, goal) = match (grid.start(), grid.goal()) {
            (Some(start), Some(goal)) => (start, goal),
            _ => return Err(Error::NoStartOrGoal),
        };
        self.return_undelivered(grid);
        grid.reset_traversal_marks();
        self.predecessors.clear();
        self.expansions = 0;
        self.passes = 0;

        let cells = grid.height() * grid.width();
        let mut frontier = algorithm.frontier(goal, cells, &self.config);
        frontier.offer(start, 0);
        info!("Running {} from {} to {}", algorithm, start, goal);
        self.active = Some(ActiveRun {
            algorithm,
            frontier,
            snapshot: grid.snapshot(),
            start,
            goal,
        });
        self.state = EngineState::Running;
        Ok(())
    }

    /// Abandons a run in progress. Marks already written to the grid stay until the next run.
    /// Cell changes not yet taken with [step](Self::step) go back to `grid`'s notifications.
    pub fn cancel(&mut self, grid: &mut Grid) {
        if self.active.take().is_some() {
            info!("Run cancelled after {} expansions", self.expansions);
        }
        self.return_undelivered(grid);
        self.state = EngineState::Idle;
    }

    /// Hands cell changes still queued for delivery back to `grid` and drops the rest.
    fn return_undelivered(&mut self, grid: &mut Grid) {
        grid.restore_changes(self.pending.drain(..).filter_map(|event| match event {
            Event::CellStateChanged { cell, state } => Some((cell, state)),
            Event::RunCompleted { .. } => None,
        }));
    }

    /// Advances the run until the next event. Cell changes come first, in the order they
    /// happened, followed by a single [Event::RunCompleted]. Returns [None] when idle or once the
    /// terminal event has been taken.
    ///
    /// `grid` must be the grid the run was started on. A grid of other dimensions is rejected
    /// with [Error::GridMismatch]. Any other error ends the run and leaves the engine idle.
    pub fn step(&mut self, grid: &mut Grid) -> Result<Option<Event>> {
        loop {
            if let Some(active) = &self.active {
                let expected = (active.snapshot.height(), active.snapshot.width());
                let found = (grid.height(), grid.width());
                if expected != found {
                    return Err(Error::GridMismatch { expected, found });
                }
            }
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            if !self.is_running() {
                return Ok(None);
            }
            let outcome = self.advance(grid);
            self.pending.extend(grid.drain_changes().map(Event::from));
            match outcome {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Finished(result, path)) => self.finish(result, path),
                Err(err) => {
                    warn!("Aborting run: {}", err);
                    self.active = None;
                    self.state = EngineState::Idle;
                    return Err(err);
                }
            }
        }
    }

    /// Steps until the run completes and returns its outcome, discarding cell events.
    pub fn run_to_completion(
        &mut self,
        grid: &mut Grid,
        algorithm: Algorithm,
    ) -> Result<(SearchResult, Path)> {
        self.run(grid, algorithm)?;
        while let Some(event) = self.step(grid)? {
            if let Event::RunCompleted { result, path } = event {
                return Ok((result, path));
            }
        }
        // A started run always queues its completion before the event stream ends.
        Ok((SearchResult::Exhausted, Vec::new()))
    }

    /// One expansion: take the next frontier cell, stop on the goal, otherwise mark it visited
    /// and offer its traversable neighbours.
    fn advance(&mut self, grid: &mut Grid) -> Result<Outcome> {
        let Some(active) = self.active.as_mut() else {
            return Ok(Outcome::Finished(SearchResult::Exhausted, Vec::new()));
        };
        let Some(entry) = active.frontier.take_next() else {
            if !active.frontier.next_pass() {
                return Ok(Outcome::Finished(SearchResult::Exhausted, Vec::new()));
            }
            self.passes += 1;
            info!("{} pass {} from {}", active.algorithm, self.passes, active.start);
            grid.reset_traversal_marks();
            self.predecessors.clear();
            active.frontier.offer(active.start, 0);
            return Ok(Outcome::Continue);
        };

        if entry.cell == active.goal {
            let path = reconstruct(&self.predecessors, active.goal);
            for cell in &path {
                grid.mark_path(*cell)?;
            }
            return Ok(Outcome::Finished(SearchResult::Found(active.goal), path));
        }

        grid.mark_visited(entry.cell)?;
        self.expansions += 1;
        let mut neighbors = active.snapshot.neighbors(&entry.cell)?;
        if active.frontier.reverse_neighbors() {
            neighbors.reverse();
        }
        for neighbor in neighbors {
            if active.snapshot.is_traversable(&neighbor)
                && active.frontier.offer(neighbor, entry.cost + 1)
            {
                if let Some(previous) = self.predecessors.record(neighbor, entry.cell) {
                    debug!("{} re-reached from {} instead of {}", neighbor, entry.cell, previous);
                }
            }
        }
        Ok(Outcome::Continue)
    }

    fn finish(&mut self, result: SearchResult, path: Path) {
        let algorithm = self.active.take().map(|a| a.algorithm);
        self.state = match result {
            SearchResult::Found(_) => EngineState::Succeeded,
            SearchResult::Exhausted => EngineState::Failed,
        };
        info!(
            "{} finished with {:?} after {} expansions, path of {} cells",
            algorithm.map_or("Search", |a| a.label()),
            result,
            self.expansions,
            path.len()
        );
        self.pending.push_back(Event::RunCompleted { result, path });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::path_steps;

    fn five_by_five() -> Grid {
        "#####\n#S..#\n#...#\n#..G#\n#####".parse().unwrap()
    }

    fn cells(coords: &[(usize, usize)]) -> Vec<Cell> {
        coords.iter().copied().map(Cell::from).collect()
    }

    fn collect_events(engine: &mut SearchEngine, grid: &mut Grid) -> Vec<Event> {
        std::iter::from_fn(|| engine.step(grid).unwrap()).collect()
    }

    #[test]
    fn bfs_on_open_grid() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        engine.run(&mut grid, Algorithm::Bfs).unwrap();
        let events = collect_events(&mut engine, &mut grid);

        let visited = events
            .iter()
            .filter_map(|e| match e {
                Event::CellStateChanged {
                    cell,
                    state: CellState::Visited,
                } => Some(*cell),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            visited,
            cells(&[(1, 2), (2, 1), (1, 3), (2, 2), (3, 1), (2, 3), (3, 2)])
        );
        let expected = cells(&[(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)]);
        assert_eq!(
            events.last(),
            Some(&Event::RunCompleted {
                result: SearchResult::Found(Cell::new(3, 3)),
                path: expected.clone()
            })
        );
        assert_eq!(path_steps(&expected), 4);
        assert_eq!(engine.state(), EngineState::Succeeded);
        assert_eq!(engine.expansions(), 8);
        assert_eq!(grid.count(CellState::Visited) + grid.count(CellState::Path), 7);
        assert_eq!(grid.count(CellState::Path), 3);
        assert_eq!(grid.state(&Cell::new(3, 3)).unwrap(), CellState::Goal);
        assert_eq!(grid.state(&Cell::new(1, 1)).unwrap(), CellState::Start);
        assert!(engine.step(&mut grid).unwrap().is_none());
    }

    #[test]
    fn dfs_prefers_up_right_down_left() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        let (result, path) = engine.run_to_completion(&mut grid, Algorithm::Dfs).unwrap();
        assert_eq!(result, SearchResult::Found(Cell::new(3, 3)));
        assert_eq!(path, cells(&[(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)]));
        // Only the cells on the way were expanded.
        assert_eq!(engine.expansions(), 4);
    }

    #[test]
    fn astar_tie_breaking_is_pinned() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        let (_, path) = engine.run_to_completion(&mut grid, Algorithm::AStar).unwrap();
        assert_eq!(path, cells(&[(1, 1), (2, 1), (2, 2), (3, 2), (3, 3)]));
    }

    #[test]
    fn deepening_restarts_until_goal_depth() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        let (result, path) = engine
            .run_to_completion(&mut grid, Algorithm::IterativeDeepening)
            .unwrap();
        assert_eq!(result, SearchResult::Found(Cell::new(3, 3)));
        assert_eq!(path_steps(&path), 4);
        assert_eq!(engine.restarts(), 4);
    }

    #[test]
    fn deepening_honours_max_depth() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::new(SearchConfig { max_depth: Some(3) });
        let (result, path) = engine
            .run_to_completion(&mut grid, Algorithm::IterativeDeepening)
            .unwrap();
        assert_eq!(result, SearchResult::Exhausted);
        assert!(path.is_empty());
        assert_eq!(engine.state(), EngineState::Failed);
    }

    #[test]
    fn enclosed_goal_is_exhausted() {
        for algorithm in Algorithm::ALL {
            let mut grid: Grid = "#######\n#S.#..#\n#..#.G#\n#######".parse().unwrap();
            let mut engine = SearchEngine::default();
            let (result, path) = engine.run_to_completion(&mut grid, algorithm).unwrap();
            assert_eq!(result, SearchResult::Exhausted, "{}", algorithm);
            assert!(path.is_empty());
            assert_eq!(grid.count(CellState::Path), 0);
        }
    }

    #[test]
    fn missing_marker_fails_fast() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_start(Cell::new(1, 1)).unwrap();
        let mut engine = SearchEngine::default();
        assert_eq!(
            engine.run(&mut grid, Algorithm::Bfs),
            Err(Error::NoStartOrGoal)
        );
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.step(&mut grid).unwrap().is_none());
    }

    #[test]
    fn reentrant_run_is_rejected() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        engine.run(&mut grid, Algorithm::Bfs).unwrap();
        assert_eq!(
            engine.run(&mut grid, Algorithm::Dfs),
            Err(Error::ReentrantRun)
        );
        engine.cancel(&mut grid);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.run(&mut grid, Algorithm::Dfs).is_ok());
    }

    #[test]
    fn edits_during_run_do_not_change_it() {
        let mut reference = five_by_five();
        let mut engine = SearchEngine::default();
        let expected = engine.run_to_completion(&mut reference, Algorithm::Bfs).unwrap();

        let mut grid = five_by_five();
        engine.run(&mut grid, Algorithm::Bfs).unwrap();
        engine.step(&mut grid).unwrap();
        grid.set_wall(Cell::new(2, 3)).unwrap();
        grid.set_wall(Cell::new(3, 2)).unwrap();
        let mut outcome = None;
        while let Some(event) = engine.step(&mut grid).unwrap() {
            if let Event::RunCompleted { result, path } = event {
                outcome = Some((result, path));
            }
        }
        assert_eq!(outcome, Some(expected));
        // The live walls survive the run's marks.
        assert_eq!(grid.state(&Cell::new(2, 3)).unwrap(), CellState::Wall);
    }

    #[test]
    fn rerun_resets_marks_and_repeats() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        for algorithm in Algorithm::ALL {
            let first = engine.run_to_completion(&mut grid, algorithm).unwrap();
            let second = engine.run_to_completion(&mut grid, algorithm).unwrap();
            assert_eq!(first, second, "{}", algorithm);
        }
    }

    #[test]
    fn cancel_keeps_undelivered_changes() {
        let mut grid = five_by_five();
        let mut engine = SearchEngine::default();
        engine.run(&mut grid, Algorithm::Bfs).unwrap();
        engine.step(&mut grid).unwrap();
        grid.set_wall(Cell::new(2, 2)).unwrap();
        grid.set_wall(Cell::new(3, 1)).unwrap();
        // The next expansion also drains both edits.
        let first = engine.step(&mut grid).unwrap();
        assert!(first.is_some());
        engine.cancel(&mut grid);
        let changes = grid.drain_changes().collect::<Vec<_>>();
        let delivered = std::iter::once(first.unwrap())
            .filter_map(|e| match e {
                Event::CellStateChanged { cell, state } => Some((cell, state)),
                Event::RunCompleted { .. } => None,
            })
            .collect::<Vec<_>>();
        for edit in [
            (Cell::new(2, 2), CellState::Wall),
            (Cell::new(3, 1), CellState::Wall),
        ] {
            assert!(
                changes.contains(&edit) || delivered.contains(&edit),
                "{:?} was lost",
                edit
            );
        }
        assert!(engine.step(&mut grid).unwrap().is_none());
    }

    #[test]
    fn step_rejects_another_grid() {
        let mut grid = five_by_five();
        let mut other = Grid::new(3, 3).unwrap();
        let mut engine = SearchEngine::default();
        engine.run(&mut grid, Algorithm::Bfs).unwrap();
        assert_eq!(
            engine.step(&mut other),
            Err(Error::GridMismatch {
                expected: (5, 5),
                found: (3, 3)
            })
        );
        assert!(!other.has_changes());
        assert_eq!(other.count(CellState::Visited), 0);
        // The run itself is untouched.
        assert!(engine.is_running());
        assert_eq!(
            engine.run_to_completion(&mut grid, Algorithm::Bfs),
            Err(Error::ReentrantRun)
        );
        assert!(std::iter::from_fn(|| engine.step(&mut grid).unwrap())
            .any(|e| matches!(e, Event::RunCompleted { .. })));
    }

    #[test]
    fn astar_on_wide_grid() {
        let mut grid = Grid::new(3, 70_000).unwrap();
        grid.set_start(Cell::new(1, 1)).unwrap();
        grid.set_goal(Cell::new(1, 69_998)).unwrap();
        let mut engine = SearchEngine::default();
        let (result, path) = engine.run_to_completion(&mut grid, Algorithm::AStar).unwrap();
        assert_eq!(result, SearchResult::Found(Cell::new(1, 69_998)));
        assert_eq!(path_steps(&path), 69_997);
    }
}
