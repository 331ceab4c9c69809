/// Fuzzes the search engine by checking for many random grids that every strategy finds a path
/// exactly when the goal is on the same connected component as the start, and that the paths
/// they report are walkable.
use grid_search::path::{is_contiguous, path_steps};
use grid_search::*;
use rand::prelude::*;
use std::collections::VecDeque;

fn random_grid(n: usize, rng: &mut StdRng) -> Grid {
    let mut grid = Grid::new(n, n).unwrap();
    for row in 1..n - 1 {
        for col in 1..n - 1 {
            if rng.gen_bool(0.35) {
                grid.set_wall(Cell::new(row, col)).unwrap();
            }
        }
    }
    grid.set_start(Cell::new(1, 1)).unwrap();
    grid.set_goal(Cell::new(n - 2, n - 2)).unwrap();
    grid.drain_changes().for_each(drop);
    grid
}

/// Plain breadth-first distance, independent of the engine.
fn brute_force_distance(grid: &Grid, start: Cell, goal: Cell) -> Option<usize> {
    let mut dist = vec![vec![None; grid.width()]; grid.height()];
    let mut queue = VecDeque::from([start]);
    dist[start.row][start.col] = Some(0);
    while let Some(cell) = queue.pop_front() {
        let d = dist[cell.row][cell.col].unwrap();
        if cell == goal {
            return Some(d);
        }
        for n in grid.neighbors(&cell).unwrap() {
            if grid.is_traversable(&n) && dist[n.row][n.col].is_none() {
                dist[n.row][n.col] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    None
}

fn check_path(grid: &Grid, path: &[Cell], start: Cell, goal: Cell) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    assert!(is_contiguous(path));
    assert!(path.iter().all(|c| grid.is_traversable(c)));
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 1000;
    let mut rng = StdRng::seed_from_u64(0);
    let mut engine = SearchEngine::default();
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng);
        let start = grid.start().unwrap();
        let goal = grid.goal().unwrap();
        let reachable = grid.reachable(&start, &goal);
        let shortest = brute_force_distance(&grid, start, goal);
        assert_eq!(reachable, shortest.is_some());

        for algorithm in Algorithm::ALL {
            let (result, path) = engine.run_to_completion(&mut grid, algorithm).unwrap();
            let found = result == SearchResult::Found(goal);
            // Show the grid if the outcome is wrong
            if found != reachable {
                println!("{} on\n{}", algorithm, grid);
            }
            assert_eq!(found, reachable);
            if !found {
                assert_eq!(result, SearchResult::Exhausted);
                assert!(path.is_empty());
                continue;
            }
            check_path(&grid, &path, start, goal);
            let steps = path_steps(&path);
            match algorithm {
                // The squared heuristic may overshoot and DFS makes no promise on length.
                Algorithm::AStar | Algorithm::Dfs => assert!(steps >= shortest.unwrap()),
                _ => assert_eq!(Some(steps), shortest, "{} on\n{}", algorithm, grid),
            }
        }
    }
}

#[test]
fn fuzz_rerun_is_identical() {
    const N: usize = 12;
    const N_GRIDS: usize = 200;
    let mut rng = StdRng::seed_from_u64(1);
    let mut engine = SearchEngine::default();
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng);
        for algorithm in Algorithm::ALL {
            let first = engine.run_to_completion(&mut grid, algorithm).unwrap();
            let marks = grid.to_string();
            let second = engine.run_to_completion(&mut grid, algorithm).unwrap();
            assert_eq!(first, second);
            assert_eq!(marks, grid.to_string());
        }
    }
}
