use grid_search::{Algorithm, Event, Grid, Visualizer};
use std::thread;

// In this example every algorithm searches the grid
//  #######
//  #S....#
//  #.###.#
//  #...#G#
//  #######
// where
// - # marks a wall
// - S marks the start
// - G marks the goal
//
// Events are printed as a renderer would receive them, waiting the pacing between steps.

fn main() {
    let grid: Grid = "\
        #######\n\
        #S....#\n\
        #.###.#\n\
        #...#G#\n\
        #######"
        .parse()
        .unwrap();
    let mut vis = Visualizer::new(grid);
    for algorithm in Algorithm::ALL {
        vis.set_algorithm(algorithm);
        vis.run().unwrap();
        println!("{algorithm}:");
        while let Some(event) = vis.next_event().unwrap() {
            match event {
                Event::CellStateChanged { cell, state } => println!("  {cell} -> {state}"),
                Event::RunCompleted { result, path } => {
                    println!("  {result:?} with {} steps", path.len().saturating_sub(1))
                }
            }
            thread::sleep(vis.pacing());
        }
        println!("{}", vis.grid());
    }
}
