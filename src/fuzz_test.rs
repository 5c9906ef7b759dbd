//! Fuzzes the search by checking for many random grids that a path is found exactly
//! when the goal is in the same connected component as the start.

use grid_util::grid::Grid;
use grid_util::point::Point;
use rand::prelude::*;

use super::*;

fn random_grid(n: usize, rng: &mut StdRng) -> ObstacleGrid {
    let mut grid: ObstacleGrid = ObstacleGrid::new(n, n, false);
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            grid.set(x, y, rng.gen_bool(0.4))
        }
    }
    grid.generate_components();
    grid
}

fn visualize_grid(grid: &ObstacleGrid, start: &Point, end: &Point) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let p = Point::new(x, y);
            if *start == p {
                print!("S");
            } else if *end == p {
                print!("G");
            } else if grid.get_point(p) {
                print!("#");
            } else {
                print!(".");
            }
        }
        println!();
    }
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 5000;
    let mut rng = StdRng::seed_from_u64(0);
    let model = ManhattanCost;
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng);
        grid.set_point(start, false);
        grid.set_point(end, false);
        let reachable = grid.reachable(&start, &end);
        let path = find_path(&grid, &model, start, end).unwrap();
        // Show the grid if the outcome contradicts the components
        if path.is_some() != reachable {
            visualize_grid(&grid, &start, &end);
        }
        assert!(path.is_some() == reachable);
    }
}
