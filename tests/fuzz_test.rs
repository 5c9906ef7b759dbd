//! Fuzzes the search against an exhaustive breadth-first oracle: on random grids the
//! returned path must be a valid grid path whose length matches the true shortest
//! distance, and repeated runs must explore identically.

use std::collections::VecDeque;

use grid_astar::{find_path, ManhattanCost, ObstacleGrid, Search};
use grid_util::grid::Grid;
use grid_util::point::Point;
use rand::prelude::*;

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

/// Shortest distance in steps by plain breadth-first search, or [None] if the goal is
/// not reachable.
fn bfs_distance(grid: &ObstacleGrid, start: Point, goal: Point) -> Option<usize> {
    let mut distance = vec![usize::MAX; grid.width() * grid.height()];
    let mut queue = VecDeque::new();
    distance[grid.get_ix_point(&start)] = 0;
    queue.push_back(start);
    while let Some(p) = queue.pop_front() {
        let d = distance[grid.get_ix_point(&p)];
        if p == goal {
            return Some(d);
        }
        for n in grid.neighbours(p) {
            let ix = grid.get_ix_point(&n);
            if distance[ix] == usize::MAX {
                distance[ix] = d + 1;
                queue.push_back(n);
            }
        }
    }
    None
}

fn assert_valid_path(grid: &ObstacleGrid, path: &[Point], start: Point, goal: Point) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for pair in path.windows(2) {
        assert!(grid.is_passable(pair[0]));
        assert!(grid.is_passable(pair[1]));
        let (a, b) = (pair[0], pair[1]);
        assert_eq!((a.x - b.x).abs() + (a.y - b.y).abs(), 1);
    }
    for (i, p) in path.iter().enumerate() {
        assert!(!path[i + 1..].contains(p), "cell {} repeats", p);
    }
}

#[test]
fn path_length_matches_bfs_oracle() {
    const N: usize = 8;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let model = ManhattanCost;
    let start = Point::new(0, 0);
    let goal = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng);
        grid.set_point(start, false);
        grid.set_point(goal, false);
        let oracle = bfs_distance(&grid, start, goal);
        let path = find_path(&grid, &model, start, goal).unwrap();
        match (&path, oracle) {
            (Some(path), Some(steps)) => {
                assert_eq!(path.len(), steps + 1, "suboptimal path on\n{}", grid);
                assert_valid_path(&grid, path, start, goal);
            }
            (None, None) => {}
            _ => panic!(
                "search and oracle disagree on reachability:\n{}",
                grid
            ),
        }
    }
}

#[test]
fn repeated_searches_explore_identically() {
    const N: usize = 8;
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(17);
    let model = ManhattanCost;
    let start = Point::new(0, 0);
    let goal = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng);
        grid.set_point(start, false);
        grid.set_point(goal, false);
        let mut first: Search<i32> = Search::new(&grid, start, goal).unwrap();
        first.run(&grid, &model);
        let mut second: Search<i32> = Search::new(&grid, start, goal).unwrap();
        second.run(&grid, &model);
        assert_eq!(first.status(), second.status());
        assert_eq!(first.expanded(), second.expanded());
        assert_eq!(first.path(), second.path());
    }
}
