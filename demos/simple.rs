use grid_astar::{CellState, Session};
use grid_util::point::Point;
use rand::prelude::*;

// In this demo a 25x25 session is seeded with random blockades, the two opposite
// corners are designated, and the finished search is printed as a board:
// - # marks a blockade
// - S and G mark the endpoints
// - o marks the path
// - . marks an expanded cell, + a cell left on the frontier

fn main() {
    let mut session = Session::new(25, 25);
    let mut rng = StdRng::seed_from_u64(42);
    session.scatter_obstacles(150, &mut rng);
    session.designate_start(Point::new(0, 0)).unwrap();
    session.designate_goal(Point::new(24, 24)).unwrap();
    let outcome = session.run_search().unwrap();
    for y in 0..session.height() as i32 {
        for x in 0..session.width() as i32 {
            let glyph = match session.cell_state(Point::new(x, y)) {
                CellState::Blocked => '#',
                CellState::Start => 'S',
                CellState::Goal => 'G',
                CellState::Path => 'o',
                CellState::Expanded => '.',
                CellState::Frontier => '+',
                CellState::Unvisited => ' ',
            };
            print!("{}", glyph);
        }
        println!();
    }
    println!("{}", outcome);
}
