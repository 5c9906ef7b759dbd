use grid_astar::{Session, StepEvent};
use grid_util::point::Point;

// Drives the search one expansion at a time, the cooperative pacing a front end uses
// to animate the exploration: each step reports the expanded cell and any newly
// discovered frontier cells.

fn main() {
    let mut session = Session::new(9, 9);
    // A wall across the middle with a single gap.
    for x in 0..8 {
        session.set_obstacle(Point::new(x, 4), true).unwrap();
    }
    session.designate_start(Point::new(4, 0)).unwrap();
    session.designate_goal(Point::new(4, 8)).unwrap();

    let mut steps = 0;
    loop {
        match session.step_search().unwrap() {
            StepEvent::Expanded { cell, discovered } => {
                steps += 1;
                println!("step {steps}: expanded {cell}, discovered {}", discovered.len());
            }
            StepEvent::Succeeded | StepEvent::Failed => break,
        }
    }
    println!("{}", session.status_line());
    if let Some(path) = session.path() {
        println!("path of {} cells: {:?}", path.len(), path);
    }
}
