//! # grid_astar
//!
//! An interactive grid-based shortest-path core. Implements
//! [A* search](https://en.wikipedia.org/wiki/A*_search_algorithm) over a
//! 4-connected uniform-cost grid, with deterministic first-in-first-out
//! tie-breaking and a step interface that yields after every expansion so a
//! front end can render the exploration as it happens. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! so callers can answer reachability questions without flood-filling.
//!
//! The crate performs no I/O and holds no global state. A [Session] owns an
//! [ObstacleGrid] and at most one [Search]; a presentation layer drives it through
//! commands (designate endpoints, edit obstacles, run or step the search) and renders
//! from its query surface (per-cell state, path, expansion order, status text).

pub mod cost;
pub mod frontier;
pub mod grid;
pub mod scenario;
pub mod search;
pub mod session;

#[cfg(test)]
mod fuzz_test;

pub use cost::{CostModel, ManhattanCost};
pub use frontier::{EmptyFrontier, Frontier};
pub use grid::ObstacleGrid;
pub use scenario::scatter_obstacles;
pub use search::{find_path, InvalidScenario, Search, SearchStatus, StepEvent};
pub use session::{CellState, InvalidObstacle, Outcome, Session};
