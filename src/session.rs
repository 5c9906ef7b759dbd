use core::fmt;

use grid_util::grid::Grid;
use grid_util::point::Point;
use log::{info, warn};
use rand::Rng;
use thiserror::Error;

use crate::cost::ManhattanCost;
use crate::grid::ObstacleGrid;
use crate::scenario::scatter_obstacles;
use crate::search::{InvalidScenario, Search, SearchStatus, StepEvent};

/// Rejected obstacle edit: the designated start and goal cells cannot be blocked.
/// The grid is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidObstacle {
    #[error("cannot block the start cell")]
    Start,
    #[error("cannot block the goal cell")]
    Goal,
}

/// Terminal result of a search run. Not finding a path is a normal outcome, distinct
/// from an invalid scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    PathFound,
    NoPath,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Outcome::PathFound => "Path found",
            Outcome::NoPath => "No path found",
        })
    }
}

/// What a cell currently means to a renderer, in decreasing precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Blocked,
    Start,
    Goal,
    Path,
    Frontier,
    Expanded,
    Unvisited,
}

/// One interactive pathfinding session: an obstacle grid, an optional scenario and at
/// most one search over it.
///
/// The session performs no I/O and holds no global state; a front end drives it
/// through commands ([designate_start](Self::designate_start),
/// [set_obstacle](Self::set_obstacle), [run_search](Self::run_search), ...) and renders
/// from the query surface ([cell_state](Self::cell_state), [path](Self::path),
/// [status_line](Self::status_line)).
pub struct Session {
    grid: ObstacleGrid,
    cost: ManhattanCost,
    start: Option<Point>,
    goal: Option<Point>,
    search: Option<Search<i32>>,
}

impl Session {
    /// Creates a session over a width x height grid with every cell passable and the
    /// scenario unset.
    pub fn new(width: usize, height: usize) -> Session {
        let mut grid: ObstacleGrid = ObstacleGrid::new(width, height, false);
        grid.generate_components();
        Session {
            grid,
            cost: ManhattanCost,
            start: None,
            goal: None,
            search: None,
        }
    }

    pub fn grid(&self) -> &ObstacleGrid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Both endpoints are designated, so a search can be invoked.
    pub fn is_ready(&self) -> bool {
        self.start.is_some() && self.goal.is_some()
    }

    /// Randomly blocks up to `count` cells, never the designated endpoints. Drops any
    /// search state, which would otherwise reflect a stale layout.
    pub fn scatter_obstacles<R: Rng>(&mut self, count: usize, rng: &mut R) {
        scatter_obstacles(&mut self.grid, count, rng);
        for endpoint in [self.start, self.goal].into_iter().flatten() {
            self.grid.set_blocked(endpoint, false);
        }
        self.search = None;
    }

    /// Marks a cell blocked or passable. The designated endpoints are protected and
    /// out-of-bounds positions are ignored. Any search state is dropped since its
    /// neighbour view no longer matches the grid.
    pub fn set_obstacle(&mut self, p: Point, blocked: bool) -> Result<(), InvalidObstacle> {
        if blocked {
            if self.start == Some(p) {
                return Err(InvalidObstacle::Start);
            }
            if self.goal == Some(p) {
                return Err(InvalidObstacle::Goal);
            }
        }
        self.grid.set_blocked(p, blocked);
        self.search = None;
        Ok(())
    }

    /// Designates the start cell, clearing any obstacle on it. The start is set once
    /// per scenario; [reset_scenario](Self::reset_scenario) makes room for a new one.
    pub fn designate_start(&mut self, p: Point) -> Result<(), InvalidScenario> {
        if self.start.is_some() {
            return Err(InvalidScenario::StartAlreadySet);
        }
        if !self.grid.in_bounds(p.x, p.y) {
            return Err(InvalidScenario::OutOfBounds(p));
        }
        if self.goal == Some(p) {
            return Err(InvalidScenario::StartEqualsGoal);
        }
        self.grid.set_blocked(p, false);
        self.start = Some(p);
        Ok(())
    }

    /// Designates the goal cell, clearing any obstacle on it.
    pub fn designate_goal(&mut self, p: Point) -> Result<(), InvalidScenario> {
        if self.goal.is_some() {
            return Err(InvalidScenario::GoalAlreadySet);
        }
        if !self.grid.in_bounds(p.x, p.y) {
            return Err(InvalidScenario::OutOfBounds(p));
        }
        if self.start == Some(p) {
            return Err(InvalidScenario::StartEqualsGoal);
        }
        self.grid.set_blocked(p, false);
        self.goal = Some(p);
        Ok(())
    }

    fn begin_search(&mut self) -> Result<Search<i32>, InvalidScenario> {
        let start = self.start.ok_or(InvalidScenario::MissingStart)?;
        let goal = self.goal.ok_or(InvalidScenario::MissingGoal)?;
        self.grid.update();
        info!("starting search from {} to {}", start, goal);
        Search::new(&self.grid, start, goal)
    }

    /// Runs the search to completion, starting it first if necessary. Called again
    /// after termination it reports the recorded outcome without re-running; use
    /// [reset_search](Self::reset_search) to search again after editing obstacles.
    pub fn run_search(&mut self) -> Result<Outcome, InvalidScenario> {
        let mut search = match self.search.take() {
            Some(search) => search,
            None => self.begin_search()?,
        };
        let outcome = match search.run(&self.grid, &self.cost) {
            SearchStatus::Succeeded => Outcome::PathFound,
            _ => Outcome::NoPath,
        };
        if outcome == Outcome::NoPath && self.grid.reachable(&search.start(), &search.goal()) {
            warn!(
                "components say {} is reachable from {} but the search failed",
                search.goal(),
                search.start()
            );
        }
        self.search = Some(search);
        Ok(outcome)
    }

    /// Performs one expansion step, starting the search on the first call. The event
    /// mirrors [Search::step]; a finished search keeps reporting its terminal event.
    pub fn step_search(&mut self) -> Result<StepEvent, InvalidScenario> {
        let mut search = match self.search.take() {
            Some(search) => search,
            None => self.begin_search()?,
        };
        let event = search.step(&self.grid, &self.cost);
        self.search = Some(search);
        Ok(event)
    }

    /// Discards search state so the next run starts fresh against the current obstacle
    /// layout. The scenario designation is kept.
    pub fn reset_search(&mut self) {
        self.search = None;
    }

    /// Returns the session to its initial unset scenario: start, goal and search state
    /// are cleared. The obstacle layout is kept.
    pub fn reset_scenario(&mut self) {
        self.start = None;
        self.goal = None;
        self.search = None;
    }

    /// Terminal outcome of the current search, if it has finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.search.as_ref().map(|s| s.status()) {
            Some(SearchStatus::Succeeded) => Some(Outcome::PathFound),
            Some(SearchStatus::Failed) => Some(Outcome::NoPath),
            _ => None,
        }
    }

    /// Whether the goal is in the same passable component as the start. Exposed so a
    /// front end can grey out impossible scenarios; the engine itself never consults
    /// this, its failure condition is frontier exhaustion.
    pub fn goal_reachable(&mut self) -> Option<bool> {
        let start = self.start?;
        let goal = self.goal?;
        self.grid.update();
        Some(self.grid.reachable(&start, &goal))
    }

    /// The path of the current search, once it has succeeded.
    pub fn path(&self) -> Option<&[Point]> {
        self.search.as_ref().and_then(|s| s.path())
    }

    /// Cells of the current search in expansion order.
    pub fn expanded(&self) -> &[Point] {
        match &self.search {
            Some(search) => search.expanded(),
            None => &[],
        }
    }

    /// Renderer view of one cell. Out-of-bounds positions read as blocked.
    pub fn cell_state(&self, p: Point) -> CellState {
        if !self.grid.is_passable(p) {
            return CellState::Blocked;
        }
        if self.start == Some(p) {
            return CellState::Start;
        }
        if self.goal == Some(p) {
            return CellState::Goal;
        }
        if let Some(search) = &self.search {
            if search.on_path(p) {
                return CellState::Path;
            }
            if search.in_frontier(p) {
                return CellState::Frontier;
            }
            if search.was_discovered(p) {
                return CellState::Expanded;
            }
        }
        CellState::Unvisited
    }

    /// Human readable line describing where the session stands, mirroring the prompts
    /// an interactive front end shows between commands.
    pub fn status_line(&self) -> &'static str {
        match (self.start, self.goal, self.search.as_ref().map(|s| s.status())) {
            (None, _, _) => "Select start point",
            (_, None, _) => "Select end point",
            (_, _, None) => "Ready to run",
            (_, _, Some(SearchStatus::Running)) => "Search running",
            (_, _, Some(SearchStatus::Succeeded)) => "Path found",
            (_, _, Some(SearchStatus::Failed)) => "No path found",
        }
    }
}
