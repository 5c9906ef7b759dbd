use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::info;
use num_traits::Zero;
use smallvec::SmallVec;
use thiserror::Error;

use crate::cost::CostModel;
use crate::frontier::{EmptyFrontier, Frontier};
use crate::grid::ObstacleGrid;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Rejected scenario preconditions. These are detected before any search state is
/// created, so a failed invocation leaves nothing to roll back. Distinct from a
/// search that terminates without a path, which is a normal outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidScenario {
    #[error("no start cell has been designated")]
    MissingStart,
    #[error("no goal cell has been designated")]
    MissingGoal,
    #[error("start and goal must be distinct cells")]
    StartEqualsGoal,
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Point),
    #[error("cell {0} is blocked")]
    Blocked(Point),
    #[error("start cell is already designated")]
    StartAlreadySet,
    #[error("goal cell is already designated")]
    GoalAlreadySet,
}

/// Where a search stands in its lifecycle. The terminal states are final: further
/// stepping re-reports them without touching any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    Succeeded,
    Failed,
}

/// What one call to [Search::step] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// A cell was popped off the frontier and its neighbours relaxed. `discovered`
    /// lists the cells that entered the frontier for the first time on this expansion,
    /// in neighbour order.
    Expanded {
        cell: Point,
        discovered: SmallVec<[Point; 4]>,
    },
    /// The goal was popped; the path is available through [Search::path].
    Succeeded,
    /// The frontier ran dry before the goal was reached: no path exists under the
    /// current obstacle layout.
    Failed,
}

/// Per-node search record. The predecessor is an index into the same map, with
/// [usize::MAX] marking the start of the chain.
struct NodeRecord<C> {
    parent: usize,
    g: C,
}

/// One A* search over an [ObstacleGrid], driven one expansion at a time.
///
/// All search state is owned here and discarded with the value: node records live in
/// an insertion-ordered arena keyed by cell, the open set holds indices into it, and
/// every cost field of an undiscovered cell is implicitly infinite because no record
/// exists yet. Re-running after an obstacle edit means constructing a fresh [Search].
///
/// The caller controls pacing: [step](Self::step) yields after each expansion so a
/// front end can render progress, while [run](Self::run) drives the loop to a
/// terminal state in one call.
pub struct Search<C> {
    nodes: FxIndexMap<Point, NodeRecord<C>>,
    frontier: Frontier<C>,
    expanded: Vec<Point>,
    path: Vec<Point>,
    start: Point,
    goal: Point,
    status: SearchStatus,
}

impl<C: Zero + Ord + Copy> Search<C> {
    /// Validates the scenario and readies a running search with the start cell on the
    /// frontier. Fails fast with [InvalidScenario] before any search state exists.
    pub fn new(grid: &ObstacleGrid, start: Point, goal: Point) -> Result<Search<C>, InvalidScenario> {
        for p in [start, goal] {
            if !grid.in_bounds(p.x, p.y) {
                return Err(InvalidScenario::OutOfBounds(p));
            }
            if !grid.is_passable(p) {
                return Err(InvalidScenario::Blocked(p));
            }
        }
        if start == goal {
            return Err(InvalidScenario::StartEqualsGoal);
        }
        let mut nodes = FxIndexMap::default();
        nodes.insert(
            start,
            NodeRecord {
                parent: usize::MAX,
                g: C::zero(),
            },
        );
        let mut frontier = Frontier::new();
        frontier.push(0, C::zero(), C::zero());
        Ok(Search {
            nodes,
            frontier,
            expanded: Vec::new(),
            path: Vec::new(),
            start,
            goal,
            status: SearchStatus::Running,
        })
    }

    /// Performs one expansion: pops the best frontier entry, finishes if it is the
    /// goal, otherwise relaxes its neighbours. Stale entries left behind by earlier
    /// relaxations are skipped transparently and do not count as a step.
    pub fn step<M: CostModel<Cost = C>>(&mut self, grid: &ObstacleGrid, model: &M) -> StepEvent {
        match self.status {
            SearchStatus::Succeeded => return StepEvent::Succeeded,
            SearchStatus::Failed => return StepEvent::Failed,
            SearchStatus::Running => {}
        }
        loop {
            let (index, g) = match self.frontier.pop_min() {
                Ok(popped) => popped,
                Err(EmptyFrontier) => {
                    info!("frontier exhausted after {} expansions", self.expanded.len());
                    self.status = SearchStatus::Failed;
                    return StepEvent::Failed;
                }
            };
            let (cell, best_g) = {
                let (node, record) = self.nodes.get_index(index).unwrap();
                (*node, record.g)
            };
            // A node relaxed while open leaves its superseded entry in the heap; any
            // entry that no longer matches the node's best known cost is dropped here.
            if g > best_g {
                continue;
            }
            self.frontier.close(index);
            if cell == self.goal {
                self.path = reverse_path(&self.nodes, index);
                self.status = SearchStatus::Succeeded;
                return StepEvent::Succeeded;
            }
            self.expanded.push(cell);
            let mut discovered: SmallVec<[Point; 4]> = SmallVec::new();
            for neighbour in grid.neighbours(cell) {
                let tentative = g + model.step_cost(&cell, &neighbour);
                let (f, n) = match self.nodes.entry(neighbour) {
                    Vacant(e) => {
                        let f = tentative + model.heuristic(e.key(), &self.goal);
                        let n = e.index();
                        e.insert(NodeRecord {
                            parent: index,
                            g: tentative,
                        });
                        (f, n)
                    }
                    Occupied(mut e) => {
                        if e.get().g > tentative {
                            let f = tentative + model.heuristic(e.key(), &self.goal);
                            let n = e.index();
                            e.insert(NodeRecord {
                                parent: index,
                                g: tentative,
                            });
                            (f, n)
                        } else {
                            continue;
                        }
                    }
                };
                if self.frontier.push(n, f, tentative) {
                    discovered.push(neighbour);
                }
            }
            return StepEvent::Expanded { cell, discovered };
        }
    }

    /// Drives the search to a terminal state and reports it.
    pub fn run<M: CostModel<Cost = C>>(&mut self, grid: &ObstacleGrid, model: &M) -> SearchStatus {
        loop {
            match self.step(grid, model) {
                StepEvent::Expanded { .. } => continue,
                StepEvent::Succeeded => return SearchStatus::Succeeded,
                StepEvent::Failed => return SearchStatus::Failed,
            }
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// The start-to-goal path, available once the search has succeeded. Ordered from
    /// start to goal, both included.
    pub fn path(&self) -> Option<&[Point]> {
        if self.status == SearchStatus::Succeeded {
            Some(&self.path)
        } else {
            None
        }
    }

    /// Cells in the order they were expanded. The goal itself is never expanded.
    pub fn expanded(&self) -> &[Point] {
        &self.expanded
    }

    /// Whether the cell is currently on the frontier.
    pub fn in_frontier(&self, p: Point) -> bool {
        self.nodes
            .get_index_of(&p)
            .map_or(false, |ix| self.frontier.contains(ix))
    }

    /// Whether the cell has been discovered at all, on the frontier or already expanded.
    pub fn was_discovered(&self, p: Point) -> bool {
        self.nodes.contains_key(&p)
    }

    pub fn on_path(&self, p: Point) -> bool {
        self.path.contains(&p)
    }
}

/// Walks predecessor indices back from `start` and reverses the result into a
/// start-to-goal ordering.
fn reverse_path<C>(nodes: &FxIndexMap<Point, NodeRecord<C>>, start: usize) -> Vec<Point> {
    let mut path: Vec<Point> = itertools::unfold(start, |i| {
        nodes.get_index(*i).map(|(node, record)| {
            *i = record.parent;
            *node
        })
    })
    .collect();
    path.reverse();
    path
}

/// One-shot search: validates the scenario, runs to termination and returns the path,
/// or [None] when start and goal are not connected. Only precondition violations
/// produce an [Err].
pub fn find_path<M: CostModel>(
    grid: &ObstacleGrid,
    model: &M,
    start: Point,
    goal: Point,
) -> Result<Option<Vec<Point>>, InvalidScenario> {
    let mut search: Search<M::Cost> = Search::new(grid, start, goal)?;
    match search.run(grid, model) {
        SearchStatus::Succeeded => Ok(Some(search.path)),
        _ => Ok(None),
    }
}
