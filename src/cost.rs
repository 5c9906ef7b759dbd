use grid_util::point::Point;
use num_traits::Zero;

/// Cost seam of the search engine: supplies the distance estimate and the per-step
/// move cost. Implementations can introduce weighted terrain without touching the
/// engine, as long as the estimate never overestimates the true remaining cost.
pub trait CostModel {
    type Cost: Zero + Ord + Copy;

    /// Estimate of the remaining cost from `a` to `b`.
    fn heuristic(&self, a: &Point, b: &Point) -> Self::Cost;

    /// Cost of moving between the adjacent cells `a` and `b`.
    fn step_cost(&self, a: &Point, b: &Point) -> Self::Cost;
}

/// Uniform cost model for a 4-connected grid: Manhattan distance estimate, every step
/// costs 1. The estimate is admissible and consistent, so the first path the engine
/// completes is a shortest one.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManhattanCost;

impl CostModel for ManhattanCost {
    type Cost = i32;

    fn heuristic(&self, a: &Point, b: &Point) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    fn step_cost(&self, _a: &Point, _b: &Point) -> i32 {
        1
    }
}
