use grid_util::point::Point;
use rand::Rng;

use crate::grid::ObstacleGrid;

/// Scatters up to `count` blockades uniformly over the grid using the supplied random
/// source. Picks that land on an already blocked cell are skipped, so fewer than
/// `count` cells may end up newly blocked. The random source is injected rather than
/// taken from a global so a fixed seed reproduces the same layout.
pub fn scatter_obstacles<R: Rng>(grid: &mut ObstacleGrid, count: usize, rng: &mut R) {
    let w = grid.grid.width as i32;
    let h = grid.grid.height as i32;
    for _ in 0..count {
        let p = Point::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if grid.is_passable(p) {
            grid.set_blocked(p, true);
        }
    }
}
