use core::fmt;

use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// [ObstacleGrid] owns the rectangular obstacle layout: a [BoolGrid] in which a cell
/// holds [true] when blocked, plus a [UnionFind] over passable cells so reachability
/// can be answered without flood-filling per query. Implements [Grid] by building on
/// [BoolGrid].
///
/// Adjacency is implicit and recomputed on demand through [neighbours](Self::neighbours),
/// since the obstacle layout may change between searches.
#[derive(Clone, Debug)]
pub struct ObstacleGrid {
    pub grid: BoolGrid,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for ObstacleGrid {
    fn default() -> ObstacleGrid {
        ObstacleGrid {
            grid: BoolGrid::default(),
            components: UnionFind::new(0),
            components_dirty: false,
        }
    }
}

impl ObstacleGrid {
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && self.grid.index_in_bounds(x as usize, y as usize)
    }

    /// A cell can be traversed when it is in bounds and not blocked.
    pub fn is_passable(&self, p: Point) -> bool {
        self.in_bounds(p.x, p.y) && !self.grid.get_point(p)
    }

    /// The up-to-4 axis-aligned adjacent cells that are in bounds and passable, in the
    /// fixed order down, up, right, left. The result reflects the obstacle layout at
    /// call time and is never cached.
    pub fn neighbours(&self, p: Point) -> SmallVec<[Point; 4]> {
        [
            Point::new(p.x, p.y + 1),
            Point::new(p.x, p.y - 1),
            Point::new(p.x + 1, p.y),
            Point::new(p.x - 1, p.y),
        ]
        .into_iter()
        .filter(|n| self.is_passable(*n))
        .collect()
    }

    /// Marks a cell blocked or passable, keeping the component structure in sync.
    /// Out-of-bounds positions are ignored.
    pub fn set_blocked(&mut self, p: Point, blocked: bool) {
        if self.in_bounds(p.x, p.y) {
            self.set(p.x as usize, p.y as usize, blocked);
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.get_ix_point(point))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Out-of-bounds endpoints
    /// are unreachable.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.in_bounds(start.x, start.y) && self.in_bounds(goal.x, goal.y) {
            let start_ix = self.get_ix_point(start);
            let goal_ix = self.get_ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable grid neighbours to
    /// the same components.
    pub fn generate_components(&mut self) {
        info!("generating connected components");
        let w = self.grid.width;
        let h = self.grid.height;
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w {
            for y in 0..h {
                if !self.grid.get(x, y) {
                    let parent_ix = self.grid.get_ix(x, y);
                    let point = Point::new(x as i32, y as i32);
                    let linked = [
                        Point::new(point.x + 1, point.y),
                        Point::new(point.x, point.y + 1),
                    ]
                    .into_iter()
                    .filter(|p| self.is_passable(*p))
                    .map(|p| self.grid.get_ix(p.x as usize, p.y as usize))
                    .collect::<SmallVec<[usize; 2]>>();
                    for ix in linked {
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for ObstacleGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                write!(f, "{}", if self.grid.get(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Grid<bool> for ObstacleGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        ObstacleGrid {
            grid: BoolGrid::new(width, height, default_value),
            components: UnionFind::new(width * height),
            components_dirty: false,
        }
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y)
    }
    /// Updates a position on the grid. Unblocking joins the newly connected components;
    /// blocking flags the components as dirty since they are (potentially) broken apart
    /// into multiple.
    fn set(&mut self, x: usize, y: usize, blocked: bool) {
        let p = Point::new(x as i32, y as i32);
        if blocked {
            if !self.grid.get(x, y) {
                self.components_dirty = true;
            }
        } else {
            for n in self.neighbours(p) {
                self.components.union(
                    self.grid.get_ix(x, y),
                    self.grid.get_ix(n.x as usize, n.y as usize),
                );
            }
        }
        self.grid.set(x, y, blocked);
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_are_ordered_and_in_bounds() {
        let grid: ObstacleGrid = ObstacleGrid::new(3, 3, false);
        let centre = grid.neighbours(Point::new(1, 1));
        assert_eq!(
            centre.as_slice(),
            [
                Point::new(1, 2),
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(0, 1)
            ]
        );
        // A corner only has two in-bounds neighbours.
        let corner = grid.neighbours(Point::new(0, 0));
        assert_eq!(corner.as_slice(), [Point::new(0, 1), Point::new(1, 0)]);
    }

    #[test]
    fn neighbours_skip_blocked_cells() {
        let mut grid: ObstacleGrid = ObstacleGrid::new(3, 3, false);
        grid.set_blocked(Point::new(1, 2), true);
        grid.set_blocked(Point::new(2, 1), true);
        let centre = grid.neighbours(Point::new(1, 1));
        assert_eq!(centre.as_slice(), [Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn set_blocked_ignores_out_of_bounds() {
        let mut grid: ObstacleGrid = ObstacleGrid::new(2, 2, false);
        grid.set_blocked(Point::new(-1, 0), true);
        grid.set_blocked(Point::new(0, 5), true);
        for x in 0..2 {
            for y in 0..2 {
                assert!(grid.is_passable(Point::new(x, y)));
            }
        }
    }

    /// A blocked column splits the grid into two components.
    #[test]
    fn component_split() {
        let mut grid: ObstacleGrid = ObstacleGrid::new(3, 2, false);
        grid.set(1, 0, true);
        grid.set(1, 1, true);
        grid.generate_components();
        let left = Point::new(0, 0);
        let left_low = Point::new(0, 1);
        let right = Point::new(2, 0);
        assert!(grid.reachable(&left, &left_low));
        assert!(grid.unreachable(&left, &right));
        // Diagonal contact is not adjacency on a 4-connected grid.
        let mut pinched: ObstacleGrid = ObstacleGrid::new(2, 2, false);
        pinched.set(1, 0, true);
        pinched.set(0, 1, true);
        pinched.generate_components();
        assert!(pinched.unreachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    /// Unblocking a cell rejoins components without an explicit regeneration.
    #[test]
    fn unblock_rejoins_components() {
        let mut grid: ObstacleGrid = ObstacleGrid::new(3, 1, false);
        grid.set(1, 0, true);
        grid.generate_components();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
        grid.set(1, 0, false);
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn blocking_marks_components_dirty() {
        let mut grid: ObstacleGrid = ObstacleGrid::new(3, 3, false);
        grid.generate_components();
        assert!(!grid.components_dirty);
        grid.set_blocked(Point::new(1, 1), true);
        assert!(grid.components_dirty);
        grid.update();
        assert!(!grid.components_dirty);
    }
}
