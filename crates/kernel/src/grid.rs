use labyrinth_common::{Direction, GridPoint};

use crate::maze::{DenseMaze, OPEN, RAW_WALL};

/// Per-cell wall flags plus the `visited` marks used while carving.
///
/// A `true` wall flag means that wall has been broken. Breaking the wall
/// between two cells always sets both mirrored flags together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: usize,
    height: usize,
    walls: Vec<[bool; 4]>,
    visited: Vec<bool>,
}

impl CellGrid {
    /// A grid with every wall intact and nothing visited.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: vec![[false; 4]; width * height],
            visited: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, at: GridPoint) -> usize {
        debug_assert!(self.contains(at), "{at:?} outside {}x{}", self.width, self.height);
        at.y * self.width + at.x
    }

    pub fn contains(&self, at: GridPoint) -> bool {
        at.x < self.width && at.y < self.height
    }

    /// Set a single wall flag. Used for the entry and exit, which open
    /// onto the outside and have no mirrored neighbor.
    pub fn break_wall(&mut self, dir: Direction, at: GridPoint) {
        let i = self.index(at);
        self.walls[i][dir.index()] = true;
    }

    pub fn is_broken(&self, dir: Direction, at: GridPoint) -> bool {
        self.walls[self.index(at)][dir.index()]
    }

    /// Neighbor in `dir`, if it lies inside the grid.
    pub fn neighbor(&self, dir: Direction, at: GridPoint) -> Option<GridPoint> {
        at.step(dir).filter(|p| self.contains(*p))
    }

    /// Carve from `at` into its neighbor in `dir`.
    ///
    /// Breaks the wall on both sides, marks the neighbor visited and
    /// returns it. `None` (and no change) when the neighbor is off-grid.
    pub fn move_through(&mut self, dir: Direction, at: GridPoint) -> Option<GridPoint> {
        let next = self.neighbor(dir, at)?;
        self.break_wall(dir, at);
        self.break_wall(dir.opposite(), next);
        self.mark_visited(next);
        Some(next)
    }

    pub fn is_visited(&self, at: GridPoint) -> bool {
        self.visited[self.index(at)]
    }

    pub fn mark_visited(&mut self, at: GridPoint) {
        let i = self.index(at);
        self.visited[i] = true;
    }

    /// Unvisited orthogonal neighbors of `at`, in N/E/S/W order.
    pub fn unvisited_directions(&self, at: GridPoint) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| {
                self.neighbor(*dir, at)
                    .is_some_and(|next| !self.is_visited(next))
            })
            .collect()
    }

    /// Number of unvisited orthogonal neighbors. Edges do not wrap.
    pub fn remaining_paths(&self, at: GridPoint) -> usize {
        self.unvisited_directions(at).len()
    }

    /// Count of broken walls shared by two in-grid cells.
    pub fn broken_interior_walls(&self) -> usize {
        let mut count = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let at = GridPoint::new(x, y);
                if x + 1 < self.width && self.is_broken(Direction::East, at) {
                    count += 1;
                }
                if y + 1 < self.height && self.is_broken(Direction::South, at) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Whether every interior wall flag matches its mirror on the neighbor.
    pub fn walls_consistent(&self) -> bool {
        (0..self.height).all(|y| {
            (0..self.width).all(|x| {
                let at = GridPoint::new(x, y);
                Direction::ALL.into_iter().all(|dir| match self.neighbor(dir, at) {
                    Some(next) => self.is_broken(dir, at) == self.is_broken(dir.opposite(), next),
                    None => true,
                })
            })
        })
    }

    /// Expand to the raw dense form: `RAW_WALL` for wall, `OPEN` for floor.
    ///
    /// Cell `(x, y)` owns the 2x2 block at `(2x, 2y)`: corner pillar, north
    /// wall, west wall and the open cell itself. The extra last row and
    /// column close the south and east boundary.
    pub fn to_dense(&self) -> DenseMaze {
        let mut dense = DenseMaze::filled(2 * self.width + 1, 2 * self.height + 1, RAW_WALL);
        for y in 0..self.height {
            for x in 0..self.width {
                let at = GridPoint::new(x, y);
                dense.set(2 * x + 1, 2 * y + 1, OPEN);
                if self.is_broken(Direction::North, at) {
                    dense.set(2 * x + 1, 2 * y, OPEN);
                }
                if self.is_broken(Direction::West, at) {
                    dense.set(2 * x, 2 * y + 1, OPEN);
                }
                if x + 1 == self.width && self.is_broken(Direction::East, at) {
                    dense.set(2 * x + 2, 2 * y + 1, OPEN);
                }
                if y + 1 == self.height && self.is_broken(Direction::South, at) {
                    dense.set(2 * x + 1, 2 * y + 2, OPEN);
                }
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_closed_and_unvisited() {
        let grid = CellGrid::new(3, 2);
        for y in 0..2 {
            for x in 0..3 {
                let at = GridPoint::new(x, y);
                assert!(!grid.is_visited(at));
                for dir in Direction::ALL {
                    assert!(!grid.is_broken(dir, at));
                }
            }
        }
        assert_eq!(grid.broken_interior_walls(), 0);
    }

    #[test]
    fn move_through_breaks_both_sides() {
        let mut grid = CellGrid::new(3, 3);
        let next = grid.move_through(Direction::South, GridPoint::new(1, 0)).unwrap();
        assert_eq!(next, GridPoint::new(1, 1));
        assert!(grid.is_broken(Direction::South, GridPoint::new(1, 0)));
        assert!(grid.is_broken(Direction::North, GridPoint::new(1, 1)));
        assert!(grid.is_visited(next));
        assert!(grid.walls_consistent());
        assert_eq!(grid.broken_interior_walls(), 1);
    }

    #[test]
    fn move_off_grid_is_rejected() {
        let mut grid = CellGrid::new(2, 2);
        assert_eq!(grid.move_through(Direction::West, GridPoint::new(0, 0)), None);
        assert_eq!(grid.move_through(Direction::East, GridPoint::new(1, 1)), None);
        assert!(!grid.is_broken(Direction::West, GridPoint::new(0, 0)));
    }

    #[test]
    fn remaining_paths_does_not_wrap() {
        let mut grid = CellGrid::new(3, 3);
        assert_eq!(grid.remaining_paths(GridPoint::new(0, 0)), 2);
        assert_eq!(grid.remaining_paths(GridPoint::new(1, 1)), 4);
        assert_eq!(grid.remaining_paths(GridPoint::new(2, 1)), 3);

        grid.mark_visited(GridPoint::new(1, 0));
        assert_eq!(grid.remaining_paths(GridPoint::new(0, 0)), 1);
        assert_eq!(
            grid.unvisited_directions(GridPoint::new(1, 1)),
            vec![Direction::East, Direction::South, Direction::West]
        );
    }

    #[test]
    fn single_break_leaves_mirror_untouched() {
        let mut grid = CellGrid::new(2, 1);
        grid.break_wall(Direction::East, GridPoint::new(0, 0));
        assert!(!grid.walls_consistent());
    }

    #[test]
    fn dense_layout_of_carved_pair() {
        let mut grid = CellGrid::new(2, 1);
        grid.break_wall(Direction::North, GridPoint::new(0, 0));
        grid.move_through(Direction::East, GridPoint::new(0, 0));
        grid.break_wall(Direction::East, GridPoint::new(1, 0));

        let dense = grid.to_dense();
        assert_eq!((dense.width(), dense.height()), (5, 3));
        let rows: Vec<Vec<u8>> = dense.rows().map(|r| r.to_vec()).collect();
        assert_eq!(
            rows,
            vec![
                vec![1, 0, 1, 1, 1],
                vec![1, 0, 0, 0, 0],
                vec![1, 1, 1, 1, 1],
            ]
        );
    }
}
