use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A cardinal direction on the maze grid.
///
/// `y` grows southwards, matching row-major storage of the grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed scan order used wherever a deterministic choice is needed.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Index of this direction inside `ALL` (and inside per-cell wall arrays).
    pub fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit step `(dx, dy)` for this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Integer cell coordinate, either in cell-grid or dense-maze space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbor in `dir`, or `None` when it would underflow.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.offset();
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// Player pose: position, facing direction and camera plane.
///
/// The camera plane is perpendicular to `direction`; its length is the
/// field-of-view factor. A negative FOV puts the plane on the player's
/// right, so screen column 0 looks to the left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub position: DVec2,
    pub direction: DVec2,
    pub plane: DVec2,
}

impl View {
    /// Build a pose from a position, a facing direction and a FOV factor.
    pub fn new(position: DVec2, direction: DVec2, fov: f64) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            position,
            direction,
            plane: DVec2::new(direction.y, -direction.x) * fov,
        }
    }

    /// Rotate direction and plane together by `angle` radians.
    ///
    /// Positive angles turn right (clockwise on a y-down map).
    pub fn rotate(&mut self, angle: f64) {
        let rot = DVec2::from_angle(angle);
        self.direction = rot.rotate(self.direction);
        self.plane = rot.rotate(self.plane);
    }

    /// Dense-maze cell containing the position.
    pub fn cell(&self) -> (i64, i64) {
        (
            self.position.x.floor() as i64,
            self.position.y.floor() as i64,
        )
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(DVec2::new(1.5, 1.5), DVec2::Y, -0.66)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn index_follows_scan_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn grid_point_step_saturates_at_origin() {
        let origin = GridPoint::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::South), Some(GridPoint::new(0, 1)));
        assert_eq!(origin.step(Direction::East), Some(GridPoint::new(1, 0)));
    }

    #[test]
    fn plane_is_perpendicular_and_scaled() {
        let view = View::new(DVec2::ZERO, DVec2::Y, -0.66);
        assert!(view.direction.dot(view.plane).abs() < 1e-12);
        assert!((view.plane.length() - 0.66).abs() < 1e-12);
        // Facing south with negative fov, the plane points west (player's right).
        assert!(view.plane.x < 0.0);
    }

    #[test]
    fn rotation_preserves_lengths() {
        let mut view = View::default();
        for _ in 0..100 {
            view.rotate(0.1);
        }
        assert!((view.direction.length() - 1.0).abs() < 1e-9);
        assert!((view.plane.length() - 0.66).abs() < 1e-9);
        assert!(view.direction.dot(view.plane).abs() < 1e-9);
    }

    #[test]
    fn negative_rotation_turns_left() {
        // Facing south, turning left faces east.
        let mut view = View::new(DVec2::ZERO, DVec2::Y, -0.66);
        view.rotate(-std::f64::consts::FRAC_PI_2);
        assert!((view.direction.x - 1.0).abs() < 1e-12);
        assert!(view.direction.y.abs() < 1e-12);
    }

    #[test]
    fn cell_floors_position() {
        let view = View::new(DVec2::new(3.7, 2.2), DVec2::X, -0.66);
        assert_eq!(view.cell(), (3, 2));
    }
}
