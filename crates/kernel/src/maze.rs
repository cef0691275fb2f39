use glam::DVec2;
use labyrinth_common::{Direction, GridPoint, View};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::generator::Generator;

/// Walkable floor.
pub const OPEN: u8 = 0;
/// Entry marker in a finished maze. In raw carver output `1` means wall.
pub const ENTRY: u8 = 1;
/// Exit marker.
pub const EXIT: u8 = 2;
/// First wall texture id; `value - 1` indexes the texture pack.
pub const FIRST_WALL: u8 = 3;
/// Wall value produced by `CellGrid::to_dense`, before texturing.
pub const RAW_WALL: u8 = 1;

/// Errors from building or validating a maze.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("maze grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("at least one wall texture is required")]
    NoWallTextures,
    #[error("too many wall textures: {0}")]
    TooManyWallTextures(usize),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("dense maze {width}x{height} is too small to carry a border")]
    TooSmall { width: usize, height: usize },
    #[error("dense maze declares {width}x{height} but holds {cells} cells")]
    SizeMismatch {
        width: usize,
        height: usize,
        cells: usize,
    },
    #[error("border cell ({x}, {y}) is open")]
    BorderBreach { x: usize, y: usize },
    #[error("expected exactly one {marker} marker, found {found}")]
    MarkerCount { marker: &'static str, found: usize },
}

/// Row-major grid of maze cell values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseMaze {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl DenseMaze {
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Build from explicit rows. All rows must share one length.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, KernelError> {
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(KernelError::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`; `None` outside the array.
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    pub fn at(&self, p: GridPoint) -> Option<u8> {
        self.get(p.x as i64, p.y as i64)
    }

    /// Whether `(x, y)` is walkable floor. Anything outside is solid.
    pub fn is_open(&self, x: i64, y: i64) -> bool {
        self.get(x, y) == Some(OPEN)
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: u8) {
        self.cells[y * self.width + x] = value;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn max_value(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(OPEN)
    }

    /// Every point holding `value`, in row-major order.
    pub fn find(&self, value: u8) -> Vec<GridPoint> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == value)
            .map(|(i, _)| GridPoint::new(i % self.width, i / self.width))
            .collect()
    }

    /// Surround with one ring of `value`.
    pub fn wrap_border(&self, value: u8) -> DenseMaze {
        let mut out = DenseMaze::filled(self.width + 2, self.height + 2, value);
        for (y, row) in self.rows().enumerate() {
            let start = (y + 1) * out.width + 1;
            out.cells[start..start + self.width].copy_from_slice(row);
        }
        out
    }

    /// Strip the outer ring. `None` when there is no interior left.
    pub fn unwrap_border(&self) -> Option<DenseMaze> {
        if self.width < 3 || self.height < 3 {
            return None;
        }
        let width = self.width - 2;
        let mut cells = Vec::with_capacity(width * (self.height - 2));
        for row in self.rows().skip(1).take(self.height - 2) {
            cells.extend_from_slice(&row[1..=width]);
        }
        Some(DenseMaze {
            width,
            height: self.height - 2,
            cells,
        })
    }

    /// First open cell on the outer ring, if any.
    pub fn border_breach(&self) -> Option<GridPoint> {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return None;
        }
        let top_bottom = (0..w).flat_map(|x| [GridPoint::new(x, 0), GridPoint::new(x, h - 1)]);
        let sides = (0..h).flat_map(|y| [GridPoint::new(0, y), GridPoint::new(w - 1, y)]);
        top_bottom
            .chain(sides)
            .find(|p| self.at(*p) == Some(OPEN))
    }

    /// Flood fill over open cells from `from` to `to`.
    ///
    /// The endpoints themselves may hold any value (entry and exit markers
    /// are not floor).
    pub fn reachable(&self, from: GridPoint, to: GridPoint) -> bool {
        if self.at(from).is_none() || self.at(to).is_none() {
            return false;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        seen[from.y * self.width + from.x] = true;
        while let Some(p) = queue.pop_front() {
            if p == to {
                return true;
            }
            for dir in Direction::ALL {
                let Some(next) = p.step(dir) else { continue };
                let passable = next == to || self.at(next) == Some(OPEN);
                if passable && !seen[next.y * self.width + next.x] {
                    seen[next.y * self.width + next.x] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

impl fmt::Display for DenseMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for value in row {
                let glyph = match *value {
                    OPEN => "  ",
                    ENTRY => "EE",
                    EXIT => "XX",
                    _ => "██",
                };
                f.write_str(glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A finished, bordered maze: textured walls, one entry, one exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    dense: DenseMaze,
    entry: GridPoint,
    exit: GridPoint,
}

impl Maze {
    /// Carve a `width x height` cell maze and assign each wall one of
    /// `wall_textures` texture ids drawn from `rng`.
    pub fn generate<R: Rng>(
        width: usize,
        height: usize,
        wall_textures: usize,
        mut rng: R,
    ) -> Result<Self, KernelError> {
        if wall_textures == 0 {
            return Err(KernelError::NoWallTextures);
        }
        if wall_textures > usize::from(u8::MAX - FIRST_WALL) + 1 {
            return Err(KernelError::TooManyWallTextures(wall_textures));
        }
        let carved = Generator::new(width, height, &mut rng)?.run();

        let mut dense = carved.dense;
        for value in dense.cells.iter_mut() {
            if *value == RAW_WALL {
                *value = FIRST_WALL + rng.gen_range(0..wall_textures) as u8;
            }
        }
        dense.set(carved.entry.x, carved.entry.y, ENTRY);
        dense.set(carved.exit.x, carved.exit.y, EXIT);

        let shift = |p: GridPoint| GridPoint::new(p.x + 1, p.y + 1);
        Ok(Self {
            dense: dense.wrap_border(FIRST_WALL),
            entry: shift(carved.entry),
            exit: shift(carved.exit),
        })
    }

    /// Generate with an OS-seeded cryptographically strong RNG.
    pub fn random(width: usize, height: usize, wall_textures: usize) -> Result<Self, KernelError> {
        Self::generate(width, height, wall_textures, StdRng::from_entropy())
    }

    /// Rebuild from a bordered dense array, e.g. a restored save.
    pub fn from_dense(dense: DenseMaze) -> Result<Self, KernelError> {
        if dense.cells.len() != dense.width * dense.height {
            return Err(KernelError::SizeMismatch {
                width: dense.width,
                height: dense.height,
                cells: dense.cells.len(),
            });
        }
        if dense.width < 3 || dense.height < 3 {
            return Err(KernelError::TooSmall {
                width: dense.width,
                height: dense.height,
            });
        }
        if let Some(p) = dense.border_breach() {
            return Err(KernelError::BorderBreach { x: p.x, y: p.y });
        }
        let entry = single_marker(&dense, ENTRY, "entry")?;
        let exit = single_marker(&dense, EXIT, "exit")?;
        Ok(Self { dense, entry, exit })
    }

    pub fn dense(&self) -> &DenseMaze {
        &self.dense
    }

    pub fn into_dense(self) -> DenseMaze {
        self.dense
    }

    pub fn entry(&self) -> GridPoint {
        self.entry
    }

    pub fn exit(&self) -> GridPoint {
        self.exit
    }

    /// Open cell next to the entry where a new game starts.
    pub fn spawn_point(&self) -> GridPoint {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.entry.step(dir))
            .find(|p| self.dense.at(*p) == Some(OPEN))
            .unwrap_or(self.entry)
    }

    /// Pose at the centre of the spawn cell, looking away from the entry.
    pub fn spawn_view(&self, fov: f64) -> View {
        let spawn = self.spawn_point();
        let center = |p: GridPoint| DVec2::new(p.x as f64 + 0.5, p.y as f64 + 0.5);
        let facing = center(spawn) - center(self.entry);
        let facing = if facing == DVec2::ZERO { DVec2::Y } else { facing };
        View::new(center(spawn), facing, fov)
    }

    pub fn is_solvable(&self) -> bool {
        self.dense.reachable(self.entry, self.exit)
    }
}

fn single_marker(
    dense: &DenseMaze,
    value: u8,
    marker: &'static str,
) -> Result<GridPoint, KernelError> {
    match dense.find(value).as_slice() {
        [p] => Ok(*p),
        found => Err(KernelError::MarkerCount {
            marker,
            found: found.len(),
        }),
    }
}
