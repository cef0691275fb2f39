use std::sync::Arc;

use labyrinth_common::ExitSignal;
use labyrinth_kernel::DenseMaze;

use crate::error::RenderError;
use crate::frame::{rgb, shade};
use crate::texture::TexturePack;

pub const DEFAULT_SKY: u32 = rgb(70, 90, 130);
pub const DEFAULT_FLOOR: u32 = rgb(60, 56, 52);

/// Everything a frame is drawn from, apart from the view.
///
/// Built once, then shared read-only by every worker through an `Arc`.
/// Changing textures or size means building a new one.
#[derive(Debug)]
pub struct RendererDetails {
    width: usize,
    height: usize,
    textures: TexturePack,
    maze: DenseMaze,
    sky: u32,
    floor: u32,
    exit: Arc<ExitSignal>,
}

impl RendererDetails {
    /// Validate and bake `brightness` into the textures and background.
    pub fn new(
        width: usize,
        height: usize,
        textures: &TexturePack,
        maze: DenseMaze,
        brightness: f64,
        exit: Arc<ExitSignal>,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroDimension { width, height });
        }
        if let Some(p) = maze.border_breach() {
            return Err(RenderError::BorderBreach { x: p.x, y: p.y });
        }
        let max = maze.max_value();
        if usize::from(max) > textures.texture_count() {
            return Err(RenderError::TextureIndexOutOfRange {
                value: max,
                textures: textures.texture_count(),
            });
        }
        Ok(Self {
            width,
            height,
            textures: textures.with_brightness(brightness),
            maze,
            sky: shade(DEFAULT_SKY, brightness),
            floor: shade(DEFAULT_FLOOR, brightness),
            exit,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn textures(&self) -> &TexturePack {
        &self.textures
    }

    pub fn maze(&self) -> &DenseMaze {
        &self.maze
    }

    pub fn sky(&self) -> u32 {
        self.sky
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn exit_signal(&self) -> &Arc<ExitSignal> {
        &self.exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_kernel::{FIRST_WALL, Maze};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn signal() -> Arc<ExitSignal> {
        Arc::new(ExitSignal::new())
    }

    #[test]
    fn generated_maze_accepted() {
        let maze = Maze::generate(6, 6, 3, StdRng::seed_from_u64(8)).unwrap();
        let details = RendererDetails::new(
            32,
            24,
            &TexturePack::builtin(),
            maze.into_dense(),
            1.0,
            signal(),
        )
        .unwrap();
        assert_eq!((details.width(), details.height()), (32, 24));
        assert_eq!(details.sky(), DEFAULT_SKY);
    }

    #[test]
    fn explicit_out_of_range_value_rejected() {
        let maze = DenseMaze::from_rows(&[
            vec![3, 3, 3],
            vec![3, 9, 3],
            vec![3, 3, 3],
        ])
        .unwrap();
        assert!(matches!(
            RendererDetails::new(8, 8, &TexturePack::builtin(), maze, 1.0, signal()),
            Err(RenderError::TextureIndexOutOfRange { value: 9, .. })
        ));
    }

    #[test]
    fn open_border_rejected() {
        let maze = DenseMaze::from_rows(&[
            vec![3, 3, 3],
            vec![3, 0, 0],
            vec![3, 3, 3],
        ])
        .unwrap();
        assert!(matches!(
            RendererDetails::new(8, 8, &TexturePack::builtin(), maze, 1.0, signal()),
            Err(RenderError::BorderBreach { x: 2, y: 1 })
        ));
    }

    #[test]
    fn zero_height_rejected() {
        let maze = DenseMaze::filled(3, 3, FIRST_WALL);
        assert!(matches!(
            RendererDetails::new(8, 0, &TexturePack::builtin(), maze, 1.0, signal()),
            Err(RenderError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn brightness_applies_to_background() {
        let maze = DenseMaze::filled(3, 3, FIRST_WALL);
        let details =
            RendererDetails::new(4, 4, &TexturePack::builtin(), maze, 0.5, signal()).unwrap();
        assert_eq!(details.floor(), shade(DEFAULT_FLOOR, 0.5));
    }
}
