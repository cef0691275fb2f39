use std::path::Path;

use labyrinth_kernel::{ENTRY, EXIT, FIRST_WALL, OPEN};

use crate::error::RenderError;
use crate::frame::{rgb, shade};

/// Side length of the procedural builtin textures.
pub const BUILTIN_SIZE: usize = 64;

/// What a resolved ray hit. Selects the side effect run once per ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Entry,
    Exit,
    Wall,
}

/// An immutable `0xRRGGBB` pixmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Texture {
    pub fn new(name: &str, width: usize, height: usize, pixels: Vec<u32>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyTexture {
                name: name.to_string(),
            });
        }
        if pixels.len() != width * height {
            return Err(RenderError::TextureSize {
                name: name.to_string(),
                width,
                height,
                pixels: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode any image format the `image` crate was built with.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let image = image::open(path)
            .map_err(|source| RenderError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                rgb(r, g, b)
            })
            .collect();
        Self::new(
            &path.display().to_string(),
            width as usize,
            height as usize,
            pixels,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel at `(x, y)`, wrapping out-of-range coordinates.
    pub fn sample(&self, x: usize, y: usize) -> u32 {
        self.pixels[(y % self.height) * self.width + (x % self.width)]
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|p| shade(*p, factor)).collect(),
        }
    }

    fn procedural(f: impl Fn(usize, usize) -> u32) -> Self {
        let pixels = (0..BUILTIN_SIZE * BUILTIN_SIZE)
            .map(|i| f(i % BUILTIN_SIZE, i / BUILTIN_SIZE))
            .collect();
        Self {
            width: BUILTIN_SIZE,
            height: BUILTIN_SIZE,
            pixels,
        }
    }

    fn checker(a: u32, b: u32, cell: usize) -> Self {
        Self::procedural(|x, y| if (x / cell + y / cell) % 2 == 0 { a } else { b })
    }

    fn brick(brick: u32, mortar: u32) -> Self {
        Self::procedural(|x, y| {
            let row = y / 16;
            let offset = if row % 2 == 0 { 0 } else { 16 };
            if y % 16 == 0 || (x + offset) % 32 == 0 {
                mortar
            } else {
                brick
            }
        })
    }

    fn stripes(a: u32, b: u32) -> Self {
        Self::procedural(|x, _| if (x / 8) % 2 == 0 { a } else { b })
    }
}

/// Ordered textures indexed by `maze value - 1`.
///
/// Slot 0 is the entry, slot 1 the exit, and every later slot a wall.
/// A usable pack has at least three walls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturePack {
    entry: Texture,
    exit: Texture,
    walls: Vec<Texture>,
}

impl TexturePack {
    pub const MIN_TEXTURES: usize = 5;

    pub fn new(entry: Texture, exit: Texture, walls: Vec<Texture>) -> Result<Self, RenderError> {
        let found = walls.len() + 2;
        if found < Self::MIN_TEXTURES {
            return Err(RenderError::TexturePackTooSmall {
                found,
                needed: Self::MIN_TEXTURES,
            });
        }
        Ok(Self { entry, exit, walls })
    }

    /// Procedural pack: green entry checker, gold exit checker, three walls.
    pub fn builtin() -> Self {
        Self {
            entry: Texture::checker(rgb(40, 170, 60), rgb(20, 90, 30), 8),
            exit: Texture::checker(rgb(240, 200, 40), rgb(140, 100, 10), 8),
            walls: vec![
                Texture::brick(rgb(150, 50, 40), rgb(180, 180, 170)),
                Texture::checker(rgb(120, 120, 128), rgb(90, 90, 96), 16),
                Texture::stripes(rgb(50, 80, 160), rgb(30, 50, 110)),
            ],
        }
    }

    /// Load `entry.png`, `exit.png` and `wall1.png`, `wall2.png`, ... from
    /// `dir`, stopping at the first missing wall.
    pub fn load_dir(dir: &Path) -> Result<Self, RenderError> {
        let entry = Texture::load(&dir.join("entry.png"))?;
        let exit = Texture::load(&dir.join("exit.png"))?;
        let mut walls = Vec::new();
        loop {
            let path = dir.join(format!("wall{}.png", walls.len() + 1));
            if !path.is_file() {
                break;
            }
            walls.push(Texture::load(&path)?);
        }
        tracing::debug!(dir = %dir.display(), walls = walls.len(), "loaded texture pack");
        Self::new(entry, exit, walls)
    }

    /// Total textures, entry and exit included.
    pub fn texture_count(&self) -> usize {
        self.walls.len() + 2
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Copy of the pack with every texel scaled by `factor`.
    pub fn with_brightness(&self, factor: f64) -> Self {
        Self {
            entry: self.entry.scaled(factor),
            exit: self.exit.scaled(factor),
            walls: self.walls.iter().map(|t| t.scaled(factor)).collect(),
        }
    }

    /// Texture for a non-open maze value.
    pub fn resolve(&self, value: u8) -> Option<(TextureKind, &Texture)> {
        match value {
            OPEN => None,
            ENTRY => Some((TextureKind::Entry, &self.entry)),
            EXIT => Some((TextureKind::Exit, &self.exit)),
            wall => self
                .walls
                .get(usize::from(wall - FIRST_WALL))
                .map(|t| (TextureKind::Wall, t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(color: [u8; 3]) -> image::RgbImage {
        image::RgbImage::from_pixel(4, 4, image::Rgb(color))
    }

    #[test]
    fn builtin_pack_resolves_every_slot() {
        let pack = TexturePack::builtin();
        assert_eq!(pack.texture_count(), 5);
        assert_eq!(pack.wall_count(), 3);
        assert!(pack.resolve(OPEN).is_none());
        assert_eq!(pack.resolve(ENTRY).map(|r| r.0), Some(TextureKind::Entry));
        assert_eq!(pack.resolve(EXIT).map(|r| r.0), Some(TextureKind::Exit));
        for value in FIRST_WALL..FIRST_WALL + 3 {
            assert_eq!(pack.resolve(value).map(|r| r.0), Some(TextureKind::Wall));
        }
        assert!(pack.resolve(FIRST_WALL + 3).is_none());
    }

    #[test]
    fn sample_wraps() {
        let tex = Texture::new("t", 2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(tex.sample(0, 0), 1);
        assert_eq!(tex.sample(3, 0), 2);
        assert_eq!(tex.sample(0, 5), 3);
    }

    #[test]
    fn malformed_textures_rejected() {
        assert!(matches!(
            Texture::new("t", 0, 4, vec![]),
            Err(RenderError::EmptyTexture { .. })
        ));
        assert!(matches!(
            Texture::new("t", 2, 2, vec![0; 3]),
            Err(RenderError::TextureSize { pixels: 3, .. })
        ));
    }

    #[test]
    fn pack_needs_three_walls() {
        let t = Texture::new("t", 1, 1, vec![0]).unwrap();
        let result = TexturePack::new(t.clone(), t.clone(), vec![t.clone(), t]);
        assert!(matches!(
            result,
            Err(RenderError::TexturePackTooSmall { found: 4, needed: 5 })
        ));
    }

    #[test]
    fn brightness_scales_copy_only() {
        let pack = TexturePack::builtin();
        let dim = pack.with_brightness(0.5);
        let (_, original) = pack.resolve(EXIT).unwrap();
        let (_, scaled) = dim.resolve(EXIT).unwrap();
        assert_eq!(scaled.sample(0, 0), shade(original.sample(0, 0), 0.5));
        assert_ne!(dim, pack);
    }

    #[test]
    fn directory_pack_loads_consecutive_walls() {
        let dir = tempfile::tempdir().unwrap();
        solid([0, 255, 0]).save(dir.path().join("entry.png")).unwrap();
        solid([255, 255, 0]).save(dir.path().join("exit.png")).unwrap();
        for i in 1..=4 {
            solid([i * 10, 0, 0]).save(dir.path().join(format!("wall{i}.png"))).unwrap();
        }
        // Gap in numbering ends the scan.
        solid([0, 0, 0]).save(dir.path().join("wall6.png")).unwrap();

        let pack = TexturePack::load_dir(dir.path()).unwrap();
        assert_eq!(pack.wall_count(), 4);
        let (_, entry) = pack.resolve(ENTRY).unwrap();
        assert_eq!(entry.sample(1, 1), rgb(0, 255, 0));
        let (_, wall) = pack.resolve(FIRST_WALL + 3).unwrap();
        assert_eq!(wall.sample(0, 0), rgb(40, 0, 0));
    }

    #[test]
    fn directory_pack_missing_exit_fails() {
        let dir = tempfile::tempdir().unwrap();
        solid([0, 255, 0]).save(dir.path().join("entry.png")).unwrap();
        assert!(matches!(
            TexturePack::load_dir(dir.path()),
            Err(RenderError::Image { .. })
        ));
    }
}
