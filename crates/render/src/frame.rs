use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::RenderError;

/// Pack 8-bit channels into `0xRRGGBB`.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split `0xRRGGBB` into channels.
pub const fn channels(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Scale every channel by `factor`, saturating at 255.
pub fn shade(color: u32, factor: f64) -> u32 {
    let [r, g, b] = channels(color);
    let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
    rgb(scale(r), scale(g), scale(b))
}

/// Color of row `y` before walls are drawn: sky above the horizon, floor below.
pub fn background(y: usize, height: usize, sky: u32, floor: u32) -> u32 {
    if y < height / 2 { sky } else { floor }
}

/// Destination for rendered pixels.
pub trait PixelSink {
    fn put(&mut self, x: usize, y: usize, color: u32);
}

/// One finished frame: row-major `0xRRGGBB`, `width * height` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn fill_background(&mut self, sky: u32, floor: u32) {
        for (y, row) in self.pixels.chunks_mut(self.width.max(1)).enumerate() {
            row.fill(background(y, self.height, sky, floor));
        }
    }

    /// Interleaved 8-bit RGB, the layout image encoders expect.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| channels(*p)).collect()
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        image::save_buffer(
            path,
            &self.to_rgb_bytes(),
            self.width as u32,
            self.height as u32,
            image::ColorType::Rgb8,
        )
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl PixelSink for FrameBuffer {
    fn put(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }
}

/// Frame storage written by several workers at once.
///
/// Each worker owns a disjoint set of columns, so relaxed stores are
/// enough; the dispatcher's channel barrier orders them before `snapshot`.
#[derive(Debug)]
pub struct SharedFrame {
    width: usize,
    height: usize,
    pixels: Vec<AtomicU32>,
}

impl SharedFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: (0..width * height).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn fill_background(&self, sky: u32, floor: u32) {
        for (i, pixel) in self.pixels.iter().enumerate() {
            let color = background(i / self.width, self.height, sky, floor);
            pixel.store(color, Ordering::Relaxed);
        }
    }

    /// Copy the current contents into an owned frame.
    pub fn snapshot(&self) -> FrameBuffer {
        FrameBuffer {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|p| p.load(Ordering::Relaxed))
                .collect(),
        }
    }
}

impl PixelSink for &SharedFrame {
    fn put(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x].store(color, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_scales_and_saturates() {
        assert_eq!(shade(rgb(200, 100, 40), 0.5), rgb(100, 50, 20));
        assert_eq!(shade(rgb(200, 100, 40), 2.0), rgb(255, 200, 80));
        assert_eq!(shade(rgb(10, 20, 30), 0.0), 0);
    }

    #[test]
    fn background_splits_at_horizon() {
        let mut frame = FrameBuffer::new(4, 6);
        frame.fill_background(1, 2);
        for x in 0..4 {
            assert_eq!(frame.get(x, 0), Some(1));
            assert_eq!(frame.get(x, 2), Some(1));
            assert_eq!(frame.get(x, 3), Some(2));
            assert_eq!(frame.get(x, 5), Some(2));
        }
        assert_eq!(frame.get(4, 0), None);
    }

    #[test]
    fn shared_frame_matches_owned_background() {
        let mut owned = FrameBuffer::new(5, 5);
        owned.fill_background(rgb(1, 2, 3), rgb(4, 5, 6));
        let shared = SharedFrame::new(5, 5);
        shared.fill_background(rgb(1, 2, 3), rgb(4, 5, 6));
        assert_eq!(shared.snapshot(), owned);
    }

    #[test]
    fn rgb_bytes_are_interleaved() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.put(0, 0, rgb(1, 2, 3));
        frame.put(1, 0, rgb(4, 5, 6));
        assert_eq!(frame.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn png_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut frame = FrameBuffer::new(3, 2);
        frame.fill_background(rgb(255, 0, 0), rgb(0, 0, 255));
        frame.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 255]);
    }
}
