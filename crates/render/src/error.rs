use std::path::PathBuf;

/// Errors raised while building or running a renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("texture pack needs at least {needed} textures, found {found}")]
    TexturePackTooSmall { found: usize, needed: usize },
    #[error("texture '{name}' has no pixels")]
    EmptyTexture { name: String },
    #[error("texture '{name}' is {width}x{height} but holds {pixels} pixels")]
    TextureSize {
        name: String,
        width: usize,
        height: usize,
        pixels: usize,
    },
    #[error("maze value {value} has no texture in a pack of {textures}")]
    TextureIndexOutOfRange { value: u8, textures: usize },
    #[error("maze border is open at ({x}, {y})")]
    BorderBreach { x: usize, y: usize },
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("threaded rendering needs at least one thread")]
    ZeroThreads,
    #[error("chunk count {threads} does not divide frame width {width}")]
    ChunkMismatch { width: usize, threads: usize },
    #[error("ray left the maze at ({x}, {y})")]
    RayEscaped { x: i64, y: i64 },
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("image error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
