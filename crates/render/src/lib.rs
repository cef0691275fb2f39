//! Software raycaster for the bordered maze.
//!
//! # Invariants
//! - Renderers read the maze and never mutate it; the exit signal is the
//!   only state a frame touches.
//! - Single-thread, strip and chunk rendering produce identical frames.
//! - Texture indices and the maze border are checked when
//!   `RendererDetails` is built, never per pixel.

mod details;
mod dispatch;
mod error;
mod frame;
mod raycast;
mod renderer;
mod texture;
mod timing;

pub use details::{DEFAULT_FLOOR, DEFAULT_SKY, RendererDetails};
pub use dispatch::{ThreadedRenderer, plan_spans};
pub use error::RenderError;
pub use frame::{FrameBuffer, PixelSink, SharedFrame, channels, rgb, shade};
pub use raycast::{HitSide, RayHit, SIDE_SHADE, cast_ray, draw_column};
pub use renderer::{RenderSpan, Renderer, SingleThreadRenderer, build_renderer, render_span};
pub use texture::{BUILTIN_SIZE, Texture, TextureKind, TexturePack};
pub use timing::FrameTimer;
