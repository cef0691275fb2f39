//! Game session: the one owner of maze, camera and renderer.
//!
//! # Invariants
//! - Each tick integrates movement before rendering, on the calling thread.
//! - Renderer or texture swaps build a complete replacement first, so the
//!   next frame sees either the old or the new setup, never a mix.
//! - The mover and every renderer share one exit signal per game.

mod session;

pub use session::{Session, SessionError, Tick, load_textures};
