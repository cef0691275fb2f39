//! Player input: movement intents mapped onto the view pose.
//!
//! # Invariants
//! - Intents may be toggled from any thread; the mover samples them once
//!   per tick.
//! - The mover never commits a position whose cell is not open floor.

pub mod action;
mod camera;
mod mover;

pub use action::{Intent, IntentHandle, IntentSet};
pub use camera::Camera;
pub use mover::{Mover, MoverConfig, MoverError, MoverStatus};
