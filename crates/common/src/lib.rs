//! Shared types and configuration for the labyrinth engine.
//!
//! # Invariants
//! - `View` is plain data; whoever holds `&mut View` is the only writer.
//! - `GameSettings::validate` is the single gate for user-supplied config.

mod settings;
mod signal;
mod types;

pub use settings::{GameSettings, RenderMode, SettingsError};
pub use signal::ExitSignal;
pub use types::{Direction, GridPoint, View};
