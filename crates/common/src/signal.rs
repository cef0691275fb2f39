use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared flag raised when the player reaches the maze exit.
///
/// The renderer reports every ray that resolves to the exit texture; the
/// mover polls `is_reached` once per tick. Both sides hold it behind an
/// `Arc`, so it is safe to touch from render workers.
#[derive(Debug, Default)]
pub struct ExitSignal {
    hits: AtomicU64,
    reached: AtomicBool,
}

impl ExitSignal {
    /// Perpendicular distance (in cells) at which an exit hit counts as reached.
    pub const REACH: f64 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ray resolved to the exit at `distance`.
    ///
    /// Returns `true` only for the call that first closes the maze.
    pub fn record_hit(&self, distance: f64) -> bool {
        self.hits.fetch_add(1, Ordering::Relaxed);
        distance <= Self::REACH && !self.reached.swap(true, Ordering::AcqRel)
    }

    /// Total exit hits recorded so far.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn is_reached(&self) -> bool {
        self.reached.load(Ordering::Acquire)
    }
}
