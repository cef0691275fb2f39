use glam::DVec2;
use labyrinth_common::{ExitSignal, View};
use labyrinth_kernel::DenseMaze;
use std::sync::Arc;

use crate::action::{Intent, IntentHandle, IntentSet};

/// Errors from building a mover.
#[derive(Debug, thiserror::Error)]
pub enum MoverError {
    #[error("move speed must lie in (0, 1) cells per tick, got {0}")]
    InvalidMoveSpeed(f64),
    #[error("rotation speed must be finite and non-negative, got {0}")]
    InvalidRotSpeed(f64),
}

/// Per-tick motion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoverConfig {
    /// Cells advanced per tick. Below one so a step never skips a wall.
    pub move_speed: f64,
    /// Radians turned per tick.
    pub rot_speed: f64,
    /// Ticks still integrated once the exit has been reached.
    pub grace_frames: u32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.08,
            rot_speed: 0.045,
            grace_frames: 30,
        }
    }
}

/// What a call to `Mover::update` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverStatus {
    /// Normal play.
    Running,
    /// The exit was reached; movement continues for `frames_left` more ticks.
    Closing { frames_left: u32 },
    /// Grace period over. Returned exactly once.
    Completed,
    /// Permanently stopped; the view is no longer touched.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Closing(u32),
    Finished,
}

/// Integrates held intents into a `View`, once per tick.
pub struct Mover {
    config: MoverConfig,
    intents: IntentHandle,
    exit: Arc<ExitSignal>,
    phase: Phase,
}

impl Mover {
    pub fn new(config: MoverConfig, exit: Arc<ExitSignal>) -> Result<Self, MoverError> {
        if !(config.move_speed > 0.0 && config.move_speed < 1.0) {
            return Err(MoverError::InvalidMoveSpeed(config.move_speed));
        }
        if !config.rot_speed.is_finite() || config.rot_speed < 0.0 {
            return Err(MoverError::InvalidRotSpeed(config.rot_speed));
        }
        Ok(Self {
            config,
            intents: IntentHandle::new(),
            exit,
            phase: Phase::Running,
        })
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    /// Handle for the input side. Cheap to clone, safe to send.
    pub fn intents(&self) -> IntentHandle {
        self.intents.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Apply every held intent to `view` for one tick.
    pub fn update(&mut self, view: &mut View, maze: &DenseMaze) -> MoverStatus {
        match self.phase {
            Phase::Finished => return MoverStatus::Finished,
            Phase::Closing(0) => {
                self.phase = Phase::Finished;
                tracing::info!("maze complete");
                return MoverStatus::Completed;
            }
            Phase::Running if self.exit.is_reached() => {
                tracing::info!(grace = self.config.grace_frames, "exit reached, closing maze");
                self.phase = Phase::Closing(self.config.grace_frames);
                if self.config.grace_frames == 0 {
                    return self.update(view, maze);
                }
            }
            _ => {}
        }

        self.integrate(self.intents.snapshot(), view, maze);

        match self.phase {
            Phase::Closing(n) => {
                self.phase = Phase::Closing(n - 1);
                MoverStatus::Closing { frames_left: n - 1 }
            }
            _ => MoverStatus::Running,
        }
    }

    fn integrate(&self, held: IntentSet, view: &mut View, maze: &DenseMaze) {
        let speed = self.config.move_speed;
        let side = view.plane.normalize_or_zero();
        if held.contains(Intent::Forward) {
            translate(view, maze, view.direction * speed);
        }
        if held.contains(Intent::Back) {
            translate(view, maze, -view.direction * speed);
        }
        if held.contains(Intent::StrafeRight) {
            translate(view, maze, side * speed);
        }
        if held.contains(Intent::StrafeLeft) {
            translate(view, maze, -side * speed);
        }
        if held.contains(Intent::PanLeft) {
            view.rotate(-self.config.rot_speed);
        }
        if held.contains(Intent::PanRight) {
            view.rotate(self.config.rot_speed);
        }
    }
}

/// Move by `delta`, committing each axis only if its target cell is open.
fn translate(view: &mut View, maze: &DenseMaze, delta: DVec2) {
    let next_x = view.position.x + delta.x;
    if maze.is_open(next_x.floor() as i64, view.position.y.floor() as i64) {
        view.position.x = next_x;
    }
    let next_y = view.position.y + delta.y;
    if maze.is_open(view.position.x.floor() as i64, next_y.floor() as i64) {
        view.position.y = next_y;
    }
}
