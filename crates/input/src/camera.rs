use labyrinth_common::View;
use labyrinth_kernel::DenseMaze;

use crate::action::IntentHandle;
use crate::mover::{Mover, MoverStatus};

/// The player's pose together with the mover that drives it.
pub struct Camera {
    view: View,
    mover: Mover,
}

impl Camera {
    pub fn new(view: View, mover: Mover) -> Self {
        Self { view, mover }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Teleport, e.g. after restoring a save. Intents are left as they are.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    pub fn intents(&self) -> IntentHandle {
        self.mover.intents()
    }

    /// Advance one tick against `maze`.
    pub fn tick(&mut self, maze: &DenseMaze) -> MoverStatus {
        self.mover.update(&mut self.view, maze)
    }
}
