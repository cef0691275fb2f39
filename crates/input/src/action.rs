use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A continuous movement intent, held while its key is down.
///
/// The mover consumes intents, never raw key events, so any front end
/// (keyboard, scripted replay, tests) drives the same motion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    PanLeft,
    PanRight,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Forward,
        Intent::Back,
        Intent::StrafeLeft,
        Intent::StrafeRight,
        Intent::PanLeft,
        Intent::PanRight,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of which intents were held at sampling time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentSet([bool; 6]);

impl IntentSet {
    pub fn contains(&self, intent: Intent) -> bool {
        self.0[intent.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|held| *held)
    }
}

/// Shared, thread-safe intent flags.
///
/// Cloning yields another handle onto the same flags. "Stop" only clears
/// a flag; motion itself is evaluated once per tick by the mover.
#[derive(Debug, Clone, Default)]
pub struct IntentHandle {
    flags: Arc<[AtomicBool; 6]>,
}

impl IntentHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, intent: Intent, held: bool) {
        self.flags[intent.index()].store(held, Ordering::Release);
    }

    pub fn is_held(&self, intent: Intent) -> bool {
        self.flags[intent.index()].load(Ordering::Acquire)
    }

    /// Read every flag once.
    pub fn snapshot(&self) -> IntentSet {
        let mut set = IntentSet::default();
        for intent in Intent::ALL {
            set.0[intent.index()] = self.is_held(intent);
        }
        set
    }

    /// Release every intent.
    pub fn clear(&self) {
        for intent in Intent::ALL {
            self.set(intent, false);
        }
    }

    pub fn move_forward(&self) {
        self.set(Intent::Forward, true);
    }

    pub fn stop_forward(&self) {
        self.set(Intent::Forward, false);
    }

    pub fn move_back(&self) {
        self.set(Intent::Back, true);
    }

    pub fn stop_back(&self) {
        self.set(Intent::Back, false);
    }

    pub fn strafe_left(&self) {
        self.set(Intent::StrafeLeft, true);
    }

    pub fn stop_strafe_left(&self) {
        self.set(Intent::StrafeLeft, false);
    }

    pub fn strafe_right(&self) {
        self.set(Intent::StrafeRight, true);
    }

    pub fn stop_strafe_right(&self) {
        self.set(Intent::StrafeRight, false);
    }

    pub fn pan_left(&self) {
        self.set(Intent::PanLeft, true);
    }

    pub fn stop_pan_left(&self) {
        self.set(Intent::PanLeft, false);
    }

    pub fn pan_right(&self) {
        self.set(Intent::PanRight, true);
    }

    pub fn stop_pan_right(&self) {
        self.set(Intent::PanRight, false);
    }
}
