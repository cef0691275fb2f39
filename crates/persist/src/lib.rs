//! Persistence: save records of a maze plus the player's pose.
//!
//! # Invariants
//! - A record carries a SHA-256 digest of its maze and view; restore
//!   fails closed on a mismatch or an unknown schema version.
//! - Restoring bypasses the generator and rebuilds the maze from the
//!   saved dense array.

mod record;
mod store;

pub use record::{PersistError, SCHEMA_VERSION, SaveRecord};
pub use store::SaveStore;
