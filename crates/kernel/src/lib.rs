//! Maze kernel: cell grid, generator, and the bordered dense map the
//! renderer and mover read.
//!
//! # Invariants
//! - Walls between neighbors are broken on both sides at once.
//! - The carved graph is a spanning tree: one path between any two cells.
//! - A `Maze` is never mutated after construction and its outer ring is
//!   solid wall, so ray traversal cannot leave the array.

mod generator;
mod grid;
mod maze;

pub use generator::{Carved, GenState, Generator};
pub use grid::CellGrid;
pub use maze::{DenseMaze, KernelError, Maze, ENTRY, EXIT, FIRST_WALL, OPEN, RAW_WALL};
