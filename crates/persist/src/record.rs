use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use labyrinth_common::View;
use labyrinth_kernel::{DenseMaze, KernelError, Maze};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Current save record layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from capturing, storing or restoring a save.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("saved maze is invalid: {0}")]
    InvalidMaze(#[from] KernelError),
    #[error("saved view stands in a non-open cell ({x}, {y})")]
    ViewInWall { x: i64, y: i64 },
    #[error("invalid save slot name: {0:?}")]
    InvalidSlot(String),
    #[error("no save in slot {0:?}")]
    MissingSlot(String),
}

/// Everything needed to resume a game: the bordered maze and the pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub schema_version: u32,
    pub maze: DenseMaze,
    pub view: View,
    /// Hex SHA-256 over the maze cells and the bit patterns of the pose.
    pub hash: String,
}

impl SaveRecord {
    pub fn capture(maze: &Maze, view: &View) -> Result<Self, PersistError> {
        let hash = digest(maze.dense(), view);
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            maze: maze.dense().clone(),
            view: *view,
            hash,
        })
    }

    /// Check the schema version and recompute the digest.
    pub fn verify(&self) -> Result<(), PersistError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PersistError::SchemaMismatch {
                file_version: self.schema_version,
                expected_version: SCHEMA_VERSION,
            });
        }
        let actual = digest(&self.maze, &self.view);
        if actual != self.hash {
            return Err(PersistError::IntegrityMismatch {
                expected: self.hash.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Verify, then rebuild the maze and pose without running the generator.
    pub fn restore(&self) -> Result<(Maze, View), PersistError> {
        self.verify()?;
        let maze = Maze::from_dense(self.maze.clone())?;
        let (x, y) = self.view.cell();
        if !maze.dense().is_open(x, y) {
            return Err(PersistError::ViewInWall { x, y });
        }
        tracing::debug!(entry = ?maze.entry(), exit = ?maze.exit(), "save restored");
        Ok((maze, self.view))
    }

    pub fn write_json(&self, path: &Path) -> Result<(), PersistError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a record. The digest is not checked until `verify` or `restore`.
    pub fn read_json(path: &Path) -> Result<Self, PersistError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn digest(maze: &DenseMaze, view: &View) -> String {
    let mut hasher = Sha256::new();
    hasher.update((maze.width() as u64).to_le_bytes());
    hasher.update((maze.height() as u64).to_le_bytes());
    for row in maze.rows() {
        hasher.update(row);
    }
    for v in [view.position, view.direction, view.plane] {
        hasher.update(v.x.to_bits().to_le_bytes());
        hasher.update(v.y.to_bits().to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}
