//! Directory of named save slots.
//!
//! Layout inside the store directory:
//! ```text
//! <slot>.save.json       - one SaveRecord per slot
//! <slot>.save.json.tmp   - in-flight write, renamed over the slot when complete
//! ```

use std::path::{Path, PathBuf};

use crate::record::{PersistError, SaveRecord};

const SUFFIX: &str = ".save.json";
const TMP_SUFFIX: &str = ".tmp";

/// File-backed save slots under one root directory.
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    /// Open the store, creating the directory if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `record` to `slot`, replacing any previous save there.
    ///
    /// The record goes to a temporary file first and is renamed into place,
    /// so an interrupted save leaves the previous slot contents intact.
    pub fn save(&self, slot: &str, record: &SaveRecord) -> Result<PathBuf, PersistError> {
        let path = self.slot_path(slot)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);
        if let Err(err) = record.write_json(&tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err);
        }
        std::fs::rename(&tmp, &path)?;
        tracing::info!(slot, path = %path.display(), "game saved");
        Ok(path)
    }

    /// Read and verify the record in `slot`.
    pub fn load(&self, slot: &str) -> Result<SaveRecord, PersistError> {
        let path = self.slot_path(slot)?;
        if !path.is_file() {
            return Err(PersistError::MissingSlot(slot.to_string()));
        }
        let record = SaveRecord::read_json(&path)?;
        record.verify()?;
        Ok(record)
    }

    /// Slot names present on disk, sorted.
    pub fn slots(&self) -> Result<Vec<String>, PersistError> {
        let mut slots = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            if let Some(slot) = name.to_str().and_then(|n| n.strip_suffix(SUFFIX)) {
                slots.push(slot.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }

    pub fn remove(&self, slot: &str) -> Result<(), PersistError> {
        let path = self.slot_path(slot)?;
        if !path.is_file() {
            return Err(PersistError::MissingSlot(slot.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf, PersistError> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistError::InvalidSlot(slot.to_string()));
        }
        Ok(self.root.join(format!("{slot}{SUFFIX}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_kernel::Maze;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(seed: u64) -> SaveRecord {
        let maze = Maze::generate(4, 4, 3, StdRng::seed_from_u64(seed)).unwrap();
        SaveRecord::capture(&maze, &maze.spawn_view(-0.66)).unwrap()
    }

    #[test]
    fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path().join("saves")).unwrap();
        assert!(store.root().is_dir());
        assert!(store.slots().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path()).unwrap();
        let saved = record(1);
        store.save("quick", &saved).unwrap();
        assert_eq!(store.load("quick").unwrap(), saved);
    }

    #[test]
    fn slots_listed_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path()).unwrap();
        store.save("b", &record(1)).unwrap();
        store.save("a", &record(2)).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(store.slots().unwrap(), vec!["a".to_string(), "b".to_string()]);

        store.remove("a").unwrap();
        assert_eq!(store.slots().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn overwrite_replaces_slot_without_leftovers() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path()).unwrap();
        store.save("quick", &record(1)).unwrap();
        let newer = record(2);
        store.save("quick", &newer).unwrap();

        assert_eq!(store.load("quick").unwrap(), newer);
        let files: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, vec!["quick.save.json".to_string()]);
    }

    #[test]
    fn interrupted_write_keeps_previous_save() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path()).unwrap();
        let saved = record(4);
        store.save("slot1", &saved).unwrap();

        // A crash mid-save leaves a truncated temporary beside the slot.
        std::fs::write(tmp.path().join("slot1.save.json.tmp"), "{\"schema_ver").unwrap();

        assert_eq!(store.load("slot1").unwrap(), saved);
        assert_eq!(store.slots().unwrap(), vec!["slot1".to_string()]);

        store.save("slot1", &record(5)).unwrap();
        assert!(!tmp.path().join("slot1.save.json.tmp").exists());
    }

    #[test]
    fn corrupted_file_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path()).unwrap();
        let path = store.save("slot1", &record(3)).unwrap();

        let mut tampered: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        tampered["view"]["position"][0] = serde_json::json!(2.75);
        std::fs::write(&path, tampered.to_string()).unwrap();

        assert!(matches!(
            store.load("slot1"),
            Err(PersistError::IntegrityMismatch { .. })
        ));
    }

    #[test]
    fn bad_slot_names_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SaveStore::open(tmp.path()).unwrap();
        for slot in ["", "../escape", "a b", "x/y"] {
            assert!(matches!(
                store.save(slot, &record(0)),
                Err(PersistError::InvalidSlot(_))
            ));
        }
        assert!(matches!(
            store.load("absent"),
            Err(PersistError::MissingSlot(_))
        ));
    }
}
