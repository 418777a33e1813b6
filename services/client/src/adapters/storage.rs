//! services/client/src/adapters/storage.rs
//!
//! Durable and in-memory implementations of the `SessionStorage` port.

use habit_tracker_core::ports::{PortError, PortResult, SessionStorage};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Entries = BTreeMap<String, String>;

//=========================================================================================
// File-backed Store
//=========================================================================================

/// Stores entries as one JSON object in a file.
///
/// Every mutation rewrites the whole file through a sibling temp file and a
/// rename, so a batch either lands completely or not at all. A missing file
/// reads as empty.
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles from this process.
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> PortResult<Entries> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| storage_error(&self.path, e))
    }

    fn save(&self, entries: &Entries) -> PortResult<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_error(&self.path, e)),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let json = serde_json::to_vec_pretty(entries).map_err(|e| storage_error(&self.path, e))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, json).map_err(|e| storage_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> PortError {
    PortError::Storage(format!("{}: {}", path.display(), err))
}

impl SessionStorage for FileSessionStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let _guard = self.guard();
        Ok(self.load()?.remove(key))
    }

    fn set_many(&self, entries: &[(&str, String)]) -> PortResult<()> {
        let _guard = self.guard();
        let mut current = self.load()?;
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }
        self.save(&current)
    }

    fn remove_many(&self, keys: &[&str]) -> PortResult<()> {
        let _guard = self.guard();
        let mut current = match self.load() {
            Ok(current) => current,
            // An unreadable file cannot hold a usable session; replace it.
            Err(_) => Entries::new(),
        };
        for key in keys {
            current.remove(*key);
        }
        self.save(&current)
    }
}

//=========================================================================================
// In-memory Store
//=========================================================================================

/// Keeps entries for the lifetime of the process only.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<Entries>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemorySessionStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> PortResult<()> {
        let mut current = self.entries();
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> PortResult<()> {
        let mut current = self.entries();
        for key in keys {
            current.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn batch_write_survives_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        FileSessionStore::new(&path)
            .set_many(&[("token", "T".to_string()), ("user", "{}".to_string())])
            .unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("T"));
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn removing_every_key_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.set_many(&[("token", "T".to_string())]).unwrap();
        assert!(path.exists());

        store.remove_many(&["token", "user"]).unwrap();
        assert!(!path.exists());
        // Removing again is still fine.
        store.remove_many(&["token", "user"]).unwrap();
    }

    #[test]
    fn corrupt_file_is_a_storage_error_until_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let store = FileSessionStore::new(&path);

        assert!(matches!(store.get("token"), Err(PortError::Storage(_))));
        store.remove_many(&["token", "user"]).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        store.set_many(&[("token", "T".to_string())]).unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("T"));
        store.remove_many(&["token"]).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }
}
