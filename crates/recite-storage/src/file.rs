use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use crate::KeyValueStore;

/// File-backed store: one JSON object per file, fully read at construction
/// and fully rewritten on every mutation. Writes go through a temp file and
/// an atomic rename so a crash mid-write cannot truncate the store.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty;
    /// a corrupt file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(e) = write_entries(&self.path, entries) {
            tracing::error!("failed to persist store {}: {e}", self.path.display());
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return HashMap::new(), // first run
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("corrupt store file {}, starting empty: {e}", path.display());
            HashMap::new()
        }
    }
}

fn write_entries(path: &Path, entries: &HashMap<String, String>) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let temp_file = NamedTempFile::new_in(parent)?;
    let writer = BufWriter::new(&temp_file);
    serde_json::to_writer(writer, entries).map_err(std::io::Error::other)?;
    temp_file.persist(path)?;
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write().expect("storage lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write().expect("storage lock poisoned");
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(&path);
        store.set("a", "1");
        store.set("b", "2");
        store.remove("a");
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b"), Some("2".to_string()));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json {").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("a"), None);

        // and mutations still work afterwards
        store.set("a", "1");
        assert_eq!(store.get("a"), Some("1".to_string()));
    }

    #[test]
    fn missing_file_is_empty_until_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("x"), None);
        assert!(!path.exists());

        store.set("x", "y");
        assert!(path.exists());
    }
}
