//! Persistence for the user's known-word list.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnownWordsFile {
    updated_at: String,
    count: usize,
    words: Vec<String>,
}

/// JSON-file-backed store of words the user has marked as known.
///
/// Reads tolerate a missing or unparsable file: both yield the empty set
/// (the latter with a warning), never an error. Mutations are
/// read-modify-write cycles serialized by an internal lock; words are
/// lowercased on the way in and stored sorted.
pub struct KnownWordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl KnownWordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current known-word set.
    pub fn load(&self) -> HashSet<String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return HashSet::new(),
        };
        match serde_json::from_str::<KnownWordsFile>(&data) {
            Ok(file) => file.words.into_iter().collect(),
            Err(err) => {
                warn!("could not parse {}: {err}", self.path.display());
                HashSet::new()
            }
        }
    }

    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Replace the stored set wholesale.
    pub fn save(&self, words: &HashSet<String>) -> Result<()> {
        let _guard = self.guard();
        self.write(words)
    }

    /// Add words (lowercased) to the stored set. Returns the new count.
    pub fn add<I>(&self, words: I) -> Result<usize>
    where
        I: IntoIterator<Item = String>,
    {
        let _guard = self.guard();
        let mut known = self.load();
        for word in words {
            known.insert(word.to_lowercase());
        }
        self.write(&known)?;
        Ok(known.len())
    }

    /// Remove a word from the stored set. Returns the new count.
    pub fn remove(&self, word: &str) -> Result<usize> {
        let _guard = self.guard();
        let mut known = self.load();
        known.remove(&word.to_lowercase());
        self.write(&known)?;
        Ok(known.len())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, words: &HashSet<String>) -> Result<()> {
        let mut sorted: Vec<String> = words.iter().cloned().collect();
        sorted.sort();
        let file = KnownWordsFile {
            updated_at: chrono::Utc::now().to_rfc3339(),
            count: sorted.len(),
            words: sorted,
        };
        let json = serde_json::to_string_pretty(&file).context("serialize known words")?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> KnownWordStore {
        KnownWordStore::new(dir.path().join("known-words.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json at all").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn add_lowercases_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let count = store.add(["Cat".to_string(), "DOG".to_string()]).unwrap();
        assert_eq!(count, 2);

        let loaded = store.load();
        assert!(loaded.contains("cat"));
        assert!(loaded.contains("dog"));
    }

    #[test]
    fn remove_deletes_a_word() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(["cat".to_string(), "dog".to_string()]).unwrap();

        let count = store.remove("Cat").unwrap();
        assert_eq!(count, 1);
        assert!(!store.load().contains("cat"));
    }

    #[test]
    fn file_format_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(["zebra".to_string(), "ant".to_string()]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["count"], 2);
        // Sorted on disk, timestamp present.
        assert_eq!(value["words"][0], "ant");
        assert_eq!(value["words"][1], "zebra");
        assert!(value["updatedAt"].as_str().is_some());
    }
}
