//! Persisted relations keyed by document title

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::document::stem;
use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of looking a document up in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRelations {
    NotFound,
    Found { lines: Vec<String> },
}

/// Key-value store of raw relation text, keyed by document title.
///
/// Titles are reduced to their stem, so `notes.md` and `notes.txt` share
/// an entry. Content with no lines counts as not found.
pub trait RelationStore: Send + Sync {
    fn get(&self, title: &str) -> StoreResult<StoredRelations>;
    fn put(&self, title: &str, content: &str) -> StoreResult<()>;
    /// Remove every entry.
    fn clear(&self) -> StoreResult<()>;
}

fn key(title: &str) -> StoreResult<&str> {
    let key = stem(title.trim());
    if key.is_empty() || key.contains(['/', '\\']) {
        return Err(StoreError::InvalidTitle(title.to_string()));
    }
    Ok(key)
}

fn found(content: &str) -> StoredRelations {
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    if lines.is_empty() {
        StoredRelations::NotFound
    } else {
        StoredRelations::Found { lines }
    }
}

/// One `<stem>.txt` file per document in a directory.
pub struct FileRelationStore {
    dir: PathBuf,
}

impl FileRelationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a document title.
    pub fn path_for(&self, title: &str) -> StoreResult<PathBuf> {
        Ok(self.dir.join(format!("{}.txt", key(title)?)))
    }
}

impl RelationStore for FileRelationStore {
    fn get(&self, title: &str) -> StoreResult<StoredRelations> {
        let path = self.path_for(title)?;
        if !path.is_file() {
            return Ok(StoredRelations::NotFound);
        }
        let content = fs::read_to_string(&path)?;
        Ok(found(&content))
    }

    fn put(&self, title: &str, content: &str) -> StoreResult<()> {
        let path = self.path_for(title)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Saved relations");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        let mut removed = 0usize;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        tracing::info!(dir = %self.dir.display(), removed, "Cleared relation store");
        Ok(())
    }
}

/// In-process store.
#[derive(Default)]
pub struct MemoryRelationStore {
    entries: DashMap<String, String>,
}

impl MemoryRelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RelationStore for MemoryRelationStore {
    fn get(&self, title: &str) -> StoreResult<StoredRelations> {
        let key = key(title)?;
        Ok(self
            .entries
            .get(key)
            .map(|content| found(content.value()))
            .unwrap_or(StoredRelations::NotFound))
    }

    fn put(&self, title: &str, content: &str) -> StoreResult<()> {
        self.entries.insert(key(title)?.to_string(), content.to_string());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRelationStore::new(dir.path().join("saved_relations"));

        assert_eq!(store.get("notes.md").unwrap(), StoredRelations::NotFound);
        store.put("notes.md", "a -> r -> b\n---\nc -> r -> d\n").unwrap();

        assert!(dir.path().join("saved_relations/notes.txt").is_file());
        assert_eq!(
            store.get("notes.txt").unwrap(),
            StoredRelations::Found {
                lines: vec!["a -> r -> b".into(), "---".into(), "c -> r -> d".into()]
            }
        );
    }

    #[test]
    fn test_empty_file_counts_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRelationStore::new(dir.path());
        store.put("empty.md", "").unwrap();
        assert_eq!(store.get("empty.md").unwrap(), StoredRelations::NotFound);
    }

    #[test]
    fn test_clear_removes_only_relation_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRelationStore::new(dir.path());
        store.put("one.md", "a -> r -> b").unwrap();
        store.put("two.md", "c -> r -> d").unwrap();
        fs::write(dir.path().join("keep.json"), "{}").unwrap();

        store.clear().unwrap();
        assert_eq!(store.get("one.md").unwrap(), StoredRelations::NotFound);
        assert!(dir.path().join("keep.json").exists());
    }

    #[test]
    fn test_titles_that_escape_the_directory_are_rejected() {
        let store = FileRelationStore::new("unused");
        assert!(matches!(store.get("../etc/passwd"), Err(StoreError::InvalidTitle(_))));
        assert!(matches!(store.put(".hidden", "x"), Err(StoreError::InvalidTitle(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryRelationStore::new();
        store.put("doc.md", "x -> y -> z").unwrap();
        assert_eq!(store.len(), 1);
        assert!(matches!(store.get("doc").unwrap(), StoredRelations::Found { .. }));
        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
