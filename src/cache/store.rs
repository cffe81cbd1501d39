use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use thiserror::Error;

use crate::cache::Snapshot;
use crate::models::SourceId;

/// Why a cached snapshot could not be loaded
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file exists but could not be read
    #[error("failed to read cache file: {0}")]
    Io(#[from] io::Error),
    /// The cache file is not a valid snapshot document
    #[error("cache file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Owns the on-disk snapshot documents, one JSON file per storefront
///
/// Documents are plain-overwritten, never merged; no cross-process
/// corruption guard (last writer wins)
pub struct SnapshotStore {
    cache_dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at the platform cache directory
    pub fn new() -> Result<Self> {
        let cache_dir = Self::default_cache_dir()?;
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir })
    }

    /// Create a store rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir })
    }

    /// Get the default cache directory
    pub fn default_cache_dir() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "lootwatch") {
            Ok(proj_dirs.cache_dir().to_path_buf())
        } else {
            // Fallback to home directory
            let home = std::env::var("HOME").context("HOME not set")?;
            Ok(PathBuf::from(home).join(".cache").join("lootwatch"))
        }
    }

    /// Load the snapshot for a source
    ///
    /// A missing file is `Ok(None)`; an unreadable or undeserializable file
    /// is an error the freshness policy treats as "no usable cache"
    pub fn load(&self, source: SourceId) -> Result<Option<Snapshot>, CacheError> {
        let path = self.snapshot_path(source);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(e)),
        };
        let snapshot = serde_json::from_str(&raw)?;
        Ok(Some(snapshot))
    }

    /// Overwrite the snapshot for a source
    pub fn save(&self, source: SourceId, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(source);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
        }
        let content =
            serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
        fs::write(&path, content).context("Failed to write snapshot to cache")?;
        Ok(())
    }

    /// Remove one source's snapshot
    /// Returns true if the snapshot was found and removed
    pub fn remove(&self, source: SourceId) -> Result<bool> {
        let path = self.snapshot_path(source);
        if path.exists() {
            fs::remove_file(&path).context("Failed to remove cached snapshot")?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Clear all cached snapshots
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;
            fs::create_dir_all(&self.cache_dir).context("Failed to recreate cache directory")?;
        }
        Ok(())
    }

    /// List sources that currently have a snapshot on disk
    pub fn list_cached(&self) -> Vec<SourceId> {
        [SourceId::Epic, SourceId::Prime]
            .into_iter()
            .filter(|source| self.snapshot_path(*source).exists())
            .collect()
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the path for a source's snapshot file
    pub fn snapshot_path(&self, source: SourceId) -> PathBuf {
        self.cache_dir.join(format!("{}.json", source.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Offer;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn test_store() -> (SnapshotStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::with_dir(temp_dir.path().to_path_buf()).unwrap();
        (store, temp_dir)
    }

    fn sample_offers() -> Vec<Offer> {
        vec![
            Offer::new("Alpha", "01.06.2024", "https://img.example/a.png"),
            Offer::new("Beta", "15.06.2024", "https://img.example/b.png"),
        ]
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = test_store();
        let snapshot = Snapshot::new(sample_offers());

        store.save(SourceId::Epic, &snapshot).unwrap();

        let loaded = store.load(SourceId::Epic).unwrap().unwrap();
        assert_eq!(loaded.offers, snapshot.offers);
        assert_eq!(loaded.timestamp, snapshot.timestamp);
    }

    #[test]
    fn test_load_missing() {
        let (store, _temp) = test_store();
        assert!(store.load(SourceId::Prime).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt() {
        let (store, _temp) = test_store();
        fs::write(store.snapshot_path(SourceId::Epic), "not json at all").unwrap();

        let result = store.load(SourceId::Epic);
        assert!(matches!(result, Err(CacheError::Corrupt(_))));
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let (store, _temp) = test_store();

        store.save(SourceId::Epic, &Snapshot::new(sample_offers())).unwrap();

        let replacement = Snapshot {
            timestamp: Utc::now() - Duration::hours(2),
            offers: vec![Offer::new("Gamma", "30.06.2024", "https://img.example/c.png")],
        };
        store.save(SourceId::Epic, &replacement).unwrap();

        let loaded = store.load(SourceId::Epic).unwrap().unwrap();
        assert_eq!(loaded.offers.len(), 1);
        assert_eq!(loaded.offers[0].title, "Gamma");
        assert_eq!(loaded.timestamp, replacement.timestamp);
    }

    #[test]
    fn test_sources_use_separate_files() {
        let (store, _temp) = test_store();

        store.save(SourceId::Epic, &Snapshot::new(sample_offers())).unwrap();
        assert!(store.load(SourceId::Prime).unwrap().is_none());

        assert_ne!(
            store.snapshot_path(SourceId::Epic),
            store.snapshot_path(SourceId::Prime)
        );
    }

    #[test]
    fn test_remove() {
        let (store, _temp) = test_store();

        // Remove non-existent returns false
        assert!(!store.remove(SourceId::Epic).unwrap());

        store.save(SourceId::Epic, &Snapshot::new(sample_offers())).unwrap();
        assert!(store.remove(SourceId::Epic).unwrap());
        assert!(store.load(SourceId::Epic).unwrap().is_none());

        // Second remove returns false
        assert!(!store.remove(SourceId::Epic).unwrap());
    }

    #[test]
    fn test_clear() {
        let (store, _temp) = test_store();

        store.save(SourceId::Epic, &Snapshot::new(sample_offers())).unwrap();
        store.save(SourceId::Prime, &Snapshot::new(sample_offers())).unwrap();
        assert_eq!(store.list_cached().len(), 2);

        store.clear().unwrap();
        assert!(store.list_cached().is_empty());
    }
}
