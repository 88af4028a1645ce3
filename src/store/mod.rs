use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::config::StoreConfig;
use crate::models::Crush;

/// Errors from CrushStore
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed crush collection in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize crush collection: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// How a new record's id is derived from the current collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `len + 1`. Reuses live ids once anything has been deleted.
    Length,
    /// `max(id) + 1`, or 1 for an empty collection
    NextAfterMax,
}

impl IdStrategy {
    pub fn next_id(&self, collection: &[Crush]) -> u64 {
        match self {
            IdStrategy::Length => collection.len() as u64 + 1,
            IdStrategy::NextAfterMax => collection.iter().map(|c| c.id).max().unwrap_or(0) + 1,
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" | "len" | "legacy" => Ok(IdStrategy::Length),
            "max" | "next_after_max" => Ok(IdStrategy::NextAfterMax),
            other => Err(format!("unknown id strategy: {}", other)),
        }
    }
}

/// Whole-collection accessor for the crush JSON document.
///
/// Every mutation goes through [`CrushStore::modify`], which holds a single
/// writer lock across load, mutate and save. With caching enabled the last
/// loaded or saved collection is served from memory; every successful save
/// replaces it, so readers always see the latest write.
pub struct CrushStore {
    path: PathBuf,
    id_strategy: IdStrategy,
    writer: Mutex<()>,
    cache: Option<RwLock<Option<Vec<Crush>>>>,
}

impl CrushStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_strategy: IdStrategy::NextAfterMax,
            writer: Mutex::new(()),
            cache: None,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.path.clone())
            .with_id_strategy(config.id_strategy)
            .with_cache(config.cache_enabled)
    }

    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| RwLock::new(None));
        self
    }

    /// Load the full collection. A missing file is an error, never created here.
    pub async fn load(&self) -> Result<Vec<Crush>, StoreError> {
        // Fast path: serve from cache
        if let Some(cache) = &self.cache {
            if let Some(collection) = cache.read().await.as_ref() {
                return Ok(collection.clone());
            }
        }

        let collection = self.read_file().await?;

        if let Some(cache) = &self.cache {
            // A concurrent save may already have filled the cache with newer data
            let mut slot = cache.write().await;
            if slot.is_none() {
                *slot = Some(collection.clone());
            }
        }

        Ok(collection)
    }

    /// Overwrite the document with `collection`.
    pub async fn save(&self, collection: &[Crush]) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;
        self.persist(collection).await
    }

    /// Read-modify-write under the writer lock. Nothing is saved when `f` fails.
    pub async fn modify<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Vec<Crush>, IdStrategy) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.writer.lock().await;

        let mut collection = self.load().await?;
        let result = f(&mut collection, self.id_strategy)?;
        self.persist(&collection).await?;

        Ok(result)
    }

    async fn read_file(&self) -> Result<Vec<Crush>, StoreError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let collection: Vec<Crush> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded {} crush records from {}", collection.len(), self.path.display());
        Ok(collection)
    }

    // Caller must hold the writer lock
    async fn persist(&self, collection: &[Crush]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(collection).map_err(StoreError::Serialize)?;

        // Write a sibling file, then rename over the store
        let tmp_path = self.tmp_path();
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        tokio::fs::write(&tmp_path, &bytes).await.map_err(write_err)?;
        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(write_err(source));
        }

        if let Some(cache) = &self.cache {
            *cache.write().await = Some(collection.to_vec());
        }

        debug!("Saved {} crush records to {}", collection.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRecord;

    fn crush(id: u64, name: &str) -> Crush {
        Crush {
            id,
            name: name.to_string(),
            age: 30,
            date: DateRecord {
                dated_at: "10/10/2020".to_string(),
                rate: 3,
            },
        }
    }

    fn seeded(dir: &tempfile::TempDir, collection: &[Crush]) -> PathBuf {
        let path = dir.path().join("crush.json");
        std::fs::write(&path, serde_json::to_vec(collection).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_next_id_strategies() {
        let contiguous = vec![crush(1, "Ana"), crush(2, "Bia"), crush(3, "Caio")];
        assert_eq!(IdStrategy::Length.next_id(&contiguous), 4);
        assert_eq!(IdStrategy::NextAfterMax.next_id(&contiguous), 4);

        // After deleting id 2 the legacy strategy collides with id 3
        let gapped = vec![crush(1, "Ana"), crush(3, "Caio")];
        assert_eq!(IdStrategy::Length.next_id(&gapped), 3);
        assert_eq!(IdStrategy::NextAfterMax.next_id(&gapped), 4);

        assert_eq!(IdStrategy::Length.next_id(&[]), 1);
        assert_eq!(IdStrategy::NextAfterMax.next_id(&[]), 1);
    }

    #[test]
    fn test_id_strategy_from_str() {
        assert_eq!("length".parse::<IdStrategy>(), Ok(IdStrategy::Length));
        assert_eq!("MAX".parse::<IdStrategy>(), Ok(IdStrategy::NextAfterMax));
        assert!("uuid".parse::<IdStrategy>().is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CrushStore::new(dir.path().join("absent.json"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(!dir.path().join("absent.json").exists());
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crush.json");
        std::fs::write(&path, b"{\"not\": \"an array\"}").unwrap();

        let err = CrushStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_save_then_load_reflects_last_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir, &[crush(1, "Ana")]);
        let store = CrushStore::new(&path);

        store.save(&[crush(1, "Ana"), crush(2, "Bia")]).await.unwrap();
        store.save(&[crush(2, "Bia")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![crush(2, "Bia")]);
        assert!(!dir.path().join("crush.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_modify_error_does_not_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir, &[crush(1, "Ana")]);
        let store = CrushStore::new(&path);

        let result: anyhow::Result<()> = store
            .modify(|collection, _| {
                collection.clear();
                Err(anyhow::anyhow!("rejected"))
            })
            .await;
        assert!(result.is_err());

        assert_eq!(store.load().await.unwrap(), vec![crush(1, "Ana")]);
    }

    #[tokio::test]
    async fn test_concurrent_modifies_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir, &[]);
        let store = std::sync::Arc::new(CrushStore::new(&path));

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .modify(|collection, ids| {
                        let id = ids.next_id(collection);
                        collection.push(crush(id, &format!("Crush {}", i)));
                        Ok::<_, StoreError>(id)
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 20);
        let mut ids: Vec<u64> = loaded.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_cache_serves_reads_and_tracks_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir, &[crush(1, "Ana")]);
        let store = CrushStore::new(&path).with_cache(true);

        assert_eq!(store.load().await.unwrap().len(), 1);

        // External edits are not seen once cached
        std::fs::write(&path, b"[]").unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);

        // Our own writes are
        store
            .modify(|collection, ids| {
                let id = ids.next_id(collection);
                collection.push(crush(id, "Bia"));
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].id, 2);
    }
}
