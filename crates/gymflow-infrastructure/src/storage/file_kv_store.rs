//! File-backed key-value store.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use gymflow_core::error::{GymError, Result};
use gymflow_core::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::atomic_toml::AtomicTomlFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LocalStateDocument {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// A change applied to the stored document.
enum Mutation {
    Set(Vec<(String, String)>),
    Remove(Vec<String>),
    Clear,
}

impl Mutation {
    fn apply(self, entries: &mut BTreeMap<String, String>) {
        match self {
            Mutation::Set(pairs) => entries.extend(pairs),
            Mutation::Remove(keys) => {
                for key in keys {
                    entries.remove(&key);
                }
            }
            Mutation::Clear => entries.clear(),
        }
    }
}

/// Persists string pairs in a single TOML document.
///
/// Every mutation re-reads the file under an exclusive lock, applies the change
/// and replaces the file atomically, so a failed write (single or batch)
/// leaves both disk and the in-memory copy unchanged. Reads are served from
/// the in-memory copy once loaded.
pub struct FileKeyValueStore {
    file: Arc<AtomicTomlFile<LocalStateDocument>>,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            entries: Mutex::new(None),
        }
    }

    async fn loaded(
        &self,
        slot: &mut Option<BTreeMap<String, String>>,
    ) -> Result<BTreeMap<String, String>> {
        if let Some(entries) = slot.as_ref() {
            return Ok(entries.clone());
        }
        let file = self.file.clone();
        let document = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| GymError::internal(format!("local state load task failed: {e}")))??
            .unwrap_or_default();
        *slot = Some(document.entries.clone());
        Ok(document.entries)
    }

    async fn mutate(&self, mutation: Mutation) -> Result<()> {
        let mut slot = self.entries.lock().await;
        let file = self.file.clone();
        let document = tokio::task::spawn_blocking(move || {
            file.update(LocalStateDocument::default(), |document| {
                mutation.apply(&mut document.entries);
                Ok(())
            })
        })
        .await
        .map_err(|e| GymError::internal(format!("local state save task failed: {e}")))??;
        *slot = Some(document.entries);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut slot = self.entries.lock().await;
        Ok(self.loaded(&mut slot).await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(Mutation::Set(vec![(key.to_string(), value.to_string())]))
            .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.mutate(Mutation::Remove(vec![key.to_string()])).await
    }

    async fn clear(&self) -> Result<()> {
        self.mutate(Mutation::Clear).await
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let mut slot = self.entries.lock().await;
        let entries = self.loaded(&mut slot).await?;
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    async fn multi_set(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let pairs = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        self.mutate(Mutation::Set(pairs)).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        let keys = keys.iter().map(|key| (*key).to_string()).collect();
        self.mutate(Mutation::Remove(keys)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_state.toml");

        let store = FileKeyValueStore::new(path.clone());
        store.set("gymflow.auth.session", "{\"token\":1}").await.unwrap();
        store
            .multi_set(&[("a", "1"), ("b", "2")])
            .await
            .unwrap();
        drop(store);

        let reopened = FileKeyValueStore::new(path);
        assert_eq!(
            reopened.get("gymflow.auth.session").await.unwrap().as_deref(),
            Some("{\"token\":1}")
        );
        assert_eq!(
            reopened.multi_get(&["a", "missing", "b"]).await.unwrap(),
            vec![Some("1".to_string()), None, Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("local_state.toml"));
        store.multi_set(&[("a", "1"), ("b", "2"), ("c", "3")]).await.unwrap();

        store.remove("a").await.unwrap();
        store.multi_remove(&["b"]).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("c").await.unwrap().as_deref(), Some("3"));

        store.clear().await.unwrap();
        assert_eq!(store.get("c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_write_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        // a directory squatting on the file path makes every access fail
        let path = temp_dir.path().join("local_state.toml");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let store = FileKeyValueStore::new(path);
        assert!(store.multi_set(&[("a", "1"), ("b", "2")]).await.is_err());
        assert_eq!(store.get("a").await.ok().flatten(), None);
    }
}
