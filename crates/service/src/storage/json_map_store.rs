use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::backend::BackendError;

/// JSON file holding one `HashMap<K, V>`, rewritten whole on every change.
///
/// Writers hold the lock until the file is saved, so two concurrent writes to
/// the same store land in lock order and the later one wins.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

fn io_err(e: impl std::fmt::Display) -> BackendError { BackendError::Unavailable(e.to_string()) }

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`, creating an empty file if it is missing.
    /// A file that exists but does not parse is an error, never silently reset.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, BackendError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| BackendError::Malformed(format!("{}: {e}", file_path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(io_err)?).await.map_err(io_err)?;
                empty
            }
            Err(e) => return Err(io_err(e)),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut p = self.file_path.clone().into_os_string();
        p.push(".tmp");
        PathBuf::from(p)
    }

    /// Write to a sibling temp file, then rename over the real one, so a
    /// crash mid-write never leaves a truncated store behind.
    async fn save(&self, map: &HashMap<K, V>) -> Result<(), BackendError> {
        let data = serde_json::to_vec_pretty(map).map_err(io_err)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data).await.map_err(io_err)?;
        fs::rename(&tmp, &self.file_path).await.map_err(io_err)
    }

    pub async fn values(&self) -> Vec<V> {
        self.inner.read().await.values().cloned().collect()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.read().await.get(key).cloned()
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, BackendError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(key).is_some();
        if existed {
            self.save(&map).await?;
        }
        Ok(existed)
    }

    /// Apply a mutation under the write lock and persist it. The closure's
    /// output is returned; on closure error nothing is written.
    pub async fn update_map<F, T>(&self, f: F) -> Result<T, BackendError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<T, BackendError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        self.save(&next).await?;
        *map = next;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        assert!(store.values().await.is_empty());

        store.update_map(|m| { m.insert("a".into(), "1".into()); m.insert("b".into(), "2".into()); Ok(()) }).await?;
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        let existed = store.remove(&"b".into()).await?;
        assert!(existed);
        assert!(!store.remove(&"b".into()).await?);

        let reloaded = JsonMapStore::<String, String>::open(&tmp).await?;
        assert_eq!(reloaded.values().await, vec!["1".to_string()]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_leaves_map_untouched() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, i32>::open(&tmp).await?;
        let res: Result<(), _> = store
            .update_map(|m| {
                m.insert("x".into(), 1);
                Err(BackendError::Rejected("no".into()))
            })
            .await;
        assert!(res.is_err());
        assert!(store.get(&"x".into()).await.is_none());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_replaces_the_file_through_a_temp_copy() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, i32>::open(&tmp).await?;
        // leftover from an interrupted write is ignored and replaced
        tokio::fs::write(store.tmp_path(), b"{trunc").await?;

        store.update_map(|m| { m.insert("x".into(), 7); Ok(()) }).await?;
        assert!(tokio::fs::metadata(store.tmp_path()).await.is_err());

        let reloaded = JsonMapStore::<String, i32>::open(&tmp).await?;
        assert_eq!(reloaded.get(&"x".into()).await, Some(7));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonMapStore::<String, i32>::open(&tmp).await;
        assert!(matches!(res, Err(BackendError::Malformed(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
