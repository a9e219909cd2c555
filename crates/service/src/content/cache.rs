use std::{future::Future, sync::Arc, time::Duration};

use dashmap::DashMap;
use moka::future::Cache;
use tracing::debug;

use crate::backend::{Row, Table};
use crate::errors::ServiceError;

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Active rows of a collection, public ordering.
    Active(Table),
    /// Every row of a collection, admin ordering.
    All(Table),
    /// A single site-content block by key.
    Block(String),
}

impl QueryKey {
    pub fn table(&self) -> Table {
        match self {
            QueryKey::Active(t) | QueryKey::All(t) => *t,
            QueryKey::Block(_) => Table::SiteContent,
        }
    }
}

/// Rows plus the table generation observed when their load started.
struct Loaded {
    generation: u64,
    rows: Arc<Vec<Row>>,
}

const MAX_LOAD_ATTEMPTS: usize = 3;

/// In-memory query cache shared by every collection.
///
/// Concurrent misses on the same key share one backend load; writes
/// invalidate the affected keys so the next read goes to the backend.
/// Every write also bumps the table's generation: a load that started
/// before the bump is discarded instead of being served or kept.
pub struct QueryCache {
    inner: Cache<QueryKey, Arc<Loaded>>,
    generations: DashMap<Table, u64>,
}

impl QueryCache {
    pub fn new(ttl_secs: u64, max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs.max(1)))
            .build();
        Self { inner, generations: DashMap::new() }
    }

    pub fn from_config(cfg: &configs::CacheConfig) -> Self { Self::new(cfg.ttl_secs, cfg.max_capacity) }

    pub fn generation(&self, table: Table) -> u64 {
        self.generations.get(&table).map(|g| *g).unwrap_or(0)
    }

    /// Cached rows for `key`, loading them with `load` on a miss. `load`
    /// may be called again when a write lands while it runs.
    pub async fn get_or_load<F, Fut>(&self, key: QueryKey, load: F) -> Result<Arc<Vec<Row>>, ServiceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Vec<Row>, ServiceError>>,
    {
        let table = key.table();
        for _ in 0..MAX_LOAD_ATTEMPTS {
            if let Some(entry) = self.inner.get(&key).await {
                if entry.generation == self.generation(table) {
                    common::metrics::cache_lookup(true);
                    return Ok(entry.rows.clone());
                }
            }
            common::metrics::cache_lookup(false);
            let entry = self
                .inner
                .try_get_with(key.clone(), async {
                    let generation = self.generation(table);
                    let rows = load().await?;
                    Ok::<_, ServiceError>(Arc::new(Loaded { generation, rows: Arc::new(rows) }))
                })
                .await
                .map_err(|e: Arc<ServiceError>| (*e).clone())?;
            if entry.generation == self.generation(table) {
                return Ok(entry.rows.clone());
            }
            debug!(event = "cache_stale_load_discarded", %table);
            self.inner.invalidate(&key).await;
        }
        // writes keep landing; answer from the backend without caching
        load().await.map(Arc::new)
    }

    pub async fn invalidate_table(&self, table: Table) {
        *self.generations.entry(table).or_insert(0) += 1;
        self.inner.invalidate(&QueryKey::Active(table)).await;
        self.inner.invalidate(&QueryKey::All(table)).await;
        debug!(event = "cache_invalidated", %table);
    }

    pub async fn invalidate_block(&self, key: &str) {
        self.invalidate_table(Table::SiteContent).await;
        self.inner.invalidate(&QueryKey::Block(key.to_string())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = QueryCache::new(60, 16);
        let loads = AtomicUsize::new(0);
        let loads = &loads;
        for _ in 0..3 {
            let rows = cache
                .get_or_load(QueryKey::All(Table::Services), || async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![serde_json::json!({"id": 1})])
                })
                .await
                .unwrap();
            assert_eq!(rows.len(), 1);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_reload_and_errors_are_not_cached() {
        let cache = QueryCache::new(60, 16);
        let key = QueryKey::Active(Table::Features);
        let err = cache
            .get_or_load(key.clone(), || async { Err(ServiceError::Validation("boom".into())) })
            .await;
        assert_eq!(err.unwrap_err(), ServiceError::Validation("boom".into()));

        cache.get_or_load(key.clone(), || async { Ok(vec![]) }).await.unwrap();
        cache.invalidate_table(Table::Features).await;
        let rows = cache
            .get_or_load(key, || async { Ok(vec![serde_json::json!({})]) })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn load_overtaken_by_a_write_is_not_served() {
        let cache = Arc::new(QueryCache::new(300, 16));
        let stored = Arc::new(AtomicUsize::new(1));
        let first_load = Arc::new(std::sync::atomic::AtomicBool::new(true));
        let read_done = Arc::new(Notify::new());
        let resume = Arc::new(Notify::new());

        let reader = {
            let (cache, stored, first_load) = (cache.clone(), stored.clone(), first_load.clone());
            let (read_done, resume) = (read_done.clone(), resume.clone());
            tokio::spawn(async move {
                cache
                    .get_or_load(QueryKey::Active(Table::Services), || {
                        let (stored, first_load) = (stored.clone(), first_load.clone());
                        let (read_done, resume) = (read_done.clone(), resume.clone());
                        async move {
                            let value = stored.load(Ordering::SeqCst);
                            if first_load.swap(false, Ordering::SeqCst) {
                                // hold the old rows until the write has finished
                                read_done.notify_one();
                                resume.notified().await;
                            }
                            Ok(vec![serde_json::json!({ "title": value })])
                        }
                    })
                    .await
            })
        };

        read_done.notified().await;
        stored.store(2, Ordering::SeqCst);
        cache.invalidate_table(Table::Services).await;
        resume.notify_one();

        let rows = reader.await.unwrap().unwrap();
        assert_eq!(rows[0]["title"], 2);
        let rows = cache
            .get_or_load(QueryKey::Active(Table::Services), || async { Ok(vec![serde_json::json!({ "title": 0 })]) })
            .await
            .unwrap();
        assert_eq!(rows[0]["title"], 2);
    }
}
