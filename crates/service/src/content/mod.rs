//! Data Access Layer: typed collections over a [`DataBackend`].
//!
//! - `list` returns active records ordered by `sort_order`, then `id`.
//! - `list_all` returns every record in the same order (admin view).
//! - `create` / `update` / `delete` invalidate the cached reads of the
//!   collection on success. Failures surface unchanged; nothing is retried.

pub mod blocks;
pub mod cache;

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use models::{contact, feature, service, site_content};

use crate::backend::{BackendError, DataBackend, Query, Row, Table};
use crate::errors::ServiceError;
use cache::{QueryCache, QueryKey};

/// A record type stored in one of the sortable collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: Serialize + Send + Sync;
    type Patch: Serialize + Send + Sync;

    const TABLE: Table;
    /// Plain-text columns that may be edited in place on the public pages.
    const TEXT_FIELDS: &'static [&'static str];

    fn id(&self) -> Uuid;
    fn sort_order(&self) -> i32;
    fn is_active(&self) -> bool;
}

impl Record for service::Model {
    type Draft = service::ServiceDraft;
    type Patch = service::ServicePatch;
    const TABLE: Table = Table::Services;
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description", "price", "full_description"];
    fn id(&self) -> Uuid { self.id }
    fn sort_order(&self) -> i32 { self.sort_order }
    fn is_active(&self) -> bool { self.is_active }
}

impl Record for feature::Model {
    type Draft = feature::FeatureDraft;
    type Patch = feature::FeaturePatch;
    const TABLE: Table = Table::Features;
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description"];
    fn id(&self) -> Uuid { self.id }
    fn sort_order(&self) -> i32 { self.sort_order }
    fn is_active(&self) -> bool { self.is_active }
}

impl Record for contact::Model {
    type Draft = contact::ContactDraft;
    type Patch = contact::ContactPatch;
    const TABLE: Table = Table::Contacts;
    const TEXT_FIELDS: &'static [&'static str] = &["label", "value"];
    fn id(&self) -> Uuid { self.id }
    fn sort_order(&self) -> i32 { self.sort_order }
    fn is_active(&self) -> bool { self.is_active }
}

fn decode<T: DeserializeOwned>(row: Row) -> Result<T, ServiceError> {
    serde_json::from_value(row).map_err(|e| BackendError::Malformed(e.to_string()).into())
}

fn encode<T: Serialize>(value: &T) -> Result<Row, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Validation(e.to_string()))
}

/// Read `query` through the cache under `key`.
async fn select_cached(
    cache: &QueryCache,
    backend: &Arc<dyn DataBackend>,
    key: QueryKey,
    query: Query,
) -> Result<Arc<Vec<Row>>, ServiceError> {
    let table = key.table();
    cache
        .get_or_load(key, || {
            let (backend, query) = (backend.clone(), query.clone());
            async move { Ok(backend.select(table, &query).await?) }
        })
        .await
}

/// Typed handle to one record collection.
pub struct Collection<R> {
    backend: Arc<dyn DataBackend>,
    cache: Arc<QueryCache>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Collection<R> {
    fn new(backend: Arc<dyn DataBackend>, cache: Arc<QueryCache>) -> Self {
        Self { backend, cache, _record: PhantomData }
    }

    async fn cached(&self, key: QueryKey, query: Query) -> Result<Vec<R>, ServiceError> {
        let rows = select_cached(&self.cache, &self.backend, key, query).await?;
        rows.iter().cloned().map(decode).collect()
    }

    /// Active records for the public pages.
    pub async fn list(&self) -> Result<Vec<R>, ServiceError> {
        let query = Query::all().eq("is_active", true).order_by("sort_order").order_by("id");
        self.cached(QueryKey::Active(R::TABLE), query).await
    }

    /// Every record regardless of the active flag.
    pub async fn list_all(&self) -> Result<Vec<R>, ServiceError> {
        let query = Query::all().order_by("sort_order").order_by("id");
        self.cached(QueryKey::All(R::TABLE), query).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<R>, ServiceError> {
        Ok(self.list_all().await?.into_iter().find(|r| r.id() == id))
    }

    /// Sort order proposed for a new record: current count + 1.
    pub async fn next_sort_order(&self) -> Result<i32, ServiceError> {
        Ok(self.list_all().await?.len() as i32 + 1)
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<R, ServiceError> {
        let mut row = encode(draft)?;
        let id = Uuid::new_v4();
        if let Some(obj) = row.as_object_mut() {
            obj.insert("id".into(), Value::String(id.to_string()));
        }
        let stored = self.backend.insert(R::TABLE, row).await.map_err(|e| {
            warn!(event = "record_write_failed", table = %R::TABLE, op = "create", error = %e);
            e
        })?;
        self.cache.invalidate_table(R::TABLE).await;
        common::metrics::record_write(R::TABLE.name(), "create");
        info!(event = "record_created", table = %R::TABLE, %id);
        decode(stored)
    }

    pub async fn update(&self, id: Uuid, patch: &R::Patch) -> Result<R, ServiceError> {
        self.update_row(id, encode(patch)?).await
    }

    /// Overwrite one plain-text column, as done by inline editing.
    pub async fn set_text(&self, id: Uuid, field: &str, value: &str) -> Result<R, ServiceError> {
        if !R::TEXT_FIELDS.contains(&field) {
            return Err(ServiceError::Validation(format!("{field} is not editable on {}", R::TABLE)));
        }
        let mut patch = Map::new();
        patch.insert(field.to_string(), Value::String(value.to_string()));
        self.update_row(id, Value::Object(patch)).await
    }

    async fn update_row(&self, id: Uuid, patch: Row) -> Result<R, ServiceError> {
        let updated = self.backend.update(R::TABLE, id, patch).await.map_err(|e| {
            warn!(event = "record_write_failed", table = %R::TABLE, op = "update", %id, error = %e);
            e
        })?;
        let row = updated.ok_or_else(|| ServiceError::not_found(R::TABLE.name()))?;
        self.cache.invalidate_table(R::TABLE).await;
        common::metrics::record_write(R::TABLE.name(), "update");
        info!(event = "record_updated", table = %R::TABLE, %id);
        decode(row)
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let existed = self.backend.delete(R::TABLE, id).await?;
        if existed {
            self.cache.invalidate_table(R::TABLE).await;
            common::metrics::record_write(R::TABLE.name(), "delete");
            info!(event = "record_deleted", table = %R::TABLE, %id);
        }
        Ok(existed)
    }
}

/// Keyed site-content blocks.
pub struct SiteContentBlocks {
    backend: Arc<dyn DataBackend>,
    cache: Arc<QueryCache>,
}

impl SiteContentBlocks {
    pub async fn get(&self, key: &str) -> Result<Option<site_content::Model>, ServiceError> {
        let query = Query::all().eq("block_key", key);
        let rows = select_cached(&self.cache, &self.backend, QueryKey::Block(key.to_string()), query).await?;
        rows.first().cloned().map(decode).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<site_content::Model>, ServiceError> {
        let query = Query::all().order_by("block_key");
        let rows = select_cached(&self.cache, &self.backend, QueryKey::All(Table::SiteContent), query).await?;
        rows.iter().cloned().map(decode).collect()
    }

    /// Merge `fields` into the block's payload, creating the block if it
    /// does not exist yet. Fields not mentioned keep their stored value.
    pub async fn update(&self, key: &str, fields: Map<String, Value>) -> Result<site_content::Model, ServiceError> {
        if key.trim().is_empty() {
            return Err(ServiceError::Validation("block key is empty".into()));
        }
        // read through to the backend, the cached copy may be stale
        let existing = self.backend.select(Table::SiteContent, &Query::all().eq("block_key", key)).await?;
        let row = match existing.into_iter().next() {
            Some(row) => {
                let block: site_content::Model = decode(row)?;
                let mut content = match block.content {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                content.extend(fields);
                let patch = serde_json::json!({ "content": Value::Object(content) });
                self.backend
                    .update(Table::SiteContent, block.id, patch)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("site_content"))?
            }
            None => {
                let row = serde_json::json!({
                    "id": Uuid::new_v4().to_string(),
                    "block_key": key,
                    "content": Value::Object(fields),
                });
                self.backend.insert(Table::SiteContent, row).await?
            }
        };
        self.cache.invalidate_block(key).await;
        common::metrics::record_write(Table::SiteContent.name(), "update");
        info!(event = "block_updated", block_key = key);
        decode(row)
    }

    pub async fn set_text(&self, key: &str, field: &str, value: &str) -> Result<site_content::Model, ServiceError> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), Value::String(value.to_string()));
        self.update(key, fields).await
    }
}

/// Entry point to all four collections, sharing one backend and cache.
#[derive(Clone)]
pub struct ContentStore {
    backend: Arc<dyn DataBackend>,
    cache: Arc<QueryCache>,
}

impl ContentStore {
    pub fn new(backend: Arc<dyn DataBackend>, cache: Arc<QueryCache>) -> Self { Self { backend, cache } }

    /// Typed handle for any of the sortable collections.
    pub fn collection<R: Record>(&self) -> Collection<R> { Collection::new(self.backend.clone(), self.cache.clone()) }

    pub fn services(&self) -> Collection<service::Model> { self.collection() }

    pub fn features(&self) -> Collection<feature::Model> { self.collection() }

    pub fn contacts(&self) -> Collection<contact::Model> { self.collection() }

    pub fn site_content(&self) -> SiteContentBlocks {
        SiteContentBlocks { backend: self.backend.clone(), cache: self.cache.clone() }
    }
}
