use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{merge_patch, BackendError, DataBackend, Query, Row, Table};
use crate::storage::json_map_store::JsonMapStore;

/// JSON-file backend: one `{table}.json` map per collection under `dir`.
///
/// Used for local development without Postgres and by the test suites.
pub struct FileBackend {
    tables: HashMap<Table, Arc<JsonMapStore<Uuid, Row>>>,
}

impl FileBackend {
    pub async fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, BackendError> {
        let dir = dir.into();
        let mut tables = HashMap::new();
        for table in Table::ALL {
            let store = JsonMapStore::open(dir.join(format!("{}.json", table.name()))).await?;
            tables.insert(table, store);
        }
        Ok(Self { tables })
    }

    fn store(&self, table: Table) -> Result<&Arc<JsonMapStore<Uuid, Row>>, BackendError> {
        self.tables
            .get(&table)
            .ok_or_else(|| BackendError::Unavailable(format!("table {table} not opened")))
    }
}

fn row_id(row: &Row) -> Result<Uuid, BackendError> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| BackendError::Malformed("row has no valid id".into()))
}

#[async_trait]
impl DataBackend for FileBackend {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError> {
        let mut rows: Vec<Row> = self.store(table)?.values().await.into_iter().filter(|r| query.matches(r)).collect();
        query.sort(&mut rows);
        debug!(%table, count = rows.len(), "file select");
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, BackendError> {
        let obj = row.as_object_mut().ok_or_else(|| BackendError::Malformed("row must be an object".into()))?;
        if !obj.contains_key("id") {
            obj.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
        let id = row_id(&row)?;
        let stored = row.clone();
        self.store(table)?
            .update_map(move |map| {
                if map.contains_key(&id) {
                    return Err(BackendError::Rejected(format!("duplicate id {id}")));
                }
                // block_key is unique, like the database index
                if table == Table::SiteContent {
                    let key = stored.get("block_key");
                    if map.values().any(|r| r.get("block_key") == key) {
                        return Err(BackendError::Rejected("duplicate block_key".into()));
                    }
                }
                map.insert(id, stored);
                Ok(())
            })
            .await?;
        Ok(row)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Option<Row>, BackendError> {
        self.store(table)?
            .update_map(move |map| {
                Ok(map.get_mut(&id).map(|row| {
                    merge_patch(row, patch);
                    row.clone()
                }))
            })
            .await
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, BackendError> {
        self.store(table)?.remove(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tmp_dir() -> PathBuf { std::env::temp_dir().join(format!("clean_house_file_{}", Uuid::new_v4())) }

    #[tokio::test]
    async fn insert_select_update_delete() -> Result<(), anyhow::Error> {
        let dir = tmp_dir();
        let backend = FileBackend::open(&dir).await?;
        let a = backend.insert(Table::Features, json!({"title": "A", "sort_order": 2, "is_active": true})).await?;
        backend.insert(Table::Features, json!({"title": "B", "sort_order": 1, "is_active": false})).await?;

        let active = backend.select(Table::Features, &Query::all().eq("is_active", true).order_by("sort_order")).await?;
        assert_eq!(active.len(), 1);
        let all = backend.select(Table::Features, &Query::all().order_by("sort_order")).await?;
        assert_eq!(all[0]["title"], "B");

        let id = row_id(&a)?;
        let updated = backend.update(Table::Features, id, json!({"title": "A2"})).await?.unwrap();
        assert_eq!(updated["title"], "A2");
        assert_eq!(updated["sort_order"], 2);
        assert!(backend.update(Table::Features, Uuid::new_v4(), json!({})).await?.is_none());

        assert!(backend.delete(Table::Features, id).await?);
        assert_eq!(backend.select(Table::Features, &Query::all()).await?.len(), 1);

        // reopen reads what was persisted
        let reopened = FileBackend::open(&dir).await?;
        assert_eq!(reopened.select(Table::Features, &Query::all()).await?.len(), 1);
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn block_key_is_unique() -> Result<(), anyhow::Error> {
        let dir = tmp_dir();
        let backend = FileBackend::open(&dir).await?;
        backend.insert(Table::SiteContent, json!({"block_key": "hero", "content": {}})).await?;
        let dup = backend.insert(Table::SiteContent, json!({"block_key": "hero", "content": {}})).await;
        assert!(matches!(dup, Err(BackendError::Rejected(_))));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
