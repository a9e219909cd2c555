#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::backend::file::FileBackend;
use crate::content::{cache::QueryCache, ContentStore};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::DatabaseConfig::default();
    cfg.normalize_from_env();
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = 10;
    cfg
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = models::db::connect_with_config(&db_config()).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    models::db::connect_with_config(&db_config()).await
}

/// Content store over a fresh JSON-file backend in a temp dir.
pub async fn file_store() -> Result<ContentStore, anyhow::Error> {
    let dir = std::env::temp_dir().join(format!("clean_house_store_{}", uuid::Uuid::new_v4()));
    let backend = FileBackend::open(dir).await?;
    Ok(ContentStore::new(Arc::new(backend), Arc::new(QueryCache::new(60, 64))))
}
