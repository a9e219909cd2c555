//! Runtime environment helpers
//!
//! Wires the data backend and directories chosen in configuration so binary
//! crates do not need to know about `models::db` or `common::env`.

use std::sync::Arc;

use configs::{AppConfig, BackendKind};
use tracing::info;

use crate::backend::{file::FileBackend, seaorm::SeaOrmBackend, DataBackend};

/// Ensure expected directories exist; warn on missing optional ones.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.server.public_dir, &cfg.storage.root_dir).await
}

/// Open the configured backend. For Postgres the returned connection is
/// also handed back so the caller can run migrations on it.
pub async fn open_backend(cfg: &AppConfig) -> anyhow::Result<(Arc<dyn DataBackend>, Option<sea_orm::DatabaseConnection>)> {
    match cfg.backend.kind {
        BackendKind::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            let backend: Arc<dyn DataBackend> = Arc::new(SeaOrmBackend::new(db.clone()));
            info!(backend = "postgres", "data backend ready");
            Ok((backend, Some(db)))
        }
        BackendKind::File => {
            let backend: Arc<dyn DataBackend> = Arc::new(FileBackend::open(&cfg.backend.file_dir).await?);
            info!(backend = "file", dir = %cfg.backend.file_dir, "data backend ready");
            Ok((backend, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_backend_from_config() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("clean_house_rt_{}", uuid::Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.backend.kind = BackendKind::File;
        cfg.backend.file_dir = dir.to_string_lossy().into_owned();
        let (backend, db) = open_backend(&cfg).await?;
        assert!(db.is_none());
        let rows = backend.select(crate::backend::Table::Services, &crate::backend::Query::all()).await?;
        assert!(rows.is_empty());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
