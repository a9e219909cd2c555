//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure expected directories exist; warn on missing optional ones.
///
/// `public_dir` holds static assets (images referenced by the hero section)
/// and is optional. `storage_dir` receives uploaded objects and is created.
pub async fn ensure_env(public_dir: &str, storage_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(public_dir).await.is_err() {
        warn!(%public_dir, "public assets directory not found; static assets may 404");
    }
    tokio::fs::create_dir_all(storage_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {storage_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_storage_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("clean_house_env_{}", std::process::id()));
        let storage = root.join("storage");
        let _ = tokio::fs::remove_dir_all(&root).await;

        ensure_env("/nonexistent-public-dir", storage.to_str().unwrap()).await?;
        assert!(tokio::fs::metadata(&storage).await?.is_dir());

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
