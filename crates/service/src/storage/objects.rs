use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::upload::{ObjectStorage, UploadError};

/// Object storage on the local filesystem, served as static files under
/// `public_base`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl AsRef<Path>, public_base: &str) -> Self {
        Self { root: root.as_ref().to_path_buf(), public_base: public_base.trim_end_matches('/').to_string() }
    }

    pub fn from_config(cfg: &configs::StorageConfig) -> Self { Self::new(&cfg.root_dir, &cfg.public_base_url) }

    pub fn root(&self) -> &Path { &self.root }

    fn path_for(&self, key: &str) -> Result<PathBuf, UploadError> {
        let rel = Path::new(key);
        if key.is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(UploadError::Storage(format!("invalid object key {key:?}")));
        }
        Ok(self.root.join(rel))
    }
}

fn storage_err(e: std::io::Error) -> UploadError { UploadError::Storage(e.to_string()) }

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, _content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        // create_new: never overwrite an existing object
        let mut file = fs::OpenOptions::new().write(true).create_new(true).open(&path).await.map_err(storage_err)?;
        file.write_all(bytes).await.map_err(storage_err)?;
        file.flush().await.map_err(storage_err)?;
        Ok(format!("{}/{}", self.public_base, key))
    }
}
