//! Image upload: format and size checks before anything touches storage,
//! then a put under a generated, folder-prefixed key.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for images. `image/jpg` is a common alias.
pub const ALLOWED_TYPES: [&str; 5] = ["image/png", "image/jpeg", "image/jpg", "image/svg+xml", "image/webp"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadError {
    #[error("HEIC images are not supported")]
    Heic,
    #[error("unsupported content type {0:?}")]
    UnsupportedFormat(String),
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("storage error: {0}")]
    Storage(String),
}

impl UploadError {
    /// Short user-facing headline.
    pub fn title(&self) -> &'static str {
        match self {
            UploadError::Heic => "Формат HEIC не поддерживается",
            UploadError::UnsupportedFormat(_) => "Неподдерживаемый формат",
            UploadError::TooLarge { .. } => "Файл слишком большой",
            UploadError::Storage(_) => "Ошибка загрузки",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UploadError::Heic => "Пожалуйста, конвертируйте изображение в JPG или PNG перед загрузкой",
            UploadError::UnsupportedFormat(_) => "Допустимые форматы: PNG, JPG, SVG, WebP",
            UploadError::TooLarge { .. } => "Максимальный размер файла: 5 МБ",
            UploadError::Storage(_) => "Не удалось загрузить изображение",
        }
    }

    pub fn is_client_error(&self) -> bool { !matches!(self, UploadError::Storage(_)) }
}

/// An image as received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HEIC is checked first so it gets its own message even when the browser
/// reports a generic or empty type.
pub fn validate(file_name: &str, content_type: &str, size: u64, limit: u64) -> Result<(), UploadError> {
    let ct = content_type.trim().to_ascii_lowercase();
    if file_name.to_ascii_lowercase().ends_with(".heic") || ct == "image/heic" {
        return Err(UploadError::Heic);
    }
    if !ALLOWED_TYPES.contains(&ct.as_str()) {
        return Err(UploadError::UnsupportedFormat(content_type.to_string()));
    }
    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }
    Ok(())
}

/// Taken from the validated content type only, so a stored object is
/// always served as an image whatever name the client sent.
fn extension(content_type: &str) -> &'static str {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/svg+xml" => "svg",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// `{folder}/{unix_millis}-{random base36}.{ext}`; the folder is reduced to
/// `[a-z0-9_-]` and defaults to `services`.
pub fn object_key(folder: &str, content_type: &str, millis: i64, rng: &mut impl Rng) -> String {
    let folder: String = folder
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let folder = if folder.is_empty() { "services".to_string() } else { folder };
    let suffix = base36(rng.gen_range(36u64.pow(5)..36u64.pow(6)));
    format!("{folder}/{millis}-{suffix}.{}", extension(content_type))
}

/// Binary object storage: put bytes under a key, get back a public URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fails if the key already exists.
    async fn put(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<String, UploadError>;
}

/// Validates and stores images.
pub struct ImageUploader {
    storage: Arc<dyn ObjectStorage>,
    max_bytes: u64,
}

impl ImageUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, max_bytes: u64) -> Self { Self { storage, max_bytes } }

    pub fn max_bytes(&self) -> u64 { self.max_bytes }

    /// Returns the public URL of the stored image.
    pub async fn upload(&self, folder: &str, file: &UploadFile) -> Result<String, UploadError> {
        if let Err(e) = validate(&file.file_name, &file.content_type, file.bytes.len() as u64, self.max_bytes) {
            common::metrics::upload("rejected");
            warn!(event = "upload_rejected", file = %file.file_name, content_type = %file.content_type, error = %e);
            return Err(e);
        }
        let key = {
            let mut rng = rand::thread_rng();
            object_key(folder, &file.content_type, chrono::Utc::now().timestamp_millis(), &mut rng)
        };
        match self.storage.put(&key, &file.content_type, &file.bytes).await {
            Ok(url) => {
                common::metrics::upload("accepted");
                info!(event = "upload_stored", %key, size = file.bytes.len());
                Ok(url)
            }
            Err(e) => {
                common::metrics::upload("failed");
                warn!(event = "upload_failed", %key, error = %e);
                Err(e)
            }
        }
    }
}
