use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` (default) or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Optional bind address for the `/healthz` + `/metrics` side server.
    #[serde(default)]
    pub admin_addr: Option<String>,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            log_format: default_log_format(),
            admin_addr: None,
            public_dir: default_public_dir(),
        }
    }
}

fn default_log_format() -> String { "compact".into() }
fn default_public_dir() -> String { "public".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Run pending migrations on startup.
    #[serde(default = "default_true")]
    pub migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            migrate: true,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

/// Which data backend the Data Access Layer talks to.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Postgres,
    /// JSON files on disk; used for local development and tests.
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default = "default_file_dir")]
    pub file_dir: String,
}

impl Default for BackendConfig {
    fn default() -> Self { Self { kind: BackendKind::default(), file_dir: default_file_dir() } }
}

fn default_file_dir() -> String { "data".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self { Self { ttl_secs: default_cache_ttl(), max_capacity: default_cache_capacity() } }
}

fn default_cache_ttl() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 256 }

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Secret; normally supplied through `TELEGRAM_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default = "default_chat_id")]
    pub chat_id: String,
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self { bot_token: None, chat_id: default_chat_id(), api_base: default_telegram_api() }
    }
}

fn default_chat_id() -> String { "-2001547391".into() }
fn default_telegram_api() -> String { "https://api.telegram.org".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_root")]
    pub root_dir: String,
    /// Prefix for publicly resolvable object URLs.
    #[serde(default = "default_storage_public")]
    pub public_base_url: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_storage_root(),
            public_base_url: default_storage_public(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_storage_root() -> String { "storage/images".into() }
fn default_storage_public() -> String { "/storage/images".into() }
fn default_max_upload() -> u64 { 5 * 1024 * 1024 }

/// Business identity used for page metadata and structured data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
    pub description: String,
    pub phone: String,
    pub locality: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    pub opens: String,
    pub closes: String,
    pub price_range: String,
    pub og_image: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Clean House".into(),
            base_url: "https://cleanhome-digital-glow.lovable.app".into(),
            description: "Профессиональные услуги клининга в Донецке. Уборка квартир, домов и офисов.".into(),
            phone: "+7 949 501 57 51".into(),
            locality: "Донецк".into(),
            country: "RU".into(),
            latitude: "48.0159".into(),
            longitude: "37.8028".into(),
            opens: "08:00".into(),
            closes: "20:00".into(),
            price_range: "₽₽".into(),
            og_image: "/og-image.jpg".into(),
        }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`] but a missing config file is not an
    /// error: defaults plus environment variables are used instead.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.server.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 数据库 URL 与 Telegram 凭据允许从环境变量填充
        self.database.normalize_from_env();
        self.telegram.normalize_from_env();
        if self.backend.kind == BackendKind::Postgres {
            self.database.validate()?;
        }
        if self.cache.max_capacity == 0 {
            return Err(anyhow!("cache.max_capacity must be >= 1"));
        }
        if self.storage.max_upload_bytes == 0 {
            return Err(anyhow!("storage.max_upload_bytes must be >= 1"));
        }
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.log_format != "json" && self.log_format != "compact" {
            self.log_format = default_log_format();
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl TelegramConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.bot_token = Some(token);
        }
        if let Ok(chat) = std::env::var("TELEGRAM_CHAT_ID") {
            self.chat_id = chat;
        }
        // 空字符串视为未配置
        if self.bot_token.as_deref().map(str::trim).is_some_and(str::is_empty) {
            self.bot_token = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.backend.kind, BackendKind::Postgres);
        assert_eq!(cfg.telegram.chat_id, "-2001547391");
        assert_eq!(cfg.storage.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(cfg.site.name, "Clean House");
    }

    #[test]
    fn file_backend_skips_database_validation() {
        let mut cfg = load_from_str(
            r#"
            [server]
            host = ""
            port = 9000
            worker_threads = 0

            [backend]
            kind = "file"
            file_dir = "target/data"
            "#,
        )
        .unwrap();
        cfg.database.url = String::new();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.backend.file_dir, "target/data");
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://x".into(), min_connections: 1, max_connections: 2, connect_timeout_secs: 1, acquire_timeout_secs: 1, ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut cfg = load_from_str("[server]\nhost = \"0.0.0.0\"\nport = 0\n").unwrap();
        cfg.backend.kind = BackendKind::File;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
