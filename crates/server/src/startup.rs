use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, BackendKind};
use migration::MigratorTrait;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, StaticDirs};
use crate::state::AppState;
use service::{lead::telegram::TelegramClient, runtime};

/// Apply pending migrations when running against Postgres.
async fn migrate(cfg: &AppConfig, db: Option<&sea_orm::DatabaseConnection>) -> Result<(), StartupError> {
    match (cfg.backend.kind, db) {
        (BackendKind::Postgres, Some(db)) if cfg.database.migrate => {
            migration::Migrator::up(db, None).await.map_err(|e| StartupError::Migration(e.to_string()))?;
            info!("migrations applied");
        }
        (BackendKind::Postgres, _) => warn!("automatic migrations disabled"),
        _ => {}
    }
    Ok(())
}

/// Build the application router from configuration.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(cfg).await?;
    let (backend, db) = runtime::open_backend(cfg).await?;
    migrate(cfg, db.as_ref()).await?;

    if cfg.telegram.bot_token.is_none() {
        // 线索转发将在调用时返回 500，这里只提示
        warn!("TELEGRAM_BOT_TOKEN is not set; lead relay will fail");
    }
    let messaging = Arc::new(TelegramClient::new(&cfg.telegram.api_base));
    let state = AppState::new(cfg, backend, messaging);
    Ok(routes::build_router(state, &StaticDirs::from_config(cfg)))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    if let Some(addr) = cfg.server.admin_addr.as_deref() {
        // /healthz 与 /metrics 独立端口
        common::admin_http::spawn_admin_server(addr, common::metrics::render);
    }

    let app = build_app(&cfg).await?;

    // Bind and serve
    let addr = cfg.server.bind_addr();
    info!(%addr, site = %cfg.site.name, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| StartupError::Any(e.into()))?;
    axum::serve(listener, app).await.map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
