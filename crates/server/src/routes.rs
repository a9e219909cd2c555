pub mod admin;
pub mod apis;
pub mod inline;
pub mod lead;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Json, Router,
};
use models::{contact, feature, service::Model as Service};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Where static files come from.
#[derive(Debug, Clone)]
pub struct StaticDirs {
    /// Images and other assets referenced by the pages.
    pub public_dir: String,
    /// Uploaded objects, served under `storage_url`.
    pub storage_dir: String,
    pub storage_url: String,
}

impl StaticDirs {
    pub fn from_config(cfg: &configs::AppConfig) -> Self {
        let url = cfg.storage.public_base_url.trim_end_matches('/');
        // an absolute base URL means objects are served elsewhere
        let storage_url = if url.starts_with('/') { url.to_string() } else { "/storage".to_string() };
        Self { public_dir: cfg.server.public_dir.clone(), storage_dir: cfg.storage.root_dir.clone(), storage_url }
    }
}

/// Build the full application router: public pages, inline editing, admin
/// console, JSON API and the lead relay function.
pub fn build_router(state: AppState, dirs: &StaticDirs) -> Router {
    // multipart 请求体上限留出余量，超限文件由上传校验给出明确提示
    let upload_limit = DefaultBodyLimit::max((state.uploader.max_bytes() as usize).saturating_mul(2));

    // Public pages
    let pages = Router::new()
        .route("/", get(pages::home))
        .route("/services", get(pages::services_page))
        .route("/services/:id", get(pages::service_detail))
        .route("/contact", post(pages::submit_contact))
        .route("/health", get(health));

    // Inline editing
    let inline = Router::new()
        .route("/edit-mode", post(inline::toggle_edit_mode))
        .route("/inline/activate", post(inline::activate))
        .route("/inline/commit", post(inline::commit))
        .route("/inline/cancel", post(inline::cancel));

    // Admin console
    let admin_routes = Router::new()
        .route("/admin", get(admin::index))
        .route("/admin/services", post(admin::create::<Service>))
        .route("/admin/services/new", get(admin::new_form::<Service>))
        .route("/admin/services/:id", post(admin::update::<Service>))
        .route("/admin/services/:id/edit", get(admin::edit_form::<Service>))
        .route("/admin/services/:id/delete", get(admin::confirm_delete::<Service>).post(admin::delete::<Service>))
        .route("/admin/services/:id/image", post(admin::upload_service_image).layer(upload_limit.clone()))
        .route("/admin/features", post(admin::create::<feature::Model>))
        .route("/admin/features/new", get(admin::new_form::<feature::Model>))
        .route("/admin/features/:id", post(admin::update::<feature::Model>))
        .route("/admin/features/:id/edit", get(admin::edit_form::<feature::Model>))
        .route(
            "/admin/features/:id/delete",
            get(admin::confirm_delete::<feature::Model>).post(admin::delete::<feature::Model>),
        )
        .route("/admin/contacts", post(admin::create::<contact::Model>))
        .route("/admin/contacts/new", get(admin::new_form::<contact::Model>))
        .route("/admin/contacts/:id", post(admin::update::<contact::Model>))
        .route("/admin/contacts/:id/edit", get(admin::edit_form::<contact::Model>))
        .route(
            "/admin/contacts/:id/delete",
            get(admin::confirm_delete::<contact::Model>).post(admin::delete::<contact::Model>),
        )
        .route("/admin/content/:key", post(admin::save_block));

    // JSON API
    let api = Router::new()
        .route("/api/services", get(apis::list::<Service>).post(apis::create::<Service>))
        .route("/api/services/:id", patch(apis::update::<Service>).delete(apis::delete::<Service>))
        .route("/api/features", get(apis::list::<feature::Model>).post(apis::create::<feature::Model>))
        .route("/api/features/:id", patch(apis::update::<feature::Model>).delete(apis::delete::<feature::Model>))
        .route("/api/contacts", get(apis::list::<contact::Model>).post(apis::create::<contact::Model>))
        .route("/api/contacts/:id", patch(apis::update::<contact::Model>).delete(apis::delete::<contact::Model>))
        .route("/api/content/:key", get(apis::get_block).put(apis::put_block))
        .route("/api/uploads", post(apis::upload_image).layer(upload_limit))
        .layer(CorsLayer::permissive());

    // Lead relay function; sets its own CORS headers
    let functions = Router::new()
        .route("/functions/send-telegram", post(lead::send_telegram).options(lead::preflight));

    // Compose
    pages
        .merge(inline)
        .merge(admin_routes)
        .merge(api)
        .merge(functions)
        .nest_service(&dirs.storage_url, ServeDir::new(&dirs.storage_dir))
        .nest_service("/assets", ServeDir::new(format!("{}/assets", dirs.public_dir)))
        .fallback_service(ServeDir::new(&dirs.public_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 请求到达时打点
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
