use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use maud::{html, DOCTYPE};
use service::{errors::ServiceError, lead::RelayError, upload::UploadError};
use thiserror::Error;
use tracing::error;

/// Error returned by JSON handlers: a status plus `{"error", "detail"?}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, body: ErrorBody::new(error) }
    }

    pub fn bad_request(error: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, error) }

    pub fn not_found(error: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, error) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::NotFound(msg) => Self::not_found(msg.clone()),
            ServiceError::Validation(msg) => Self::bad_request(msg.clone()),
            ServiceError::Model(m) => Self::bad_request(m.to_string()),
            ServiceError::Backend(b) => {
                error!(error = %b, "backend failure");
                Self::new(StatusCode::BAD_GATEWAY, "backend failure")
            }
        }
    }
}

impl From<UploadError> for JsonApiError {
    fn from(e: UploadError) -> Self {
        let status = match e {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Heic | UploadError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, body: ErrorBody::with_detail(e.title(), e.description()) }
    }
}

impl From<RelayError> for JsonApiError {
    fn from(e: RelayError) -> Self {
        let status = if e.is_client_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR };
        Self::new(status, e.public_message())
    }
}

/// Error returned by HTML page handlers.
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl PageError {
    pub fn not_found() -> Self { Self { status: StatusCode::NOT_FOUND, message: "Страница не найдена" } }
}

impl From<ServiceError> for PageError {
    fn from(e: ServiceError) -> Self {
        if let ServiceError::NotFound(_) = e {
            return Self::not_found();
        }
        error!(error = %e, "page data load failed");
        Self { status: StatusCode::BAD_GATEWAY, message: "Не удалось загрузить данные. Попробуйте обновить страницу." }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = html! {
            (DOCTYPE)
            html lang="ru" {
                head { meta charset="utf-8"; title { "Clean House" } }
                body.error-page {
                    h1 { (self.message) }
                    a href="/" { "На главную" }
                }
            }
        };
        (self.status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_errors_hide_server_side_cause() {
        let e: JsonApiError = RelayError::Delivery("token 123 rejected".into()).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.body.error, "Внутренняя ошибка сервера");
        assert!(e.body.detail.is_none());
    }

    #[test]
    fn upload_errors_carry_user_text() {
        let e: JsonApiError = UploadError::Heic.into();
        assert_eq!(e.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(e.body.error, "Формат HEIC не поддерживается");
    }
}
