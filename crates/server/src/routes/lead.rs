//! `/functions/send-telegram`: the lead relay as a plain HTTP function.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::SuccessBody;

use crate::errors::JsonApiError;
use crate::state::AppState;

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

fn with_cors(mut resp: Response) -> Response {
    let headers = resp.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
    resp
}

/// CORS 预检：只返回头，不带响应体
pub async fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// 校验并转发线索；错误信息不包含服务端细节
pub async fn send_telegram(State(state): State<AppState>, body: Bytes) -> Response {
    let resp = match state.relay.handle(&body).await {
        Ok(()) => Json(SuccessBody::OK).into_response(),
        Err(e) => JsonApiError::from(e).into_response(),
    };
    with_cors(resp)
}
