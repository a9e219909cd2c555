//! JSON API over the Data Access Layer, plus image uploads.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::site_content;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use service::content::Record;
use service::upload::UploadFile;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Include inactive records (admin view).
    #[serde(default)]
    pub all: bool,
}

/// 列出记录；`?all=true` 时包含已下线的记录
pub async fn list<R: Record>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<R>>, JsonApiError> {
    let collection = state.store.collection::<R>();
    let rows = if params.all { collection.list_all().await? } else { collection.list().await? };
    Ok(Json(rows))
}

/// 创建记录
pub async fn create<R: Record>(
    State(state): State<AppState>,
    Json(draft): Json<R::Draft>,
) -> Result<(StatusCode, Json<R>), JsonApiError>
where
    R::Draft: DeserializeOwned,
{
    let created = state.store.collection::<R>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 部分更新记录
pub async fn update<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<R::Patch>,
) -> Result<Json<R>, JsonApiError>
where
    R::Patch: DeserializeOwned,
{
    Ok(Json(state.store.collection::<R>().update(id, &patch).await?))
}

/// 删除记录
pub async fn delete<R: Record>(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    if state.store.collection::<R>().delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found(format!("{} {id} not found", R::TABLE)))
    }
}

/// 读取站点文案块
pub async fn get_block(State(state): State<AppState>, Path(key): Path<String>) -> Result<Json<site_content::Model>, JsonApiError> {
    state
        .store
        .site_content()
        .get(&key)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found(format!("block {key} not found")))
}

/// 合并写入站点文案块；不存在时创建
pub async fn put_block(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<site_content::Model>, JsonApiError> {
    Ok(Json(state.store.site_content().update(&key, fields).await?))
}

/// Pull the `file` part (and an optional `folder` text part) out of a
/// multipart body. `Ok(None)` when no file was sent.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<Option<(UploadFile, Option<String>)>, String> {
    let mut file = None;
    let mut folder = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                if !bytes.is_empty() || !file_name.is_empty() {
                    file = Some(UploadFile { file_name, content_type, bytes: bytes.to_vec() });
                }
            }
            Some("folder") => folder = Some(field.text().await.map_err(|e| e.to_string())?),
            _ => {}
        }
    }
    Ok(file.map(|f| (f, folder)))
}

/// 上传图片，返回可公开访问的 URL
pub async fn upload_image(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Value>, JsonApiError> {
    let (file, folder) = read_upload(multipart)
        .await
        .map_err(JsonApiError::bad_request)?
        .ok_or_else(|| JsonApiError::bad_request("file part is missing"))?;
    let url = state.uploader.upload(folder.as_deref().unwrap_or("services"), &file).await?;
    Ok(Json(json!({ "url": url })))
}
