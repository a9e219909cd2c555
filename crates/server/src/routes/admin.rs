//! Admin console handlers. One generic set of CRUD handlers serves the
//! three sortable collections; site content has its own form.

use std::collections::HashMap;

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use maud::Markup;
use models::contact::{self, ContactDraft};
use models::feature::{self, FeatureDraft};
use models::service::{Model as Service, ServiceDraft, ServicePatch};
use models::site_content;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use service::content::Record;
use service::errors::ServiceError;
use service::upload::UploadError;
use tracing::warn;
use uuid::Uuid;

use crate::errors::PageError;
use crate::routes::apis::read_upload;
use crate::state::AppState;
use crate::views::admin::{self as view, AdminTab, ContactForm, FeatureForm, ServiceForm};
use crate::views::{with_notice, Notice};

#[derive(Debug, Default, Deserialize)]
pub struct AdminParams {
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

/// A collection the admin console can edit through a typed form.
pub trait AdminRecord: Record {
    type Form: DeserializeOwned + Clone + Send + 'static;

    const TAB: AdminTab;
    const DELETE_QUESTION: &'static str;

    fn blank(sort_order: i32) -> Self::Form;
    fn form(&self) -> Self::Form;
    fn heading(&self) -> &str;
    fn into_draft(form: Self::Form) -> Self::Draft;
    fn into_patch(form: Self::Form) -> Self::Patch;
    fn editor(id: Option<Uuid>, form: &Self::Form) -> Markup;
}

impl AdminRecord for Service {
    type Form = ServiceForm;
    const TAB: AdminTab = AdminTab::Services;
    const DELETE_QUESTION: &'static str = "Удалить услугу?";

    fn blank(sort_order: i32) -> ServiceForm { ServiceForm::from_draft(&ServiceDraft::with_defaults(sort_order)) }
    fn form(&self) -> ServiceForm { ServiceForm::from_model(self) }
    fn heading(&self) -> &str { &self.title }
    fn into_draft(form: ServiceForm) -> ServiceDraft { form.into_draft() }
    fn into_patch(form: ServiceForm) -> ServicePatch { form.into_patch() }
    fn editor(id: Option<Uuid>, form: &ServiceForm) -> Markup { view::service_editor(id, form) }
}

impl AdminRecord for feature::Model {
    type Form = FeatureForm;
    const TAB: AdminTab = AdminTab::Features;
    const DELETE_QUESTION: &'static str = "Удалить преимущество?";

    fn blank(sort_order: i32) -> FeatureForm { FeatureForm::from_draft(&FeatureDraft::with_defaults(sort_order)) }
    fn form(&self) -> FeatureForm { FeatureForm::from_model(self) }
    fn heading(&self) -> &str { &self.title }
    fn into_draft(form: FeatureForm) -> FeatureDraft { form.into_draft() }
    fn into_patch(form: FeatureForm) -> feature::FeaturePatch { form.into_patch() }
    fn editor(id: Option<Uuid>, form: &FeatureForm) -> Markup { view::feature_editor(id, form) }
}

impl AdminRecord for contact::Model {
    type Form = ContactForm;
    const TAB: AdminTab = AdminTab::Contacts;
    const DELETE_QUESTION: &'static str = "Удалить контакт?";

    fn blank(sort_order: i32) -> ContactForm { ContactForm::from_draft(&ContactDraft::with_defaults(sort_order)) }
    fn form(&self) -> ContactForm { ContactForm::from_model(self) }
    fn heading(&self) -> &str { &self.label }
    fn into_draft(form: ContactForm) -> ContactDraft { form.into_draft() }
    fn into_patch(form: ContactForm) -> contact::ContactPatch { form.into_patch() }
    fn editor(id: Option<Uuid>, form: &ContactForm) -> Markup { view::contact_editor(id, form) }
}

fn tab_notice(tab: AdminTab, code: &str) -> Redirect {
    Redirect::to(&with_notice(&tab.href(), code))
}

/// A failed save re-renders the editor with what was submitted.
fn editor_failed<R: AdminRecord>(id: Option<Uuid>, form: &R::Form, e: &ServiceError) -> Response {
    warn!(event = "admin_save_failed", table = %R::TABLE, error = %e);
    let status = if e.is_client_error() { StatusCode::BAD_REQUEST } else { StatusCode::BAD_GATEWAY };
    (status, view::layout(R::TAB, Notice::from_code("save_failed"), R::editor(id, form))).into_response()
}

async fn find<R: AdminRecord>(state: &AppState, id: Uuid) -> Result<R, PageError> {
    state.store.collection::<R>().get(id).await?.ok_or_else(PageError::not_found)
}

/// 管理后台首页（按标签页展示）
pub async fn index(State(state): State<AppState>, Query(params): Query<AdminParams>) -> Result<Markup, PageError> {
    let tab = AdminTab::from_query(params.tab.as_deref());
    let store = &state.store;
    let body = match tab {
        AdminTab::Content => view::content_tab(&store.site_content().list_all().await?),
        AdminTab::Services => view::services_tab(&store.services().list_all().await?),
        AdminTab::Features => view::features_tab(&store.features().list_all().await?),
        AdminTab::Contacts => view::contacts_tab(&store.contacts().list_all().await?),
    };
    Ok(view::layout(tab, params.notice.as_deref().and_then(Notice::from_code), body))
}

/// 新建表单，预填默认值（排序 = 数量 + 1）
pub async fn new_form<R: AdminRecord>(State(state): State<AppState>) -> Result<Markup, PageError> {
    let next = state.store.collection::<R>().next_sort_order().await?;
    Ok(view::layout(R::TAB, None, R::editor(None, &R::blank(next))))
}

pub async fn create<R: AdminRecord>(State(state): State<AppState>, Form(form): Form<R::Form>) -> Response {
    match state.store.collection::<R>().create(&R::into_draft(form.clone())).await {
        Ok(_) => tab_notice(R::TAB, "saved").into_response(),
        Err(e) => editor_failed::<R>(None, &form, &e),
    }
}

pub async fn edit_form<R: AdminRecord>(State(state): State<AppState>, Path(id): Path<Uuid>, Query(params): Query<AdminParams>) -> Result<Markup, PageError> {
    let record = find::<R>(&state, id).await?;
    let notice = params.notice.as_deref().and_then(Notice::from_code);
    Ok(view::layout(R::TAB, notice, R::editor(Some(id), &record.form())))
}

pub async fn update<R: AdminRecord>(State(state): State<AppState>, Path(id): Path<Uuid>, Form(form): Form<R::Form>) -> Response {
    match state.store.collection::<R>().update(id, &R::into_patch(form.clone())).await {
        Ok(_) => tab_notice(R::TAB, "saved").into_response(),
        Err(e) => editor_failed::<R>(Some(id), &form, &e),
    }
}

/// 删除前的确认页
pub async fn confirm_delete<R: AdminRecord>(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Markup, PageError> {
    let record = find::<R>(&state, id).await?;
    let action = format!("/admin/{}/{id}/delete", R::TAB.key());
    Ok(view::layout(R::TAB, None, view::confirm_delete(R::DELETE_QUESTION, record.heading(), &action, &R::TAB.href())))
}

pub async fn delete<R: AdminRecord>(State(state): State<AppState>, Path(id): Path<Uuid>) -> Redirect {
    match state.store.collection::<R>().delete(id).await {
        Ok(true) => tab_notice(R::TAB, "deleted"),
        Ok(false) => tab_notice(R::TAB, "delete_failed"),
        Err(e) => {
            warn!(event = "admin_delete_failed", table = %R::TABLE, %id, error = %e);
            tab_notice(R::TAB, "delete_failed")
        }
    }
}

fn upload_notice(e: &UploadError) -> &'static str {
    match e {
        UploadError::Heic => "upload_heic",
        UploadError::UnsupportedFormat(_) => "upload_format",
        UploadError::TooLarge { .. } => "upload_size",
        UploadError::Storage(_) => "upload_failed",
    }
}

/// 上传服务图片并写入 image_url
pub async fn upload_service_image(State(state): State<AppState>, Path(id): Path<Uuid>, multipart: Multipart) -> Redirect {
    let back = format!("/admin/services/{id}/edit");
    let file = match read_upload(multipart).await {
        Ok(Some((file, _))) => file,
        Ok(None) => return Redirect::to(&back),
        Err(e) => {
            warn!(event = "upload_unreadable", error = %e);
            return Redirect::to(&with_notice(&back, "upload_failed"));
        }
    };
    let url = match state.uploader.upload("services", &file).await {
        Ok(url) => url,
        Err(e) => return Redirect::to(&with_notice(&back, upload_notice(&e))),
    };
    let patch = ServicePatch { image_url: Some(Some(url)), ..Default::default() };
    match state.store.services().update(id, &patch).await {
        Ok(_) => Redirect::to(&with_notice(&back, "uploaded")),
        Err(e) => {
            warn!(event = "admin_save_failed", table = "services", %id, error = %e);
            Redirect::to(&with_notice(&back, "save_failed"))
        }
    }
}

/// 保存站点文案块；只接受该块已知的字段
pub async fn save_block(State(state): State<AppState>, Path(key): Path<String>, Form(fields): Form<HashMap<String, String>>) -> Response {
    let Some(known) = view::block_fields(&key) else {
        return PageError::not_found().into_response();
    };
    let payload: Map<String, Value> = fields
        .into_iter()
        .filter(|(name, _)| known.contains(&name.as_str()))
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    let back = format!("{}#{key}", AdminTab::Content.href());
    match state.store.site_content().update(&key, payload.clone()).await {
        Ok(_) => Redirect::to(&with_notice(&back, "saved")).into_response(),
        Err(e) => {
            warn!(event = "admin_save_failed", table = "site_content", block_key = %key, error = %e);
            // keep the submitted text in the form
            let mut blocks = state.store.site_content().list_all().await.unwrap_or_default();
            blocks.retain(|b| b.block_key != key);
            blocks.push(site_content::Model { id: Uuid::nil(), block_key: key, content: Value::Object(payload) });
            let page = view::layout(AdminTab::Content, Notice::from_code("save_failed"), view::content_tab(&blocks));
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}
