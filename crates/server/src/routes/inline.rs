//! Edit-mode toggle and the inline field editor endpoints.
//!
//! Every endpoint answers with a redirect back to the page the form was
//! rendered on; the page then shows the field in its new state.

use axum::extract::{Form, State};
use axum::response::Redirect;
use models::site_content::keys;
use serde::Deserialize;
use serde_json::Value;
use service::content::blocks::{FooterContent, HeaderContent, StatsContent};
use service::content::Record;
use service::errors::ServiceError;
use service::inline_edit::{EditError, FieldBinding, SessionError};
use tracing::{debug, warn};

use crate::state::AppState;
use crate::views::{safe_return_to, with_notice};

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FieldForm {
    pub binding: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// The value a bound field currently shows on the page.
pub async fn persisted_value(state: &AppState, binding: &FieldBinding) -> Result<String, ServiceError> {
    let store = &state.store;
    match binding {
        FieldBinding::Content { block, field } => {
            let stored = store.site_content().get(block).await?;
            let b = stored.as_ref();
            let value = match block.as_str() {
                keys::STATS => {
                    let s = StatsContent::from_block(b);
                    match field.as_str() {
                        "years" => s.years,
                        "clients" => s.clients,
                        "cleanings" => s.cleanings,
                        _ => String::new(),
                    }
                }
                keys::FOOTER => FooterContent::from_block(b).description,
                _ => {
                    let h = HeaderContent::from_block(block, b);
                    match field.as_str() {
                        "title" => h.title,
                        "subtitle" => h.subtitle,
                        "description" => h.description,
                        _ => String::new(),
                    }
                }
            };
            Ok(value)
        }
        FieldBinding::Service { id, field } => {
            let s = store.services().get(*id).await?.ok_or_else(|| ServiceError::not_found("service"))?;
            // the detail page shows the short description when the full one is empty
            if field == "full_description" {
                return Ok(s.full_description.filter(|d| !d.trim().is_empty()).unwrap_or(s.description));
            }
            Ok(text_field(&s, field))
        }
        FieldBinding::Feature { id, field } => {
            let f = store.features().get(*id).await?.ok_or_else(|| ServiceError::not_found("feature"))?;
            Ok(text_field(&f, field))
        }
        FieldBinding::Contact { id, field } => {
            let c = store.contacts().get(*id).await?.ok_or_else(|| ServiceError::not_found("contact"))?;
            Ok(text_field(&c, field))
        }
    }
}

fn text_field<R: Record>(record: &R, field: &str) -> String {
    serde_json::to_value(record)
        .ok()
        .and_then(|v| v.get(field).and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}

/// 切换编辑模式；关闭时所有未保存的编辑器被丢弃
pub async fn toggle_edit_mode(State(state): State<AppState>, Form(form): Form<ToggleForm>) -> Redirect {
    let on = state.edit.toggle_mode();
    debug!(edit_mode = on, "edit mode toggled");
    Redirect::to(&safe_return_to(form.return_to.as_deref()))
}

/// 打开字段编辑器
pub async fn activate(State(state): State<AppState>, Form(form): Form<FieldForm>) -> Redirect {
    let back = safe_return_to(form.return_to.as_deref());
    let Ok(binding) = form.binding.parse::<FieldBinding>() else {
        return Redirect::to(&back);
    };
    let persisted = match persisted_value(&state, &binding).await {
        Ok(v) => v,
        Err(e) => {
            warn!(event = "inline_activate_failed", %binding, error = %e);
            return Redirect::to(&with_notice(&back, "save_failed"));
        }
    };
    match state.edit.activate(&binding, &persisted) {
        Ok(()) => Redirect::to(&back),
        Err(_) => Redirect::to(&with_notice(&back, "edit_locked")),
    }
}

/// 提交字段；保存失败时编辑器保持打开并保留草稿
pub async fn commit(State(state): State<AppState>, Form(form): Form<FieldForm>) -> Redirect {
    let back = safe_return_to(form.return_to.as_deref());
    let Ok(binding) = form.binding.parse::<FieldBinding>() else {
        return Redirect::to(&back);
    };
    match state.edit.commit(&binding, &form.value).await {
        Ok(_) => Redirect::to(&with_notice(&back, "saved")),
        Err(SessionError::Save(_)) => Redirect::to(&with_notice(&back, "save_failed")),
        Err(SessionError::Edit(EditError::EditModeOff)) => Redirect::to(&with_notice(&back, "edit_locked")),
        Err(SessionError::Edit(_)) => Redirect::to(&back),
    }
}

/// 放弃编辑
pub async fn cancel(State(state): State<AppState>, Form(form): Form<FieldForm>) -> Redirect {
    if let Ok(binding) = form.binding.parse::<FieldBinding>() {
        state.edit.cancel(&binding);
    }
    Redirect::to(&safe_return_to(form.return_to.as_deref()))
}
