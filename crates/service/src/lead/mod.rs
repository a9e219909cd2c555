//! Lead Submission Relay: validate a contact-form payload and forward it
//! as a Telegram message. Nothing is stored; a failed delivery is lost.

pub mod message;
pub mod telegram;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use telegram::MessagingApi;

/// A prospective customer's request, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayError {
    #[error("name and phone are required")]
    MissingFields,
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error("bot token is not configured")]
    MissingCredential,
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl RelayError {
    pub fn is_client_error(&self) -> bool { matches!(self, RelayError::MissingFields) }

    /// Text safe to show the submitter. Server-side causes stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingFields => "Имя и телефон обязательны",
            _ => "Внутренняя ошибка сервера",
        }
    }
}

fn trimmed(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Lead {
    /// Accepts `{name, phone, message?}` directly or wrapped as `{"body": {...}}`.
    pub fn from_json(raw: &Value) -> Result<Lead, RelayError> {
        let data = match raw.get("body") {
            Some(inner) if inner.is_object() => inner,
            _ => raw,
        };
        match (trimmed(data, "name"), trimmed(data, "phone")) {
            (Some(name), Some(phone)) => Ok(Lead { name, phone, message: trimmed(data, "message") }),
            _ => Err(RelayError::MissingFields),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Lead, RelayError> {
        let raw: Value = serde_json::from_slice(bytes).map_err(|e| RelayError::MalformedBody(e.to_string()))?;
        Lead::from_json(&raw)
    }
}

/// Stateless relay; concurrent calls share nothing but the HTTP client.
#[derive(Clone)]
pub struct LeadRelay {
    api: Arc<dyn MessagingApi>,
    token: Option<String>,
    chat_id: String,
    site_name: String,
}

impl LeadRelay {
    pub fn new(api: Arc<dyn MessagingApi>, token: Option<String>, chat_id: &str, site_name: &str) -> Self {
        Self { api, token, chat_id: chat_id.to_string(), site_name: site_name.to_string() }
    }

    pub fn from_config(api: Arc<dyn MessagingApi>, cfg: &configs::TelegramConfig, site_name: &str) -> Self {
        Self::new(api, cfg.bot_token.clone(), &cfg.chat_id, site_name)
    }

    pub async fn relay(&self, lead: &Lead) -> Result<(), RelayError> {
        self.relay_at(lead, Utc::now()).await
    }

    pub async fn relay_at(&self, lead: &Lead, at: DateTime<Utc>) -> Result<(), RelayError> {
        let Some(token) = self.token.as_deref() else {
            common::metrics::lead("failed");
            error!(event = "lead_relay_misconfigured", "TELEGRAM_BOT_TOKEN is not set");
            return Err(RelayError::MissingCredential);
        };
        let text = message::compose_message(lead, at, &self.site_name);
        match self.api.send_markdown(token, &self.chat_id, &text).await {
            Ok(()) => {
                common::metrics::lead("delivered");
                info!(event = "lead_delivered", chat_id = %self.chat_id, has_message = lead.message.is_some());
                Ok(())
            }
            Err(reason) => {
                common::metrics::lead("failed");
                warn!(event = "lead_delivery_failed", chat_id = %self.chat_id, reason = %reason);
                Err(RelayError::Delivery(reason))
            }
        }
    }

    /// Parse and relay a raw request body.
    pub async fn handle(&self, body: &[u8]) -> Result<(), RelayError> {
        let lead = Lead::from_slice(body).map_err(rejected)?;
        self.relay(&lead).await
    }

    /// Validate and relay an already decoded payload, e.g. a submitted form.
    pub async fn handle_value(&self, raw: &Value) -> Result<(), RelayError> {
        let lead = Lead::from_json(raw).map_err(rejected)?;
        self.relay(&lead).await
    }
}

fn rejected(e: RelayError) -> RelayError {
    common::metrics::lead("rejected");
    warn!(event = "lead_rejected", error = %e);
    e
}
