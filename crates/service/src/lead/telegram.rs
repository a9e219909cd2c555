use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outbound bot-style messaging API.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Deliver Markdown `text` to `chat_id`. The error string is for logs
    /// only and must not contain the credential.
    async fn send_markdown(&self, token: &str, chat_id: &str, text: &str) -> Result<(), String>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct TelegramReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage`.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new(api_base: &str) -> Self {
        Self { http: reqwest::Client::new(), api_base: api_base.trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl MessagingApi for TelegramClient {
    async fn send_markdown(&self, token: &str, chat_id: &str, text: &str) -> Result<(), String> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, token);
        let body = SendMessage { chat_id, text, parse_mode: "Markdown" };
        // the URL carries the token, strip it from transport errors
        let resp = self.http.post(&url).json(&body).send().await.map_err(|e| e.without_url().to_string())?;
        let status = resp.status();
        let reply: TelegramReply = resp.json().await.map_err(|e| e.without_url().to_string())?;
        debug!(%status, ok = reply.ok, "telegram reply");
        if !reply.ok {
            return Err(reply.description.unwrap_or_else(|| format!("telegram returned {status}")));
        }
        Ok(())
    }
}
