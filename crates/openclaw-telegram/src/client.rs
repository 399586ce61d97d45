use async_trait::async_trait;
use openclaw_dispatch::OwnerNotifier;
use serde_json::json;
use tracing::{instrument, warn};

use crate::error::{Result, TelegramError};
use crate::types::{ReactionTypeEmoji, Update};

/// Thin HTTP client over the Telegram Bot API (§6.2), used one tick at a
/// time by the poller rather than through a long-lived dispatcher — this
/// workspace's channel poller is invoked once per external scheduler tick,
/// not as a standing event loop.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.token)
    }

    /// `getUpdates(offset, timeout=0)` (§4.6 step 3).
    #[instrument(skip(self))]
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let resp = self
            .http
            .post(self.api_url("getUpdates"))
            .json(&json!({ "offset": offset, "timeout": 0 }))
            .send()
            .await?;
        let body: serde_json::Value = resp.json().await?;
        if body.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            return Err(TelegramError::ApiError(body.to_string()));
        }
        let updates = body
            .get("result")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e: serde_json::Error| TelegramError::ApiError(e.to_string()))?
            .unwrap_or_default();
        Ok(updates)
    }

    /// `sendMessage(chat_id, text)` (§6.2, §4.6 step 3 text outbound).
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> bool {
        let result = self
            .http
            .post(self.api_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await;
        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("sendMessage failed: {e}");
                false
            }
        }
    }

    /// `setMessageReaction` (§6.2) — the primary acknowledgement path;
    /// callers fall back to a text ack when this returns `false`.
    #[instrument(skip(self))]
    pub async fn set_message_reaction(&self, chat_id: i64, message_id: i64, emoji: &str) -> bool {
        let result = self
            .http
            .post(self.api_url("setMessageReaction"))
            .json(&json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "reaction": [ReactionTypeEmoji { kind: "emoji", emoji }],
            }))
            .send()
            .await;
        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("setMessageReaction failed: {e}");
                false
            }
        }
    }

    /// `getFile(file_id) -> {file_path}` (§6.2).
    #[instrument(skip(self))]
    pub async fn get_file_path(&self, file_id: &str) -> Option<String> {
        let resp = self
            .http
            .post(self.api_url("getFile"))
            .json(&json!({ "file_id": file_id }))
            .send()
            .await
            .ok()?;
        let body: serde_json::Value = resp.json().await.ok()?;
        body.get("result")?
            .get("file_path")?
            .as_str()
            .map(str::to_string)
    }

    /// Download the file binary via the transport's file endpoint (§6.2:
    /// `<base>/file/bot<token>/<file_path>`).
    #[instrument(skip(self))]
    pub async fn download_file(&self, file_path: &str) -> Option<Vec<u8>> {
        let url = format!(
            "https://api.telegram.org/file/bot{}/{file_path}",
            self.token
        );
        let resp = self.http.get(url).send().await.ok()?;
        resp.bytes().await.ok().map(|b| b.to_vec())
    }
}

/// Binds a [`TelegramClient`] to the configured owner chat id so it can be
/// used as an [`OwnerNotifier`] (§4.2/§4.3 owner-message delivery).
#[derive(Debug, Clone)]
pub struct OwnerChannel {
    pub client: TelegramClient,
    pub owner_chat_id: i64,
}

#[async_trait]
impl OwnerNotifier for OwnerChannel {
    async fn notify(&self, text: &str) -> bool {
        self.client.send_message(self.owner_chat_id, text).await
    }
}
