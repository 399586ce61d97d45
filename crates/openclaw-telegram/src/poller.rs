//! The channel poller's per-tick loop body (§4.6): "a long-poll loop that
//! retrieves messages... intended to be run under an external periodic
//! scheduler" (§4.6 preamble). Exposes a single [`run_tick`] that processes
//! whatever `getUpdates` returns for one `timeout=0` call, then returns.
//! The binary that drives it on a schedule is external (cron, a systemd
//! timer, a shell loop).

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{instrument, warn};

use crate::allow::is_allowed;
use crate::client::TelegramClient;
use crate::local_commands::LocalCommands;
use crate::offset::{load_offset, save_offset};
use crate::types::Update;

/// Everything the poller needs that isn't already bundled in
/// [`LocalCommands`] or the [`TelegramClient`] (§6.8 Telegram config,
/// §4.1 router base URL for the forward-everything-else path).
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub owner_chat_id: i64,
    pub allow_from: Vec<String>,
    pub ack_reaction: String,
    pub router_base_url: String,
}

/// Run one `getUpdates` tick to completion: process every returned
/// update, advance and persist the offset past the last one seen, and
/// return the new offset.
#[instrument(skip(telegram, local, http, config))]
pub async fn run_tick(
    telegram: &TelegramClient,
    local: &LocalCommands,
    http: &reqwest::Client,
    config: &PollerConfig,
    offset_path: &Path,
    inbox_dir: &Path,
) -> i64 {
    let mut offset = load_offset(offset_path);

    let updates = match telegram.get_updates(offset).await {
        Ok(updates) => updates,
        Err(e) => {
            warn!("getUpdates failed: {e}");
            return offset;
        }
    };

    for update in updates {
        offset = offset.max(update.update_id + 1);
        process_update(telegram, local, http, config, inbox_dir, &update).await;
    }

    if let Err(e) = save_offset(offset_path, offset) {
        warn!("failed to persist telegram offset: {e}");
    }
    offset
}

async fn process_update(
    telegram: &TelegramClient,
    local: &LocalCommands,
    http: &reqwest::Client,
    config: &PollerConfig,
    inbox_dir: &Path,
    update: &Update,
) {
    let Some(message) = &update.message else {
        return;
    };
    let chat_id = message.chat.id;
    let sender_id = message.from.as_ref().map(|u| u.id).unwrap_or(chat_id);

    if !is_allowed(&config.allow_from, sender_id, chat_id, config.owner_chat_id) {
        return;
    }

    let text = message.text.clone().unwrap_or_default();
    let reply = if text.is_empty() {
        String::new()
    } else if let Some(reply) = local.handle(&text).await {
        reply
    } else if !text.starts_with('/') && local.has_pending().await {
        local.record_answer(&text).await
    } else {
        forward_to_router(http, &config.router_base_url, &text).await
    };

    let acked = telegram
        .set_message_reaction(chat_id, message.message_id, &config.ack_reaction)
        .await;
    if !acked {
        telegram.send_message(chat_id, "\u{2713}").await;
    }

    if !reply.is_empty() {
        telegram.send_message(chat_id, &reply).await;
    }

    if let Some((file_id, _kind)) = message.attachment() {
        download_attachment(telegram, inbox_dir, file_id).await;
    }
}

/// Forward everything not locally handled to the HTTP router's `/route`
/// (§4.6 step 3, "forward to /route"). Transport failures are logged and
/// swallowed (§7): the poller always advances past the update regardless.
async fn forward_to_router(http: &reqwest::Client, base_url: &str, text: &str) -> String {
    let url = format!("{base_url}/route");
    let result = http
        .post(&url)
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await;
    match result {
        Ok(resp) => match resp.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("reply")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            Err(e) => {
                warn!("router returned unparseable response: {e}");
                String::new()
            }
        },
        Err(e) => {
            warn!("failed to forward to router: {e}");
            String::new()
        }
    }
}

/// Download a document/photo/voice/video attachment and persist it under
/// the inbox directory, prefixed with a UTC timestamp (§3 "Update offset",
/// §4.6 step 3, §6.7 `inbox/<YYYYMMDD-HHMMSS>_<filename>`).
async fn download_attachment(telegram: &TelegramClient, inbox_dir: &Path, file_id: &str) {
    let Some(file_path) = telegram.get_file_path(file_id).await else {
        warn!("getFile failed for attachment {file_id}");
        return;
    };
    let Some(bytes) = telegram.download_file(&file_path).await else {
        warn!("download failed for attachment {file_id}");
        return;
    };

    let filename = Path::new(&file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_id);
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let dest: PathBuf = inbox_dir.join(format!("{stamp}_{filename}"));

    if let Err(e) = std::fs::create_dir_all(inbox_dir) {
        warn!("failed to create inbox dir: {e}");
        return;
    }
    if let Err(e) = std::fs::write(&dest, &bytes) {
        warn!("failed to write attachment to {}: {e}", dest.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poller_config_is_cloneable_and_debuggable() {
        let config = PollerConfig {
            owner_chat_id: 1,
            allow_from: vec![],
            ack_reaction: "\u{1F44D}".to_string(),
            router_base_url: "http://127.0.0.1:18801".to_string(),
        };
        let cloned = config.clone();
        assert_eq!(format!("{cloned:?}").contains("18801"), true);
    }
}
