//! Google Gmail/Calendar collaborator façade (§6.4, SPEC_FULL.md §4.1 item 11
//! expansion), grounded in `original_source/google-services.py`'s function
//! surface: `list_emails`, `read_email`, `send_email`, `count_unread`,
//! `list_events`, `create_event`, `delete_event`.
//!
//! The companion module is an external collaborator, not part of this core
//! (§6.4: "Interface-only; not part of this core"). This façade invokes it
//! as a subprocess — one argv per call, JSON on stdout — the same
//! fire-and-forget-script idiom `openclaw-dispatch::pipelines` uses for the
//! add-tasks and task-manager scripts. Absent credentials or a missing
//! script, each call returns a JSON error object carrying a "not
//! configured"-style message instead of propagating an error.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use openclaw_core::paths::Paths;
use serde_json::{json, Value};
use tracing::{instrument, warn};

const GOOGLE_TIMEOUT_SEC: u64 = 30;

fn not_configured() -> Value {
    json!({ "ok": false, "error": "Google services are not configured on this host." })
}

#[derive(Debug, Clone)]
pub struct GoogleServices {
    script: PathBuf,
}

impl GoogleServices {
    pub fn new(paths: Arc<Paths>) -> Self {
        Self {
            script: paths.google_services_script(),
        }
    }

    /// Invoke `<script> <command> [args...]` with a timeout, parsing stdout
    /// as JSON. Any failure (missing script, non-zero exit, timeout,
    /// unparseable output) is collapsed to `None` — callers shape that into
    /// the "not configured" fallback.
    #[instrument(skip(self, args))]
    async fn invoke(&self, command: &str, args: &[String]) -> Option<Value> {
        let mut cmd = tokio::process::Command::new(&self.script);
        cmd.arg(command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("google-services script spawn failed: {e}");
                return None;
            }
        };

        let output = match tokio::time::timeout(
            Duration::from_secs(GOOGLE_TIMEOUT_SEC),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("google-services script failed: {e}");
                return None;
            }
            Err(_) => {
                warn!("google-services script timed out after {GOOGLE_TIMEOUT_SEC}s");
                return None;
            }
        };

        if !output.status.success() {
            return None;
        }
        serde_json::from_slice(&output.stdout).ok()
    }

    pub async fn list_emails(&self, query: &str, max_results: u32) -> Value {
        let args = vec![format!("--query={query}"), format!("--max-results={max_results}")];
        self.invoke("list_emails", &args).await.unwrap_or_else(not_configured)
    }

    pub async fn read_email(&self, message_id: &str) -> Value {
        let args = vec![format!("--id={message_id}")];
        self.invoke("read_email", &args).await.unwrap_or_else(not_configured)
    }

    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> Value {
        let args = vec![
            format!("--to={to}"),
            format!("--subject={subject}"),
            format!("--body={body}"),
        ];
        self.invoke("send_email", &args).await.unwrap_or_else(not_configured)
    }

    /// Returns `None` when the collaborator is unavailable — callers decide
    /// whether that means "0" or "unknown" for display purposes.
    pub async fn count_unread(&self) -> Option<i64> {
        self.invoke("count_unread", &[]).await?.get("count")?.as_i64()
    }

    pub async fn list_events(&self, range: &str) -> Value {
        let args = vec![format!("--range={range}")];
        self.invoke("list_events", &args).await.unwrap_or_else(not_configured)
    }

    pub async fn create_event(&self, summary: &str, start: &str, end: &str) -> Value {
        let args = vec![
            format!("--summary={summary}"),
            format!("--start={start}"),
            format!("--end={end}"),
        ];
        self.invoke("create_event", &args).await.unwrap_or_else(not_configured)
    }

    pub async fn delete_event(&self, event_id: &str) -> Value {
        let args = vec![format!("--id={event_id}")];
        self.invoke("delete_event", &args).await.unwrap_or_else(not_configured)
    }
}
