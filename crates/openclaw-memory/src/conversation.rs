use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Maximum entries retained in the conversation ring (§3).
pub const MAX_ENTRIES: usize = 20;

/// Maximum characters retained per entry before truncation (§3).
pub const MAX_ENTRY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Ashley,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: String,
}

/// Bounded, file-persisted conversation ring (§3 "Conversation ring").
///
/// Holds the most recent `MAX_ENTRIES` turns, independent of the vector
/// memory store, so the router can prepend short-term context without a
/// round trip through Postgres. Mirrors the load-or-default, ignore-errors
/// idiom used elsewhere in this codebase for small local JSON state files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationBuffer {
    entries: Vec<ConversationEntry>,
}

impl ConversationBuffer {
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    #[instrument(skip(self, path))]
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, json)
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Append an entry, truncating it and dropping the oldest entry once
    /// the ring exceeds `MAX_ENTRIES` (§3).
    pub fn push(&mut self, role: Role, text: &str) {
        let truncated = openclaw_core::text::truncate_with_suffix(text, MAX_ENTRY_CHARS, "...");
        self.entries.push(ConversationEntry {
            role,
            text: truncated,
            timestamp: Utc::now().to_rfc3339(),
        });
        while self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
    }

    /// Render as a transcript suitable for prepending to a prompt.
    pub fn format_transcript(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                let who = match e.role {
                    Role::User => "User",
                    Role::Ashley => "Ashley",
                };
                format!("{who}: {}", e.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_yields_empty_buffer() {
        let buf = ConversationBuffer::load(Path::new("/nonexistent/path/conversation.json"));
        assert!(buf.entries().is_empty());
    }

    #[test]
    fn push_truncates_long_entries() {
        let mut buf = ConversationBuffer::default();
        let long = "x".repeat(1000);
        buf.push(Role::User, &long);
        assert!(buf.entries()[0].text.len() <= MAX_ENTRY_CHARS + 3);
    }

    #[test]
    fn push_drops_oldest_beyond_max_entries() {
        let mut buf = ConversationBuffer::default();
        for i in 0..(MAX_ENTRIES + 5) {
            buf.push(Role::User, &format!("message {i}"));
        }
        assert_eq!(buf.entries().len(), MAX_ENTRIES);
        assert_eq!(buf.entries()[0].text, "message 5");
    }

    #[test]
    fn push_stamps_entry_with_timestamp() {
        let mut buf = ConversationBuffer::default();
        buf.push(Role::User, "hi");
        assert!(!buf.entries()[0].timestamp.is_empty());
    }

    #[test]
    fn format_transcript_labels_roles() {
        let mut buf = ConversationBuffer::default();
        buf.push(Role::User, "hi");
        buf.push(Role::Ashley, "hello");
        assert_eq!(buf.format_transcript(), "User: hi\nAshley: hello");
    }

    #[test]
    fn save_and_load_roundtrips() {
        let dir = std::env::temp_dir().join(format!(
            "openclaw-memory-test-{:?}",
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("conversation.json");

        let mut buf = ConversationBuffer::default();
        buf.push(Role::User, "remember this");
        buf.save(&path).unwrap();

        let loaded = ConversationBuffer::load(&path);
        assert_eq!(loaded.entries().len(), 1);
        assert_eq!(loaded.entries()[0].text, "remember this");

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }
}
