//! Sender allowlist enforcement (§4.6 step 3, §6.2).
//!
//! "Allowlist is a comma-separated list of sender ids or, absent, a single
//! chat id" (§6.2): when no allowlist is configured at all, the only check
//! is whether the message's chat id equals the configured owner chat id.

/// Returns `true` when `sender_id` (falling back to `chat_id` when the
/// update carries no `from` field) is permitted to interact with the bot.
pub fn is_allowed(allow_from: &[String], sender_id: i64, chat_id: i64, owner_chat_id: i64) -> bool {
    if allow_from.is_empty() {
        return chat_id == owner_chat_id;
    }
    let sender_str = sender_id.to_string();
    allow_from.iter().any(|entry| entry.trim() == sender_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allowlist_falls_back_to_owner_chat_id() {
        assert!(is_allowed(&[], 1, 555, 555));
        assert!(!is_allowed(&[], 1, 555, 999));
    }

    #[test]
    fn nonempty_allowlist_matches_sender_id_not_chat_id() {
        let list = vec!["111".to_string(), "222".to_string()];
        assert!(is_allowed(&list, 111, 999, 555));
        assert!(!is_allowed(&list, 333, 555, 555));
    }

    #[test]
    fn allowlist_entries_are_trimmed() {
        let list = vec![" 111 ".to_string()];
        assert!(is_allowed(&list, 111, 0, 0));
    }
}
