use async_trait::async_trait;

/// Abstraction over "deliver this text to the owner over the chat
/// transport" (§4.3, §4.2 pipeline deliveries). Implemented by
/// `openclaw-telegram`'s client; kept here rather than depending on that
/// crate directly, since the telegram poller in turn calls into dispatch to
/// classify and run pipelines.
#[async_trait]
pub trait OwnerNotifier: Send + Sync {
    async fn notify(&self, text: &str) -> bool;
}

/// Send a pre-computed agent answer to the owner (§4.2, mirrors the
/// reference implementation's `send_owner_message`).
///
/// Returns `(ok, reply)` exactly as the `/owner-message` endpoint's
/// response body shape requires.
pub async fn send_owner_message(
    notifier: &dyn OwnerNotifier,
    agent: &str,
    question: &str,
    response: &str,
) -> (bool, String) {
    let agent = agent.trim();
    let question = question.trim();
    let response = response.trim();

    if agent.is_empty() || question.is_empty() || response.is_empty() {
        return (
            false,
            "Missing required fields: agent, question, response".to_string(),
        );
    }

    let message = format!("Agent: {agent}\nQuestion: {question}\nResponse: {response}");
    if notifier.notify(&message).await {
        (true, "Delivered to owner".to_string())
    } else {
        (false, "Failed to deliver message to owner".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeNotifier(AtomicBool);

    #[async_trait]
    impl OwnerNotifier for FakeNotifier {
        async fn notify(&self, _text: &str) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let notifier = FakeNotifier(AtomicBool::new(true));
        let (ok, reply) = send_owner_message(&notifier, "", "q", "r").await;
        assert!(!ok);
        assert!(reply.contains("Missing required fields"));
    }

    #[tokio::test]
    async fn delivers_when_all_fields_present() {
        let notifier = FakeNotifier(AtomicBool::new(true));
        let (ok, _) = send_owner_message(&notifier, "planner", "port?", "8080").await;
        assert!(ok);
    }

    #[tokio::test]
    async fn reports_failure_when_transport_fails() {
        let notifier = FakeNotifier(AtomicBool::new(false));
        let (ok, reply) = send_owner_message(&notifier, "planner", "port?", "8080").await;
        assert!(!ok);
        assert!(reply.contains("Failed to deliver"));
    }
}
