//! The channel poller's fixed local-command shortlist (§4.6): a small set
//! of commands answered directly against `openclaw-store`/`openclaw-dispatch`
//! without a round trip through the HTTP router, grounded directly in
//! `original_source/telegram-task-commands.py`'s `handle_command`.

use openclaw_dispatch::{dispatch_followup, DispatchContext};
use openclaw_store::{PendingQuestionStore, TaskStatus, TaskStore};
use tracing::instrument;

const HELP_TEXT: &str = "Telegram task commands:\n\
/help - show this help\n\
/blockers - list blocked tasks (top 20)\n\
/todo - list TODO tasks (top 20)\n\
/inprogress - list in-progress tasks (top 20)\n\
/readyfortesting - list tasks ready for testing (top 20)\n\
/tasks - task counters\n\
/task <id> - show task status, phase, agent\n\
/unblock <id> [status] [note] - requeue a blocked task\n\
/unblock all [status] [note] - requeue all blocked tasks\n\
/retry <id> - alias for /unblock <id>\n\
/pending - list outstanding questions\n\
/answer <text> - answer the oldest pending question\n\
/digest now - send blocked tasks summary";

/// Bundles the stores and dispatch context the local-command shortlist
/// needs, plus the pieces required to dispatch a follow-up pipeline when
/// an owner reply resolves a pending question (§4.3).
#[derive(Clone)]
pub struct LocalCommands {
    pub tasks: TaskStore,
    pub pending: PendingQuestionStore,
    pub dispatch: DispatchContext,
}

impl LocalCommands {
    pub fn new(tasks: TaskStore, pending: PendingQuestionStore, dispatch: DispatchContext) -> Self {
        Self {
            tasks,
            pending,
            dispatch,
        }
    }

    /// Handle `text` if it matches one of the fixed local commands (§4.6),
    /// returning the reply to send. `None` means the poller should fall
    /// through to the implicit-answer check and then to `/route`.
    #[instrument(skip(self, text))]
    pub async fn handle(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let rest = parts.next().unwrap_or("").trim();

        match cmd.as_str() {
            "/help" | "help" => Some(HELP_TEXT.to_string()),
            "/blockers" => Some(self.format_blocked().await),
            "/todo" => Some(self.format_status(TaskStatus::Todo, "TODO").await),
            "/readyfortesting" => {
                Some(self.format_status(TaskStatus::ReadyForTesting, "ready-for-testing").await)
            }
            "/inprogress" => Some(self.format_status(TaskStatus::InProgress, "in-progress").await),
            "/tasks" => Some(self.format_counts().await),
            "/task" => Some(self.format_task_detail(rest).await),
            "/unblock" => Some(self.handle_unblock(rest).await),
            "/retry" => Some(self.handle_retry(rest).await),
            "/digest" if rest.eq_ignore_ascii_case("now") => Some(self.format_blocked().await),
            "/pending" => Some(self.format_pending().await),
            "/answer" => Some(self.handle_answer(rest).await),
            _ => None,
        }
    }

    /// Whether there is at least one outstanding pending question — the
    /// gate the poller uses to decide whether a non-slash message is an
    /// implicit answer (§4.3, §4.6).
    pub async fn has_pending(&self) -> bool {
        !self.pending.list_pending().await.is_empty()
    }

    async fn format_blocked(&self) -> String {
        let tasks = self.tasks.list_blocked(20).await;
        TaskStore::format_blocked(&tasks)
    }

    async fn format_status(&self, status: TaskStatus, label: &str) -> String {
        let tasks = self.tasks.list_by_status(status, 20).await;
        TaskStore::format_status_list(label, &tasks)
    }

    async fn format_counts(&self) -> String {
        let (todo, in_progress, ready) = self.tasks.counts().await;
        format!("Tasks: TODO={todo}, IN_PROGRESS={in_progress}, READY_FOR_TESTING={ready}")
    }

    async fn format_task_detail(&self, rest: &str) -> String {
        let Ok(id) = rest.parse::<i64>() else {
            return "Usage: /task <id>".to_string();
        };
        match self.tasks.task_detail(id).await {
            Some(detail) => TaskStore::format_detail(&detail),
            None => format!("Task {id} not found."),
        }
    }

    /// `/unblock <id> [<status>] [<note>]` and `/unblock all [...]` (§4.6).
    async fn handle_unblock(&self, rest: &str) -> String {
        let mut tokens = rest.split_whitespace();
        let Some(first) = tokens.next() else {
            return "Usage: /unblock <id|all> [status] [note]".to_string();
        };

        let remainder: Vec<&str> = tokens.collect();
        let (status, note) = Self::split_status_and_note(&remainder);

        if first.eq_ignore_ascii_case("all") {
            let changed = self.tasks.unblock_all(status, &note).await;
            return format!("Requeued {changed} blocked tasks.");
        }

        let Ok(id) = first.parse::<i64>() else {
            return "Usage: /unblock <id|all> [status] [note]".to_string();
        };
        let changed = self.tasks.unblock(id, status, &note).await;
        if changed > 0 {
            format!("Task {id} updated ({} changed).", changed)
        } else {
            format!("Task {id} not updated (not blocked or not found).")
        }
    }

    /// `/retry <id>` — alias for `/unblock <id>` with no status/note
    /// override (original source's `handle_command` treats `/retry` as a
    /// synonym for `/unblock` with an id-only argument).
    async fn handle_retry(&self, rest: &str) -> String {
        let Ok(id) = rest.trim().parse::<i64>() else {
            return "Usage: /retry <id>".to_string();
        };
        let changed = self.tasks.unblock(id, None, "").await;
        if changed > 0 {
            format!("Task {id} set to TODO.")
        } else {
            format!("Task {id} not updated (not blocked or not found).")
        }
    }

    /// Split the tokens after an `/unblock` id into an optional leading
    /// status alias plus the remaining solution note (§4.6): "remaining
    /// tokens after the recognized status are the solution-note".
    fn split_status_and_note(tokens: &[&str]) -> (Option<TaskStatus>, String) {
        let Some((head, tail)) = tokens.split_first() else {
            return (None, String::new());
        };
        if let Some(status) = TaskStore::parse_status_alias(head) {
            (Some(status), tail.join(" "))
        } else {
            (None, tokens.join(" "))
        }
    }

    async fn format_pending(&self) -> String {
        let questions = self.pending.list_pending().await;
        if questions.is_empty() {
            return "No pending questions.".to_string();
        }
        let mut lines = vec!["Pending questions:".to_string()];
        for q in questions {
            lines.push(format!("#{} [{}] {}", q.id, q.agent, q.question));
        }
        lines.join("\n")
    }

    /// `/answer <text>` (§4.3, §4.6): answers the oldest pending question
    /// and dispatches the originating agent's follow-up pipeline in the
    /// background, without blocking this reply.
    async fn handle_answer(&self, rest: &str) -> String {
        if rest.is_empty() {
            return "Usage: /answer <text>".to_string();
        }
        self.record_answer(rest).await
    }

    /// Shared by the explicit `/answer` command and the implicit
    /// free-text reply path (§4.3): answers the oldest pending question,
    /// appends to the task's solution when it has a `task_id`, and
    /// dispatches the follow-up pipeline.
    #[instrument(skip(self, answer_text))]
    pub async fn record_answer(&self, answer_text: &str) -> String {
        let Some(answered) = self.pending.answer_oldest(answer_text).await else {
            return "No pending question to answer.".to_string();
        };

        if let Some(task_id) = answered.task_id {
            self.tasks
                .append_owner_answer(task_id, answered.id, &answered.question, answer_text)
                .await;
        }

        let dispatch = self.dispatch.clone();
        let agent = answered.agent.to_string();
        let question = answered.question.clone();
        let answer = answer_text.to_string();
        tokio::spawn(async move {
            dispatch_followup(&dispatch, &agent, &question, &answer).await;
        });

        format!("Answer recorded for question #{}", answered.id)
    }
}
