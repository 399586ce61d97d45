use openclaw_sql::{escape_sql_literal, parse_rows, PostgresClient};
use tracing::instrument;

use crate::types::{parse_unblock_status_alias, BlockedTask, TaskDetail, TaskStatus, TaskSummary};

/// Read-mostly access to the external `autonomous_tasks` table (§3).
///
/// The core never drives status transitions on its own initiative — the
/// external task-manager owns that — except for `/unblock`, a core-owned
/// mutation (§4.6), and solution-appending on question answer (§4.3 step 4).
#[derive(Debug, Clone)]
pub struct TaskStore {
    sql: PostgresClient,
}

impl TaskStore {
    pub fn new(sql: PostgresClient) -> Self {
        Self { sql }
    }

    /// `status -> count` summary, e.g. "Tasks: TODO=3, BLOCKED=1".
    #[instrument(skip(self))]
    pub async fn summarize(&self) -> String {
        let rows = self
            .sql
            .run_query("SELECT status, COUNT(*) FROM autonomous_tasks GROUP BY status ORDER BY status;")
            .await;
        let parsed = parse_rows(&rows);
        if parsed.is_empty() {
            return "No tasks found.".to_string();
        }
        let pairs: Vec<String> = parsed
            .iter()
            .filter_map(|r| Some(format!("{}={}", r.first()?, r.get(1)?)))
            .collect();
        format!("Tasks: {}", pairs.join(", "))
    }

    #[instrument(skip(self))]
    pub async fn summarize_detailed(&self, limit: u32) -> String {
        let query = format!(
            "SELECT id, name, status FROM autonomous_tasks ORDER BY id DESC LIMIT {limit};"
        );
        let rows = self.sql.run_query(&query).await;
        let parsed = parse_rows(&rows);
        if parsed.is_empty() {
            return "No tasks found.".to_string();
        }
        let mut lines = vec!["Recent tasks:".to_string()];
        for r in parsed {
            if let (Some(id), Some(name), Some(status)) = (r.first(), r.get(1), r.get(2)) {
                lines.push(format!("#{id} [{status}] {name}"));
            }
        }
        lines.join("\n")
    }

    /// Three-counter summary for `/tasks`.
    #[instrument(skip(self))]
    pub async fn counts(&self) -> (i64, i64, i64) {
        let query = "SELECT \
            COUNT(*) FILTER (WHERE status = 'TODO'), \
            COUNT(*) FILTER (WHERE status = 'IN_PROGRESS'), \
            COUNT(*) FILTER (WHERE status = 'READY_FOR_TESTING') \
            FROM autonomous_tasks;";
        let rows = self.sql.run_query(query).await;
        let parsed = parse_rows(&rows);
        let row = parsed.first();
        let get = |i: usize| -> i64 {
            row.and_then(|r| r.get(i))
                .and_then(|s| s.parse().ok())
                .unwrap_or(0)
        };
        (get(0), get(1), get(2))
    }

    #[instrument(skip(self))]
    pub async fn list_blocked(&self, limit: u32) -> Vec<BlockedTask> {
        let query = format!(
            "SELECT id, name, COALESCE(blocked_reason,'') FROM autonomous_tasks \
             WHERE status = 'BLOCKED' ORDER BY priority DESC, id ASC LIMIT {limit};"
        );
        let rows = self.sql.run_query(&query).await;
        parse_rows(&rows)
            .into_iter()
            .filter_map(|r| {
                Some(BlockedTask {
                    id: r.first()?.parse().ok()?,
                    name: r.get(1)?.clone(),
                    reason: r.get(2).cloned().unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Formats `list_blocked` the way §4.1/§4.6's handlers render it.
    pub fn format_blocked(tasks: &[BlockedTask]) -> String {
        if tasks.is_empty() {
            return "No blocked tasks.".to_string();
        }
        let mut lines = vec!["Blocked tasks:".to_string()];
        for t in tasks {
            lines.push(format!("#{} {}", t.id, t.name));
            if !t.reason.is_empty() {
                lines.push(t.reason.clone());
            }
        }
        lines.join("\n")
    }

    /// `/todo`, `/readyfortesting`, `/inprogress` (§4.6): top-20 listing
    /// of tasks in a given status, ordered the same way as
    /// [`Self::list_blocked`].
    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: TaskStatus, limit: u32) -> Vec<TaskSummary> {
        let query = format!(
            "SELECT id, name, COALESCE(phase,'') FROM autonomous_tasks \
             WHERE status = '{status}' ORDER BY priority DESC, id ASC LIMIT {limit};"
        );
        let rows = self.sql.run_query(&query).await;
        parse_rows(&rows)
            .into_iter()
            .filter_map(|r| {
                Some(TaskSummary {
                    id: r.first()?.parse().ok()?,
                    name: r.get(1)?.clone(),
                    phase: r.get(2).cloned().unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Formats [`Self::list_by_status`] the way §4.6's `/todo`,
    /// `/readyfortesting` and `/inprogress` handlers render it.
    pub fn format_status_list(label: &str, tasks: &[TaskSummary]) -> String {
        if tasks.is_empty() {
            return format!("No {label} tasks.");
        }
        let mut lines = vec![format!("{label} tasks:")];
        for t in tasks {
            if t.phase.is_empty() {
                lines.push(format!("#{} {}", t.id, t.name));
            } else {
                lines.push(format!("#{} {} ({})", t.id, t.name, t.phase));
            }
        }
        lines.join("\n")
    }

    #[instrument(skip(self))]
    pub async fn task_detail(&self, id: i64) -> Option<TaskDetail> {
        let query = format!(
            "SELECT id, name, status, COALESCE(phase,''), COALESCE(assigned_agent,''), \
             COALESCE(blocked_reason,'') FROM autonomous_tasks WHERE id = {id};"
        );
        let rows = self.sql.run_query(&query).await;
        let parsed = parse_rows(&rows);
        let r = parsed.first()?;
        Some(TaskDetail {
            id: r.first()?.parse().ok()?,
            name: r.get(1)?.clone(),
            status: r.get(2)?.clone(),
            phase: r.get(3).cloned().unwrap_or_default(),
            assigned_agent: r.get(4).cloned().unwrap_or_default(),
            blocked_reason: r.get(5).cloned().unwrap_or_default(),
        })
    }

    /// `/task <id>` detail view rendering (§4.6).
    pub fn format_detail(detail: &TaskDetail) -> String {
        let mut out = format!("#{} {}\nStatus: {}", detail.id, detail.name, detail.status);
        if !detail.phase.is_empty() {
            out.push_str(&format!("\nPhase: {}", detail.phase));
        }
        if !detail.assigned_agent.is_empty() {
            out.push_str(&format!("\nAgent: {}", detail.assigned_agent));
        }
        if !detail.blocked_reason.is_empty() {
            out.push_str(&format!("\nBlocked: {}", detail.blocked_reason));
        }
        out
    }

    /// `/unblock <id> [<status>] [<note>]` (§4.6). Only rows currently
    /// BLOCKED are touched; clears blocked_reason/error_log/assigned_agent/
    /// pid/started_at/attempt_count, sets the new status, optionally sets
    /// `solution`, and deletes the matching `blocked_reasons` side rows.
    #[instrument(skip(self, note))]
    pub async fn unblock(&self, id: i64, status: Option<TaskStatus>, note: &str) -> u32 {
        let target = status.unwrap_or(TaskStatus::Todo);
        let solution_clause = if note.trim().is_empty() {
            String::new()
        } else {
            format!(", solution = '{}'", escape_sql_literal(note.trim()))
        };
        let query = format!(
            "WITH updated AS (\
                UPDATE autonomous_tasks SET status = '{target}', blocked_reason = NULL, \
                error_log = NULL, assigned_agent = NULL, pid = NULL, started_at = NULL, \
                attempt_count = NULL{solution_clause} \
                WHERE id = {id} AND status = 'BLOCKED' RETURNING id) \
             SELECT COUNT(*) FROM updated;"
        );
        let count = self.sql.run_query(&query).await;
        let changed: u32 = count.trim().parse().unwrap_or(0);
        if changed > 0 {
            let cleanup = format!("DELETE FROM blocked_reasons WHERE task_id = {id};");
            let _ = self.sql.run_query(&cleanup).await;
        }
        changed
    }

    /// `/unblock all` — bulk variant of [`Self::unblock`].
    #[instrument(skip(self, note))]
    pub async fn unblock_all(&self, status: Option<TaskStatus>, note: &str) -> u32 {
        let target = status.unwrap_or(TaskStatus::Todo);
        let solution_clause = if note.trim().is_empty() {
            String::new()
        } else {
            format!(", solution = '{}'", escape_sql_literal(note.trim()))
        };
        let query = format!(
            "WITH updated AS (\
                UPDATE autonomous_tasks SET status = '{target}', blocked_reason = NULL, \
                error_log = NULL, assigned_agent = NULL, pid = NULL, started_at = NULL, \
                attempt_count = NULL{solution_clause} \
                WHERE status = 'BLOCKED' RETURNING id) \
             SELECT id FROM updated;"
        );
        let rows = self.sql.run_query(&query).await;
        let ids = parse_rows(&rows);
        if !ids.is_empty() {
            let _ = self.sql.run_query("DELETE FROM blocked_reasons;").await;
        }
        ids.len() as u32
    }

    /// Most recently touched non-empty project name — used to infer the
    /// project for `/project <note>` when no project prefix is given.
    #[instrument(skip(self))]
    pub async fn latest_project_name(&self) -> String {
        let rows = self
            .sql
            .run_query(
                "SELECT project FROM autonomous_tasks WHERE COALESCE(project,'') <> '' \
                 ORDER BY id DESC LIMIT 1;",
            )
            .await;
        rows.trim().to_string()
    }

    /// Append an owner-answer block to `autonomous_tasks.solution` (§4.3
    /// step 4).
    #[instrument(skip(self, question, answer))]
    pub async fn append_owner_answer(&self, task_id: i64, question_id: i64, question: &str, answer: &str) {
        let block = format!(
            "--- Owner Answer (Q#{question_id}) ---\nQ: {question}\nA: {answer}\n"
        );
        let query = format!(
            "UPDATE autonomous_tasks SET solution = COALESCE(solution, '') || '{}' WHERE id = {task_id};",
            escape_sql_literal(&block)
        );
        let _ = self.sql.run_query(&query).await;
    }

    pub fn parse_status_alias(token: &str) -> Option<TaskStatus> {
        parse_unblock_status_alias(token)
    }

    /// Count of tasks completed in the last `days` days — the task half of
    /// the `/weeklyreview` aggregator (SPEC_FULL.md §4.1 item 11 expansion).
    #[instrument(skip(self))]
    pub async fn completed_since(&self, days: i64) -> i64 {
        let query = format!(
            "SELECT COUNT(*) FROM autonomous_tasks \
             WHERE status = 'COMPLETE' AND completed_at > now() - interval '{days} days';"
        );
        let rows = self.sql.run_query(&query).await;
        rows.trim().parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_blocked_empty() {
        assert_eq!(TaskStore::format_blocked(&[]), "No blocked tasks.");
    }

    #[test]
    fn format_blocked_includes_reason_when_present() {
        let tasks = vec![BlockedTask {
            id: 3,
            name: "thing".into(),
            reason: "waiting on owner".into(),
        }];
        let out = TaskStore::format_blocked(&tasks);
        assert!(out.contains("#3 thing"));
        assert!(out.contains("waiting on owner"));
    }

    #[test]
    fn format_status_list_empty() {
        assert_eq!(TaskStore::format_status_list("TODO", &[]), "No TODO tasks.");
    }

    #[test]
    fn format_status_list_includes_phase_when_present() {
        let tasks = vec![TaskSummary {
            id: 4,
            name: "widget".into(),
            phase: "build".into(),
        }];
        let out = TaskStore::format_status_list("TODO", &tasks);
        assert!(out.contains("#4 widget (build)"));
    }

    #[test]
    fn format_detail_includes_only_nonempty_fields() {
        let detail = TaskDetail {
            id: 1,
            name: "widget".into(),
            status: "TODO".into(),
            phase: "".into(),
            assigned_agent: "".into(),
            blocked_reason: "".into(),
        };
        let out = TaskStore::format_detail(&detail);
        assert_eq!(out, "#1 widget\nStatus: TODO");
    }
}
