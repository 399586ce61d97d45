use chrono::Utc;
use openclaw_sql::{escape_sql_literal, parse_rows, PostgresClient};
use tracing::instrument;

use crate::types::{Agent, PendingQuestion, QuestionStatus};

/// Expiration TTL for pending questions (§3, §4.3): 60 minutes.
pub const QUESTION_TTL_MINUTES: i64 = 60;

/// DB-backed pending-question table (§3, §4.3): the rendezvous by which a
/// background agent's question is bound to a later owner reply.
#[derive(Debug, Clone)]
pub struct PendingQuestionStore {
    sql: PostgresClient,
}

impl PendingQuestionStore {
    pub fn new(sql: PostgresClient) -> Self {
        Self { sql }
    }

    /// Expire any pending rows whose `created_at` is older than the TTL.
    /// Run opportunistically before every list/ask/answer operation — there
    /// is no dedicated reaper (§9 Open Questions).
    #[instrument(skip(self))]
    pub async fn expire_old(&self) {
        let query = format!(
            "UPDATE pending_questions SET status = 'expired' \
             WHERE status = 'pending' AND created_at < NOW() - INTERVAL '{QUESTION_TTL_MINUTES} minutes';"
        );
        let _ = self.sql.run_query(&query).await;
    }

    /// Insert a new pending question and return its assigned id (§4.3).
    #[instrument(skip(self, question))]
    pub async fn create(&self, agent: Agent, task_id: Option<i64>, question: &str) -> Option<i64> {
        self.expire_old().await;
        let task_clause = task_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "NULL".to_string());
        let query = format!(
            "INSERT INTO pending_questions (agent, task_id, question, status, created_at) \
             VALUES ('{}', {task_clause}, '{}', 'pending', NOW()) RETURNING id;",
            agent,
            escape_sql_literal(question)
        );
        let result = self.sql.run_query(&query).await;
        result.trim().parse().ok()
    }

    /// All non-expired questions, oldest first, after running expiry.
    #[instrument(skip(self))]
    pub async fn list_pending(&self) -> Vec<PendingQuestion> {
        self.expire_old().await;
        let rows = self
            .sql
            .run_query(
                "SELECT id, agent, COALESCE(task_id::text,''), question, COALESCE(answer,''), \
                 status, created_at::text, COALESCE(answered_at::text,'') \
                 FROM pending_questions WHERE status = 'pending' ORDER BY id ASC;",
            )
            .await;
        parse_rows(&rows)
            .into_iter()
            .filter_map(row_to_question)
            .collect()
    }

    /// Answer the oldest pending question (§4.3, §8 property 3).
    ///
    /// Returns the answered question (with agent/task_id/question text
    /// populated) so the caller can dispatch the follow-up pipeline.
    #[instrument(skip(self, answer))]
    pub async fn answer_oldest(&self, answer: &str) -> Option<PendingQuestion> {
        self.expire_old().await;
        let select = self
            .sql
            .run_query(
                "SELECT id, agent, COALESCE(task_id::text,''), question \
                 FROM pending_questions WHERE status = 'pending' ORDER BY id ASC LIMIT 1;",
            )
            .await;
        let parsed = parse_rows(&select);
        let row = parsed.first()?;
        let id: i64 = row.first()?.parse().ok()?;
        let agent: Agent = row.get(1)?.parse().ok()?;
        let task_id: Option<i64> = row.get(2).and_then(|s| s.parse().ok());
        let question = row.get(3)?.clone();

        let update = format!(
            "UPDATE pending_questions SET status = 'answered', answer = '{}', answered_at = NOW() \
             WHERE id = {id};",
            escape_sql_literal(answer)
        );
        let _ = self.sql.run_query(&update).await;

        Some(PendingQuestion {
            id,
            agent,
            task_id,
            question,
            answer: Some(answer.to_string()),
            status: QuestionStatus::Answered,
            created_at: String::new(),
            answered_at: Some(Utc::now().to_rfc3339()),
        })
    }
}

fn row_to_question(r: Vec<String>) -> Option<PendingQuestion> {
    Some(PendingQuestion {
        id: r.first()?.parse().ok()?,
        agent: r.get(1)?.parse().ok()?,
        task_id: r.get(2).and_then(|s| s.parse().ok()),
        question: r.get(3)?.clone(),
        answer: r.get(4).filter(|s| !s.is_empty()).cloned(),
        status: QuestionStatus::Pending,
        created_at: r.get(6).cloned().unwrap_or_default(),
        answered_at: r.get(7).filter(|s| !s.is_empty()).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_to_question_parses_fields() {
        let row = vec![
            "7".to_string(),
            "coder".to_string(),
            "3".to_string(),
            "which port?".to_string(),
            "".to_string(),
            "pending".to_string(),
            "2024-01-01T00:00:00Z".to_string(),
            "".to_string(),
        ];
        let q = row_to_question(row).unwrap();
        assert_eq!(q.id, 7);
        assert_eq!(q.agent, Agent::Coder);
        assert_eq!(q.task_id, Some(3));
        assert_eq!(q.question, "which port?");
        assert!(q.answer.is_none());
    }
}
