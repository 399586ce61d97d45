//! GET /pending — structured listing of open questions (§4.1 endpoint table).
//!
//! Distinct from the `/pending` text ladder step in `classify.rs`, which
//! renders the same data as a formatted chat reply.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct PendingQuestionView {
    pub id: i64,
    pub agent: String,
    pub task_id: Option<i64>,
    pub question: String,
}

#[derive(Serialize)]
pub struct PendingReply {
    pub ok: bool,
    pub count: usize,
    pub questions: Vec<PendingQuestionView>,
}

pub async fn pending_handler(State(state): State<Arc<AppState>>) -> Json<PendingReply> {
    let questions: Vec<PendingQuestionView> = state
        .pending
        .list_pending()
        .await
        .into_iter()
        .map(|q| PendingQuestionView {
            id: q.id,
            agent: q.agent.to_string(),
            task_id: q.task_id,
            question: q.question,
        })
        .collect();

    Json(PendingReply {
        ok: true,
        count: questions.len(),
        questions,
    })
}
