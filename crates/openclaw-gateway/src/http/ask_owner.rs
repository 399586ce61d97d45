//! POST /ask-owner — the question–answer rendezvous entry point (§4.3).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use openclaw_store::Agent;
use serde::{Deserialize, Serialize};

use crate::app::AppState;

#[derive(Deserialize)]
pub struct AskOwnerRequest {
    pub agent: String,
    #[serde(default)]
    pub task_id: Option<i64>,
    pub question: String,
}

#[derive(Serialize)]
pub struct AskOwnerReply {
    pub ok: bool,
    pub result: String,
}

/// §4.3 steps 1-4: expire old questions, insert a new pending row, notify
/// the owner referencing its id, return the assigned id.
pub async fn ask_owner_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskOwnerRequest>,
) -> (StatusCode, Json<AskOwnerReply>) {
    if req.question.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AskOwnerReply {
                ok: false,
                result: "question must not be empty".to_string(),
            }),
        );
    }
    let Ok(agent) = req.agent.parse::<Agent>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(AskOwnerReply {
                ok: false,
                result: format!("unknown agent: {}", req.agent),
            }),
        );
    };

    let Some(id) = state.pending.create(agent, req.task_id, &req.question).await else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AskOwnerReply {
                ok: false,
                result: "failed to record pending question".to_string(),
            }),
        );
    };

    let message = format!("Question #{id} from {agent}: {}", req.question);
    state.dispatch.notifier.notify(&message).await;

    (
        StatusCode::OK,
        Json(AskOwnerReply {
            ok: true,
            result: id.to_string(),
        }),
    )
}
