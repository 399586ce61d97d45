//! POST /owner-message — deliver a pre-computed agent answer to the owner
//! over the chat transport (§4.1).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use openclaw_dispatch::send_owner_message;
use serde::{Deserialize, Serialize};

use crate::app::AppState;

#[derive(Deserialize)]
pub struct OwnerMessageRequest {
    pub agent: String,
    pub question: String,
    pub response: String,
}

#[derive(Serialize)]
pub struct OwnerMessageReply {
    pub ok: bool,
    pub reply: String,
}

pub async fn owner_message_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OwnerMessageRequest>,
) -> (StatusCode, Json<OwnerMessageReply>) {
    let (ok, reply) = send_owner_message(
        state.dispatch.notifier.as_ref(),
        &req.agent,
        &req.question,
        &req.response,
    )
    .await;

    let status = if ok { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    (status, Json(OwnerMessageReply { ok, reply }))
}
