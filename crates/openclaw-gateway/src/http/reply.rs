//! POST /reply — the owner's answer to the oldest pending question (§4.3).

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::classify::answer_oldest_pending;

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub answer: String,
}

#[derive(Serialize)]
pub struct ReplyReply {
    pub reply: String,
}

pub async fn reply_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReplyRequest>,
) -> Json<ReplyReply> {
    let reply = answer_oldest_pending(&state, req.answer.trim()).await;
    Json(ReplyReply { reply })
}
