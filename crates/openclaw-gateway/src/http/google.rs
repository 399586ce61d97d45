//! Gmail/Calendar JSON façade endpoints (§4.1 endpoint table), thin wrappers
//! over `GoogleServices` returning its `Value` payloads verbatim.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;

const DEFAULT_MAX_RESULTS: u32 = 20;

pub async fn gmail_unread(State(state): State<Arc<AppState>>) -> Json<Value> {
    let count = state.google.count_unread().await;
    Json(serde_json::json!({ "ok": count.is_some(), "unread": count.unwrap_or(0) }))
}

pub async fn gmail_inbox(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.google.list_emails("", DEFAULT_MAX_RESULTS).await)
}

#[derive(Deserialize)]
pub struct GmailSendRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub async fn gmail_send(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GmailSendRequest>,
) -> Json<Value> {
    Json(state.google.send_email(&req.to, &req.subject, &req.body).await)
}

#[derive(Deserialize)]
pub struct GmailReadRequest {
    pub message_id: String,
}

pub async fn gmail_read(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GmailReadRequest>,
) -> Json<Value> {
    Json(state.google.read_email(&req.message_id).await)
}

#[derive(Deserialize)]
pub struct GmailSearchRequest {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<u32>,
}

pub async fn gmail_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GmailSearchRequest>,
) -> Json<Value> {
    let max_results = req.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    Json(state.google.list_emails(&req.query, max_results).await)
}

pub async fn calendar_today(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.google.list_events("today").await)
}

pub async fn calendar_week(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.google.list_events("week").await)
}

#[derive(Deserialize)]
pub struct CalendarCreateRequest {
    pub summary: String,
    pub start: String,
    pub end: String,
}

pub async fn calendar_create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalendarCreateRequest>,
) -> Json<Value> {
    Json(
        state
            .google
            .create_event(&req.summary, &req.start, &req.end)
            .await,
    )
}

#[derive(Deserialize)]
pub struct CalendarDeleteRequest {
    pub event_id: String,
}

pub async fn calendar_delete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalendarDeleteRequest>,
) -> Json<Value> {
    Json(state.google.delete_event(&req.event_id).await)
}
