//! POST /route — classify and dispatch a free-form message (§4.1).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::classify::route_text;

#[derive(Deserialize)]
pub struct RouteRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct RouteReply {
    pub reply: String,
}

#[derive(Serialize)]
pub struct RouteError {
    pub error: String,
}

/// Always 200 unless the body is not JSON, in which case Axum's `Json`
/// extractor rejects the request with 400 before this handler runs (§4.1).
pub async fn route_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteReply>, (StatusCode, Json<RouteError>)> {
    if req.text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(RouteError {
                error: "text must not be empty".to_string(),
            }),
        ));
    }

    let reply = route_text(&state, &req.text).await;
    Ok(Json(RouteReply { reply }))
}
