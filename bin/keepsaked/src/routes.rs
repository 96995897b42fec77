//! HTTP surface of the daemon.
//!
//! `PUT /values/{name}` stands in for the upstream pipeline delivering a
//! value to a channel (`null` deletes). `POST /replay/{id}` is the manual
//! trigger: 200 on success, 404 for an unknown id, 500 when the replay
//! itself fails.

use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use keepsake_common::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/channels", get(list_channels))
        .route("/values/{name}", put(put_value))
        .route("/values/{name}", get(get_value))
        .route("/replay/{id}", post(trigger_replay))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_channels(State(state): State<Arc<AppState>>) -> Json<HashMap<String, Uuid>> {
    Json(state.channel_index())
}

async fn put_value(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(value): Json<Value>,
) -> StatusCode {
    let value = match value {
        Value::Null => None,
        value => Some(value),
    };
    state.ingest(&name, value);
    StatusCode::NO_CONTENT
}

async fn get_value(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    match state.store().get(&name) {
        Some(value) => Json(value).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn trigger_replay(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    let Ok(id) = Uuid::parse_str(&id) else {
        return StatusCode::NOT_FOUND;
    };
    match state.replay(id).await {
        None => StatusCode::NOT_FOUND,
        Some(Ok(())) => StatusCode::OK,
        Some(Err(e)) => {
            error!("manual replay trigger failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
