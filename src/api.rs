//! HTTP surface
//!
//! One POST endpoint per platform plus an uptime probe. The handlers
//! are thin: all dialog behavior lives in [`Engine`], which never
//! fails, so every webhook call answers 200 with a well-formed body.

use crate::orchestrator::Engine;
use crate::turn::Platform;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
            started_at: Instant::now(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/alice", post(alice_webhook))
        .route("/api/v1/marusia", post(marusia_webhook))
        .route("/api/v1/sber", post(sber_webhook))
        .route("/api/v1/uptime", get(uptime))
        .with_state(state)
}

async fn alice_webhook(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    Json(state.engine.handle(Platform::Alice, &body).await)
}

async fn marusia_webhook(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    Json(state.engine.handle(Platform::Marusia, &body).await)
}

async fn sber_webhook(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    Json(state.engine.handle(Platform::Sber, &body).await)
}

async fn uptime(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}
