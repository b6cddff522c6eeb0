//! Timetable skill - RTU MIREA schedule voice assistant backend
//!
//! A stateless webhook backend serving the same dialogue over three
//! voice platforms: Yandex Alice, VK Marusia and Sber Salut.

mod api;
mod config;
mod dialog;
mod orchestrator;
mod platform;
mod resolver;
mod schedule;
mod schedule_api;
mod store;
#[cfg(test)]
mod testing;
mod turn;

use api::{create_router, AppState};
use config::Config;
use orchestrator::Engine;
use schedule_api::HttpScheduleApi;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use store::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetable_skill=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&config.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;

    if config.schedule_api_url.is_none() {
        tracing::warn!("SCHEDULE_API_URL not set, schedule lookups disabled");
    }
    let schedule_api = HttpScheduleApi::new(config.schedule_api_url.clone());

    tracing::info!(
        semester_start = %config.semester_start,
        "Semester calendar configured"
    );

    let engine = Engine::new(Arc::new(db), Arc::new(schedule_api), config.semester_start);
    let state = AppState::new(engine);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Timetable skill listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
