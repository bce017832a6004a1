pub mod character;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod media;
pub mod prompt;
pub mod state;
pub mod utils;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::generate::generate_handler;
use crate::state::AppState;

/// Build the full router: the generation endpoint, a health probe, and
/// static file serving of the configured directory as the fallback.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/generate", post(generate_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
