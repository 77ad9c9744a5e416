pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::guidance::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/chat", post(handlers::handle_chat))
        .route("/api/recommend", post(handlers::handle_recommend))
        .route(
            "/api/roadmap",
            post(handlers::handle_roadmap).get(handlers::handle_roadmap_query),
        )
        .route("/api/process_resume", post(handlers::handle_process_resume))
        .route("/api/upload-resume", post(handlers::handle_upload_resume))
        .route("/api/embed", post(handlers::handle_embed))
        .route("/api/match", post(handlers::handle_match))
        .fallback(not_found)
        .with_state(state)
}
