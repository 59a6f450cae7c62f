use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Token issuance
        .route("/api/token", get(handlers::issue_token))
        // Recording control
        .route(
            "/api/recording",
            post(handlers::start_recording)
                .delete(handlers::stop_recording)
                .get(handlers::recording_status),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
