//! API route definitions

use crate::handlers;
use crate::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

/// Create the main application router
pub fn create_router(state: SharedState) -> Router {
    let api_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/github/user", get(handlers::github_user))
        .route("/github/repositories", get(handlers::github_repositories))
        .route("/github/featured", get(handlers::github_featured))
        .route("/github/stats", get(handlers::github_stats))
        .route("/contact", post(handlers::submit_contact))
        .route("/contact/messages", get(handlers::contact_messages))
        .route("/contact/messages/{id}/read", post(handlers::mark_message_read))
        .route("/contact/stats", get(handlers::contact_stats))
        .route("/portfolio", get(handlers::portfolio))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
}
