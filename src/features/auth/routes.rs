use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;

/// Routes that must stay reachable without a session (login, first-run setup)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route(
            "/api/auth/bootstrap",
            get(handlers::bootstrap_status).post(handlers::bootstrap),
        )
        .route("/api/auth/login", post(handlers::login))
        .with_state(service)
}

/// Routes behind the auth middleware
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}
