use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Create routes for the users feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/sharing", get(handlers::list_for_sharing))
        .route("/api/users/search", get(handlers::search_users))
        .with_state(service)
}
