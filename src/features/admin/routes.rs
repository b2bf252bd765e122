use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create routes for admin user management
///
/// Note: This feature requires authentication; handlers additionally
/// require the admin flag
pub fn routes(service: Arc<AdminService>) -> Router {
    Router::new()
        .route(
            "/api/admin/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/admin/users/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .with_state(service)
}
