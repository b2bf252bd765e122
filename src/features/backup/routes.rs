use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::backup::handlers;
use crate::features::backup::services::BackupService;

/// Create routes for snapshot export and restore
///
/// Note: This feature requires authentication; handlers additionally
/// require the admin flag
pub fn routes(service: Arc<BackupService>) -> Router {
    Router::new()
        .route(
            "/api/admin/backup",
            get(handlers::export_backup).post(handlers::import_backup),
        )
        .with_state(service)
}
