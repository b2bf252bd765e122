use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::backup::dtos::{BackupDocument, ImportSummaryDto};
use crate::features::backup::services::BackupService;
use crate::shared::types::ApiResponse;

/// Download a full snapshot of the database.
/// Returned raw rather than enveloped so the document can be re-imported
/// as-is.
#[utoipa::path(
    get,
    path = "/api/admin/backup",
    responses(
        (status = 200, description = "Snapshot document", body = BackupDocument),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "backup",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_backup(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<BackupService>>,
) -> Result<Json<BackupDocument>> {
    let doc = service.export().await?;
    Ok(Json(doc))
}

/// Restore a snapshot document. Applies completely or not at all.
#[utoipa::path(
    post,
    path = "/api/admin/backup",
    request_body = BackupDocument,
    responses(
        (status = 200, description = "Snapshot applied", body = ApiResponse<ImportSummaryDto>),
        (status = 400, description = "Malformed document or dangling reference"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "backup",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_backup(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<BackupService>>,
    AppJson(doc): AppJson<BackupDocument>,
) -> Result<Json<ApiResponse<ImportSummaryDto>>> {
    let summary = service.import(doc).await?;
    Ok(Json(ApiResponse::success(
        Some(summary),
        Some("Backup restored".to_string()),
        None,
    )))
}
