use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::tasks::dtos::{
    CreateSubTaskDto, SubTaskResponseDto, ToggleSubTaskDto, UpdateSubTaskDto,
};
use crate::features::tasks::services::SubTaskService;
use crate::shared::types::ApiResponse;

/// Add a subtask to a task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/subtasks",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = CreateSubTaskDto,
    responses(
        (status = 201, description = "Subtask created", body = ApiResponse<SubTaskResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_subtask(
    user: AuthenticatedUser,
    State(service): State<Arc<SubTaskService>>,
    Path(task_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateSubTaskDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubTaskResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let subtask = service.create(&user, task_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SubTaskResponseDto::from(subtask)),
            Some("Subtask created".to_string()),
            None,
        )),
    ))
}

/// Rename a subtask
#[utoipa::path(
    put,
    path = "/api/subtasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Subtask ID")
    ),
    request_body = UpdateSubTaskDto,
    responses(
        (status = 200, description = "Subtask updated", body = ApiResponse<SubTaskResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subtask not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_subtask(
    user: AuthenticatedUser,
    State(service): State<Arc<SubTaskService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSubTaskDto>,
) -> Result<Json<ApiResponse<SubTaskResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let subtask = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(SubTaskResponseDto::from(subtask)),
        Some("Subtask updated".to_string()),
        None,
    )))
}

/// Complete or reopen a subtask
#[utoipa::path(
    patch,
    path = "/api/subtasks/{id}/toggle",
    params(
        ("id" = Uuid, Path, description = "Subtask ID")
    ),
    request_body = ToggleSubTaskDto,
    responses(
        (status = 200, description = "Subtask state updated", body = ApiResponse<SubTaskResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subtask not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_subtask(
    user: AuthenticatedUser,
    State(service): State<Arc<SubTaskService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ToggleSubTaskDto>,
) -> Result<Json<ApiResponse<SubTaskResponseDto>>> {
    let subtask = service.toggle(&user, id, dto.completed).await?;
    Ok(Json(ApiResponse::success(
        Some(SubTaskResponseDto::from(subtask)),
        None,
        None,
    )))
}

/// Delete a subtask
#[utoipa::path(
    delete,
    path = "/api/subtasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Subtask ID")
    ),
    responses(
        (status = 200, description = "Subtask deleted", body = ApiResponse<utoipa::TupleUnit>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subtask not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_subtask(
    user: AuthenticatedUser,
    State(service): State<Arc<SubTaskService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Subtask deleted".to_string()),
        None,
    )))
}
