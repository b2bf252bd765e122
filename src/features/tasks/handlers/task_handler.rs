use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::models::CategoryRef;
use crate::features::tasks::dtos::{CreateTaskDto, TaskResponseDto, ToggleTaskDto, UpdateTaskDto};
use crate::features::tasks::services::TaskService;
use crate::shared::types::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Optional narrowing over task and subtask titles
    pub q: Option<String>,
}

/// List pending tasks: visible, not completed, undated or due by today
#[utoipa::path(
    get,
    path = "/api/tasks/pending",
    params(
        ("q" = Option<String>, Query, description = "Filter over task and subtask titles")
    ),
    responses(
        (status = 200, description = "Pending tasks ordered by due date", body = ApiResponse<Vec<TaskResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pending_tasks(
    user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ApiResponse<Vec<TaskResponseDto>>>> {
    let today = Utc::now().date_naive();
    let tasks = service
        .list_pending(&user, today, query.q.as_deref())
        .await?;
    let dtos = tasks
        .into_iter()
        .map(|t| TaskResponseDto::from_details(t, today))
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// List the tasks inside a category (or the virtual shared view)
#[utoipa::path(
    get,
    path = "/api/categories/{id}/tasks",
    params(
        ("id" = String, Path, description = "Category ID or the shared view id"),
        ("q" = Option<String>, Query, description = "Filter over task and subtask titles")
    ),
    responses(
        (status = 200, description = "Tasks in the category, pending first", body = ApiResponse<Vec<TaskResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_category_tasks(
    user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<String>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ApiResponse<Vec<TaskResponseDto>>>> {
    let reference: CategoryRef = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid category id".to_string()))?;

    let today = Utc::now().date_naive();
    let tasks = service
        .list_for_category(&user, reference, query.q.as_deref())
        .await?;
    let dtos = tasks
        .into_iter()
        .map(|t| TaskResponseDto::from_details(t, today))
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = ApiResponse<TaskResponseDto>),
        (status = 400, description = "Validation error, including invalid recurrence"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_task(
    user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    AppJson(dto): AppJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<ApiResponse<TaskResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let today = Utc::now().date_naive();
    let task = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(TaskResponseDto::from_details(task, today)),
            Some("Task created".to_string()),
            None,
        )),
    ))
}

/// Update a task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse<TaskResponseDto>),
        (status = 400, description = "Validation error, including invalid recurrence"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_task(
    user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTaskDto>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let today = Utc::now().date_naive();
    let task = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(TaskResponseDto::from_details(task, today)),
        Some("Task updated".to_string()),
        None,
    )))
}

/// Delete a task (creator or category owner only)
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted", body = ApiResponse<utoipa::TupleUnit>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the creator or category owner"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_task(
    user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Task deleted".to_string()),
        None,
    )))
}

/// Complete or reopen a task; completing a recurring task reschedules it
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/toggle",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = ToggleTaskDto,
    responses(
        (status = 200, description = "Task state updated", body = ApiResponse<TaskResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_task(
    user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ToggleTaskDto>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    let today = Utc::now().date_naive();
    let task = service.toggle(&user, id, dto.completed).await?;
    Ok(Json(ApiResponse::success(
        Some(TaskResponseDto::from_details(task, today)),
        None,
        None,
    )))
}
