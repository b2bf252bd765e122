use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::tasks::models::SubTask;

/// DTO for adding a subtask to a task
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,
}

/// DTO for renaming a subtask
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,
}

/// DTO for completing or reopening a subtask
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleSubTaskDto {
    pub completed: bool,
}

/// Response DTO for a subtask
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubTaskResponseDto {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SubTask> for SubTaskResponseDto {
    fn from(subtask: SubTask) -> Self {
        Self {
            id: subtask.id,
            title: subtask.title,
            description: subtask.description,
            completed: subtask.completed,
            created_at: subtask.created_at,
        }
    }
}
