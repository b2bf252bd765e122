use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::tasks::dtos::SubTaskResponseDto;
use crate::features::tasks::models::TaskDetails;
use crate::features::tasks::recurrence::{RecurrenceKind, RecurrenceRule};
use crate::features::users::dtos::UserRefDto;

/// DTO for creating a task
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    /// 0 = normal, 1 = important, 2 = urgent
    #[serde(default)]
    #[validate(range(min = 0, max = 2, message = "Importance must be 0, 1 or 2"))]
    pub importance: i32,

    pub due_date: Option<NaiveDate>,
    pub category_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub reminder_at: Option<DateTime<Utc>>,

    pub recurrence_interval: Option<String>,
    #[serde(default)]
    pub recurrence_week_days: Vec<u8>,
    pub recurrence_day_of_month: Option<i32>,
    pub recurrence_end_date: Option<NaiveDate>,
}

/// DTO for updating a task. Sent as a full representation; `category_id`
/// may move the task to another visible category.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, max = 2, message = "Importance must be 0, 1 or 2"))]
    pub importance: i32,

    pub due_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub reminder_at: Option<DateTime<Utc>>,

    pub recurrence_interval: Option<String>,
    #[serde(default)]
    pub recurrence_week_days: Vec<u8>,
    pub recurrence_day_of_month: Option<i32>,
    pub recurrence_end_date: Option<NaiveDate>,
}

/// DTO for completing or reopening a task
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleTaskDto {
    pub completed: bool,
}

/// Recurrence descriptor as exposed by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDto {
    pub interval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_days: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl From<&RecurrenceRule> for RecurrenceDto {
    fn from(rule: &RecurrenceRule) -> Self {
        let week_days = match &rule.kind {
            RecurrenceKind::Weekly { days } => Some(days.iter().copied().collect()),
            _ => None,
        };
        Self {
            interval: rule.interval_name().to_string(),
            week_days,
            day_of_month: rule.day_of_month_column(),
            end_date: rule.end_date,
        }
    }
}

/// The task's category, as embedded in task responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBriefDto {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

/// Response DTO for a task with its subtasks
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponseDto {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub importance: i32,
    pub due_date: Option<NaiveDate>,
    /// True when the current occurrence is due on or before `today`
    pub due_now: bool,
    pub reminder_at: Option<DateTime<Utc>>,
    pub category: CategoryBriefDto,
    pub creator: UserRefDto,
    pub assignee: Option<UserRefDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceDto>,
    pub subtasks: Vec<SubTaskResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponseDto {
    pub fn from_details(details: TaskDetails, today: NaiveDate) -> Self {
        let due_now = !details.task.completed
            && details.task.due_date.is_some_and(|d| d <= today);
        // A malformed stored descriptor renders as non-recurring rather
        // than failing the whole listing
        let recurrence = details
            .task
            .recurrence()
            .ok()
            .flatten()
            .as_ref()
            .map(RecurrenceDto::from);

        Self {
            id: details.task.id,
            title: details.task.title,
            description: details.task.description,
            completed: details.task.completed,
            importance: details.task.importance,
            due_date: details.task.due_date,
            due_now,
            reminder_at: details.task.reminder_at,
            category: CategoryBriefDto {
                id: details.task.category_id,
                name: details.category_name,
                color: details.category_color,
            },
            creator: UserRefDto::from(details.creator),
            assignee: details.assignee.map(UserRefDto::from),
            recurrence,
            subtasks: details
                .subtasks
                .into_iter()
                .map(SubTaskResponseDto::from)
                .collect(),
            created_at: details.task.created_at,
            updated_at: details.task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_rejects_out_of_range_importance() {
        let dto = CreateTaskDto {
            title: "Water plants".to_string(),
            description: None,
            importance: 5,
            due_date: None,
            category_id: Uuid::from_u128(1),
            assignee_id: None,
            reminder_at: None,
            recurrence_interval: None,
            recurrence_week_days: vec![],
            recurrence_day_of_month: None,
            recurrence_end_date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_recurrence_dto_carries_weekly_days() {
        let rule = RecurrenceRule::from_parts(
            "weekly",
            &[1, 3],
            None,
            None,
            NaiveDate::from_ymd_opt(2024, 1, 1),
        )
        .unwrap();
        let dto = RecurrenceDto::from(&rule);
        assert_eq!(dto.interval, "weekly");
        assert_eq!(dto.week_days, Some(vec![1, 3]));
        assert_eq!(dto.day_of_month, None);
    }
}
