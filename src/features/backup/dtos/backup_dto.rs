use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::BACKUP_FORMAT_VERSION;

/// A complete database snapshot. Field encodings mirror the storage
/// columns one-to-one so a restore is a plain upsert.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub users: Vec<BackupUser>,
    pub categories: Vec<BackupCategory>,
    pub tasks: Vec<BackupTask>,
}

fn default_version() -> u32 {
    BACKUP_FORMAT_VERSION
}

/// Account snapshot; carries the bcrypt hash so logins survive a restore
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupCategory {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub owner_id: Uuid,
    #[serde(default)]
    pub collaborator_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupTask {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub importance: i32,
    pub due_date: Option<NaiveDate>,
    pub category_id: Uuid,
    pub creator_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub is_recurring: bool,
    pub recurrence_interval: Option<String>,
    pub recurrence_week_days: Option<String>,
    pub recurrence_day_of_month: Option<i32>,
    pub recurrence_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub subtasks: Vec<BackupSubTask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupSubTask {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// What an import applied
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummaryDto {
    pub users: usize,
    pub categories: usize,
    pub tasks: usize,
    pub subtasks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defaults_when_absent() {
        let doc: BackupDocument = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "users": [],
            "categories": [],
            "tasks": []
        }))
        .unwrap();
        assert_eq!(doc.version, BACKUP_FORMAT_VERSION);
    }

    #[test]
    fn test_missing_arrays_are_rejected() {
        let result: Result<BackupDocument, _> = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "users": []
        }));
        assert!(result.is_err());
    }
}
