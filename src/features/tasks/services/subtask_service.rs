use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::tasks::dtos::{CreateSubTaskDto, UpdateSubTaskDto};
use crate::features::tasks::models::SubTask;

// Same visibility rule as the parent task, joined through subtasks
const VISIBLE_SUBTASK: &str = "EXISTS (
    SELECT 1 FROM tasks t
    WHERE t.id = s.task_id
      AND (
          t.creator_id = $1
          OR t.assignee_id = $1
          OR EXISTS (
              SELECT 1 FROM categories c
              WHERE c.id = t.category_id
                AND (c.owner_id = $1 OR EXISTS (
                    SELECT 1 FROM category_collaborators cc
                    WHERE cc.category_id = c.id AND cc.user_id = $1
                ))
          )
      )
)";

/// Service for subtask operations. Access follows the parent task: anyone
/// who can see the task can manage its checklist.
pub struct SubTaskService {
    pool: PgPool,
}

impl SubTaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a subtask to a visible task
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        task_id: Uuid,
        dto: CreateSubTaskDto,
    ) -> Result<SubTask> {
        let visible = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM tasks t
                WHERE t.id = $2
                  AND (
                      t.creator_id = $1
                      OR t.assignee_id = $1
                      OR EXISTS (
                          SELECT 1 FROM categories c
                          WHERE c.id = t.category_id
                            AND (c.owner_id = $1 OR EXISTS (
                                SELECT 1 FROM category_collaborators cc
                                WHERE cc.category_id = c.id AND cc.user_id = $1
                            ))
                      )
                  )
            )
            "#,
        )
        .bind(user.id)
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if !visible {
            return Err(AppError::NotFound("Task not found".to_string()));
        }

        sqlx::query_as::<_, SubTask>(
            r#"
            INSERT INTO subtasks (id, task_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, title, description, completed, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(task_id)
        .bind(dto.title.trim())
        .bind(dto.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create subtask: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Rename a subtask on a visible task
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        subtask_id: Uuid,
        dto: UpdateSubTaskDto,
    ) -> Result<SubTask> {
        let sql = format!(
            "UPDATE subtasks s SET title = $3, description = $4
             WHERE s.id = $2 AND {VISIBLE_SUBTASK}
             RETURNING id, task_id, title, description, completed, created_at"
        );
        sqlx::query_as::<_, SubTask>(&sql)
            .bind(user.id)
            .bind(subtask_id)
            .bind(dto.title.trim())
            .bind(dto.description.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update subtask: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Subtask not found".to_string()))
    }

    /// Complete or reopen a subtask. Subtask toggles never reschedule the
    /// parent; only completing the task itself advances a recurrence.
    pub async fn toggle(
        &self,
        user: &AuthenticatedUser,
        subtask_id: Uuid,
        completed: bool,
    ) -> Result<SubTask> {
        let sql = format!(
            "UPDATE subtasks s SET completed = $3
             WHERE s.id = $2 AND {VISIBLE_SUBTASK}
             RETURNING id, task_id, title, description, completed, created_at"
        );
        sqlx::query_as::<_, SubTask>(&sql)
            .bind(user.id)
            .bind(subtask_id)
            .bind(completed)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to toggle subtask: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Subtask not found".to_string()))
    }

    /// Delete a subtask from a visible task
    pub async fn delete(&self, user: &AuthenticatedUser, subtask_id: Uuid) -> Result<()> {
        let sql = format!("DELETE FROM subtasks s WHERE s.id = $2 AND {VISIBLE_SUBTASK}");
        let result = sqlx::query(&sql)
            .bind(user.id)
            .bind(subtask_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete subtask: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Subtask not found".to_string()));
        }
        Ok(())
    }
}
