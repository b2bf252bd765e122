use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::models::CategoryRef;
use crate::features::tasks::dtos::{CreateTaskDto, UpdateTaskDto};
use crate::features::tasks::models::{SubTask, Task, TaskDetails};
use crate::features::tasks::recurrence::RecurrenceRule;
use crate::features::users::models::UserRef;

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.completed, t.importance, t.due_date, \
     t.category_id, t.creator_id, t.assignee_id, t.reminder_at, t.is_recurring, \
     t.recurrence_interval, t.recurrence_week_days, t.recurrence_day_of_month, \
     t.recurrence_end_date, t.created_at, t.updated_at";

// SQL mirror of visibility::task_visible, with $1 as the viewer
const VISIBLE_TASK: &str = "(
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
)";

/// Service for task operations: listing through the visibility rules,
/// recurrence-aware completion, and the usual CRUD.
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pending tasks for the user: visible, not completed, and either
    /// undated or due on/before `today`. Overdue occurrences stay listed
    /// until completed.
    pub async fn list_pending(
        &self,
        user: &AuthenticatedUser,
        today: NaiveDate,
        query: Option<&str>,
    ) -> Result<Vec<TaskDetails>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t
             WHERE t.completed = FALSE
               AND (t.due_date IS NULL OR t.due_date <= $2)
               AND {VISIBLE_TASK}
             ORDER BY t.due_date ASC NULLS LAST, t.created_at ASC"
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user.id)
            .bind(today)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list pending tasks: {:?}", e);
                AppError::Database(e)
            })?;

        self.hydrate_filtered(tasks, query).await
    }

    /// Tasks inside a category, or the computed shared-with-me set for the
    /// virtual reference. Ordered pending-first, then by due date with
    /// undated tasks last.
    pub async fn list_for_category(
        &self,
        user: &AuthenticatedUser,
        reference: CategoryRef,
        query: Option<&str>,
    ) -> Result<Vec<TaskDetails>> {
        let tasks = match reference {
            CategoryRef::Stored(category_id) => {
                if !self.category_visible(user.id, category_id).await? {
                    return Err(AppError::NotFound("Category not found".to_string()));
                }
                // ORDER BY mirrors Task::listing_order
                let sql = format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE t.category_id = $1
                     ORDER BY t.completed ASC, t.due_date ASC NULLS LAST, t.created_at ASC"
                );
                sqlx::query_as::<_, Task>(&sql)
                    .bind(category_id)
                    .fetch_all(&self.pool)
                    .await
            }
            CategoryRef::SharedWithMe => {
                let sql = format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE t.creator_id <> $1 AND {VISIBLE_TASK}
                     ORDER BY t.completed ASC, t.due_date ASC NULLS LAST, t.created_at ASC"
                );
                sqlx::query_as::<_, Task>(&sql)
                    .bind(user.id)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to list category tasks: {:?}", e);
            AppError::Database(e)
        })?;

        self.hydrate_filtered(tasks, query).await
    }

    /// Create a task in a visible category
    pub async fn create(&self, user: &AuthenticatedUser, dto: CreateTaskDto) -> Result<TaskDetails> {
        if !self.category_visible(user.id, dto.category_id).await? {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        let rule = validate_recurrence(
            dto.recurrence_interval.as_deref(),
            &dto.recurrence_week_days,
            dto.recurrence_day_of_month,
            dto.recurrence_end_date,
            dto.due_date,
        )?;

        let sql = format!(
            "INSERT INTO tasks (id, title, description, completed, importance, due_date,
                 category_id, creator_id, assignee_id, reminder_at, is_recurring,
                 recurrence_interval, recurrence_week_days, recurrence_day_of_month,
                 recurrence_end_date)
             VALUES ($1, $2, $3, FALSE, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {}",
            TASK_COLUMNS.replace("t.", "")
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(Uuid::new_v4())
            .bind(dto.title.trim())
            .bind(dto.description.as_deref())
            .bind(dto.importance)
            .bind(dto.due_date)
            .bind(dto.category_id)
            .bind(user.id)
            .bind(dto.assignee_id)
            .bind(dto.reminder_at)
            .bind(rule.is_some())
            .bind(rule.as_ref().map(|r| r.interval_name()))
            .bind(rule.as_ref().and_then(|r| r.week_days_column()))
            .bind(rule.as_ref().and_then(|r| r.day_of_month_column()))
            .bind(rule.as_ref().and_then(|r| r.end_date))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Validation("Unknown assignee".to_string())
                } else {
                    tracing::error!("Failed to create task: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        self.load_details(task).await
    }

    /// Update a visible task; any user who can see the task can edit it
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        task_id: Uuid,
        dto: UpdateTaskDto,
    ) -> Result<TaskDetails> {
        let task = self.find_visible(user.id, task_id).await?;

        let category_id = dto.category_id.unwrap_or(task.category_id);
        if category_id != task.category_id && !self.category_visible(user.id, category_id).await? {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        let rule = validate_recurrence(
            dto.recurrence_interval.as_deref(),
            &dto.recurrence_week_days,
            dto.recurrence_day_of_month,
            dto.recurrence_end_date,
            dto.due_date,
        )?;

        let sql = format!(
            "UPDATE tasks SET
                 title = $2, description = $3, importance = $4, due_date = $5,
                 category_id = $6, assignee_id = $7, reminder_at = $8,
                 is_recurring = $9, recurrence_interval = $10, recurrence_week_days = $11,
                 recurrence_day_of_month = $12, recurrence_end_date = $13, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS.replace("t.", "")
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(dto.title.trim())
            .bind(dto.description.as_deref())
            .bind(dto.importance)
            .bind(dto.due_date)
            .bind(category_id)
            .bind(dto.assignee_id)
            .bind(dto.reminder_at)
            .bind(rule.is_some())
            .bind(rule.as_ref().map(|r| r.interval_name()))
            .bind(rule.as_ref().and_then(|r| r.week_days_column()))
            .bind(rule.as_ref().and_then(|r| r.day_of_month_column()))
            .bind(rule.as_ref().and_then(|r| r.end_date))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Validation("Unknown assignee".to_string())
                } else {
                    tracing::error!("Failed to update task: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        self.load_details(task).await
    }

    /// Delete a task. Restricted to its creator or the category owner.
    pub async fn delete(&self, user: &AuthenticatedUser, task_id: Uuid) -> Result<()> {
        let task = self.find_visible(user.id, task_id).await?;

        let owner_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT owner_id FROM categories WHERE id = $1",
        )
        .bind(task.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if task.creator_id != user.id && owner_id != user.id {
            return Err(AppError::Forbidden(
                "Only the creator or category owner can delete a task".to_string(),
            ));
        }

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete task: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    /// Complete or reopen a task.
    ///
    /// Completing a recurring occurrence reschedules instead of archiving:
    /// the due date moves to the next occurrence and the subtask flags reset,
    /// all in one transaction. When the next occurrence falls past the end
    /// date the task completes for good.
    pub async fn toggle(
        &self,
        user: &AuthenticatedUser,
        task_id: Uuid,
        completed: bool,
    ) -> Result<TaskDetails> {
        let task = self.find_visible(user.id, task_id).await?;

        if !completed {
            let task = self.set_completed(task_id, false).await?;
            return self.load_details(task).await;
        }

        let rule = match task.recurrence() {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!("Task {} has a malformed recurrence descriptor: {}", task.id, e);
                None
            }
        };

        let next = match (&rule, task.due_date) {
            (Some(rule), Some(due)) => rule.next_occurrence(due, due),
            _ => None,
        };

        let task = match next {
            Some(next_due) => self.advance_occurrence(task_id, next_due).await?,
            None => self.set_completed(task_id, true).await?,
        };
        self.load_details(task).await
    }

    async fn advance_occurrence(&self, task_id: Uuid, next_due: NaiveDate) -> Result<Task> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let sql = format!(
            "UPDATE tasks SET completed = FALSE, due_date = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS.replace("t.", "")
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(next_due)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to advance recurring task: {:?}", e);
                AppError::Database(e)
            })?;

        // The new occurrence starts with a clean checklist
        sqlx::query("UPDATE subtasks SET completed = FALSE WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(task)
    }

    async fn set_completed(&self, task_id: Uuid, completed: bool) -> Result<Task> {
        let sql = format!(
            "UPDATE tasks SET completed = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            TASK_COLUMNS.replace("t.", "")
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(completed)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to toggle task: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Fetch a task the user can see; invisible tasks read as absent
    async fn find_visible(&self, user_id: Uuid, task_id: Uuid) -> Result<Task> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = $2 AND {VISIBLE_TASK}");
        sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
    }

    async fn category_visible(&self, user_id: Uuid, category_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories c
                WHERE c.id = $2
                  AND (c.owner_id = $1 OR EXISTS (
                      SELECT 1 FROM category_collaborators cc
                      WHERE cc.category_id = c.id AND cc.user_id = $1
                  ))
            )
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn hydrate_filtered(
        &self,
        tasks: Vec<Task>,
        query: Option<&str>,
    ) -> Result<Vec<TaskDetails>> {
        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            let d = self.load_details(task).await?;
            if query.map_or(true, |q| d.matches_query(q)) {
                details.push(d);
            }
        }
        // Narrowing keeps the row order; the stable sort re-asserts
        // Task::listing_order without disturbing equal rows
        details.sort_by(|a, b| a.task.listing_order(&b.task));
        Ok(details)
    }

    pub(crate) async fn load_details(&self, task: Task) -> Result<TaskDetails> {
        let subtasks = sqlx::query_as::<_, SubTask>(
            "SELECT id, task_id, title, description, completed, created_at
             FROM subtasks WHERE task_id = $1 ORDER BY created_at ASC",
        )
        .bind(task.id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let creator = sqlx::query_as::<_, UserRef>("SELECT id, username FROM users WHERE id = $1")
            .bind(task.creator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let assignee = match task.assignee_id {
            Some(id) => {
                sqlx::query_as::<_, UserRef>("SELECT id, username FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?
            }
            None => None,
        };

        let (category_name, category_color) = sqlx::query_as::<_, (String, String)>(
            "SELECT name, color FROM categories WHERE id = $1",
        )
        .bind(task.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(TaskDetails {
            task,
            subtasks,
            creator,
            assignee,
            category_name,
            category_color,
        })
    }
}

/// Validate the flat recurrence fields from a write DTO, yielding the rule
/// for recurring tasks and `None` for one-offs.
fn validate_recurrence(
    interval: Option<&str>,
    week_days: &[u8],
    day_of_month: Option<i32>,
    end_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
) -> Result<Option<RecurrenceRule>> {
    match interval {
        Some(interval) => {
            RecurrenceRule::from_parts(interval, week_days, day_of_month, end_date, due_date)
                .map(Some)
                .map_err(|e| AppError::Validation(e.to_string()))
        }
        None => Ok(None),
    }
}
