use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, AppError, Result};
use crate::features::backup::dtos::{
    BackupCategory, BackupDocument, BackupSubTask, BackupTask, BackupUser, ImportSummaryDto,
};
use crate::features::categories::models::Category;
use crate::features::tasks::models::{SubTask, Task};
use crate::features::users::models::User;
use crate::shared::constants::BACKUP_FORMAT_VERSION;

/// Service for snapshot export and transactional restore
pub struct BackupService {
    pool: PgPool,
}

impl BackupService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Export everything as one snapshot document
    pub async fn export(&self) -> Result<BackupDocument> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_admin, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export users: {:?}", e);
            AppError::Database(e)
        })?;

        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, color, owner_id, created_at, updated_at FROM categories ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut backup_categories = Vec::with_capacity(categories.len());
        for category in categories {
            let collaborator_ids = sqlx::query_scalar::<_, Uuid>(
                "SELECT user_id FROM category_collaborators WHERE category_id = $1 ORDER BY user_id",
            )
            .bind(category.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

            backup_categories.push(BackupCategory {
                id: category.id,
                name: category.name,
                color: category.color,
                owner_id: category.owner_id,
                collaborator_ids,
                created_at: category.created_at,
                updated_at: category.updated_at,
            });
        }

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, completed, importance, due_date, category_id,
                    creator_id, assignee_id, reminder_at, is_recurring, recurrence_interval,
                    recurrence_week_days, recurrence_day_of_month, recurrence_end_date,
                    created_at, updated_at
             FROM tasks ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut backup_tasks = Vec::with_capacity(tasks.len());
        for task in tasks {
            let subtasks = sqlx::query_as::<_, SubTask>(
                "SELECT id, task_id, title, description, completed, created_at
                 FROM subtasks WHERE task_id = $1 ORDER BY created_at",
            )
            .bind(task.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

            backup_tasks.push(BackupTask {
                id: task.id,
                title: task.title,
                description: task.description,
                completed: task.completed,
                importance: task.importance,
                due_date: task.due_date,
                category_id: task.category_id,
                creator_id: task.creator_id,
                assignee_id: task.assignee_id,
                reminder_at: task.reminder_at,
                is_recurring: task.is_recurring,
                recurrence_interval: task.recurrence_interval,
                recurrence_week_days: task.recurrence_week_days,
                recurrence_day_of_month: task.recurrence_day_of_month,
                recurrence_end_date: task.recurrence_end_date,
                subtasks: subtasks
                    .into_iter()
                    .map(|s| BackupSubTask {
                        id: s.id,
                        title: s.title,
                        description: s.description,
                        completed: s.completed,
                        created_at: s.created_at,
                    })
                    .collect(),
                created_at: task.created_at,
                updated_at: task.updated_at,
            });
        }

        Ok(BackupDocument {
            version: BACKUP_FORMAT_VERSION,
            timestamp: Utc::now(),
            users: users
                .into_iter()
                .map(|u| BackupUser {
                    id: u.id,
                    username: u.username,
                    password_hash: u.password_hash,
                    is_admin: u.is_admin,
                    created_at: u.created_at,
                })
                .collect(),
            categories: backup_categories,
            tasks: backup_tasks,
        })
    }

    /// Restore a snapshot: one transaction, upserting by id in dependency
    /// order. A dangling reference rolls the whole restore back.
    pub async fn import(&self, doc: BackupDocument) -> Result<ImportSummaryDto> {
        if doc.version != BACKUP_FORMAT_VERSION {
            return Err(AppError::Validation(format!(
                "Unsupported backup version {}",
                doc.version
            )));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for user in &doc.users {
            sqlx::query(
                r#"
                INSERT INTO users (id, username, password_hash, is_admin, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE
                SET username = EXCLUDED.username,
                    password_hash = EXCLUDED.password_hash,
                    is_admin = EXCLUDED.is_admin
                "#,
            )
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .bind(user.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| import_error("user", e))?;
        }

        for category in &doc.categories {
            sqlx::query(
                r#"
                INSERT INTO categories (id, name, color, owner_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name,
                    color = EXCLUDED.color,
                    owner_id = EXCLUDED.owner_id,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.color)
            .bind(category.owner_id)
            .bind(category.created_at)
            .bind(category.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| import_error("category", e))?;

            sqlx::query("DELETE FROM category_collaborators WHERE category_id = $1")
                .bind(category.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            for user_id in &category.collaborator_ids {
                if *user_id == category.owner_id {
                    continue;
                }
                sqlx::query(
                    "INSERT INTO category_collaborators (category_id, user_id) VALUES ($1, $2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(category.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| import_error("collaborator", e))?;
            }
        }

        let mut subtask_count = 0;
        for task in &doc.tasks {
            sqlx::query(
                r#"
                INSERT INTO tasks (id, title, description, completed, importance, due_date,
                    category_id, creator_id, assignee_id, reminder_at, is_recurring,
                    recurrence_interval, recurrence_week_days, recurrence_day_of_month,
                    recurrence_end_date, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                ON CONFLICT (id) DO UPDATE
                SET title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    completed = EXCLUDED.completed,
                    importance = EXCLUDED.importance,
                    due_date = EXCLUDED.due_date,
                    category_id = EXCLUDED.category_id,
                    creator_id = EXCLUDED.creator_id,
                    assignee_id = EXCLUDED.assignee_id,
                    reminder_at = EXCLUDED.reminder_at,
                    is_recurring = EXCLUDED.is_recurring,
                    recurrence_interval = EXCLUDED.recurrence_interval,
                    recurrence_week_days = EXCLUDED.recurrence_week_days,
                    recurrence_day_of_month = EXCLUDED.recurrence_day_of_month,
                    recurrence_end_date = EXCLUDED.recurrence_end_date,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(task.id)
            .bind(&task.title)
            .bind(task.description.as_deref())
            .bind(task.completed)
            .bind(task.importance)
            .bind(task.due_date)
            .bind(task.category_id)
            .bind(task.creator_id)
            .bind(task.assignee_id)
            .bind(task.reminder_at)
            .bind(task.is_recurring)
            .bind(task.recurrence_interval.as_deref())
            .bind(task.recurrence_week_days.as_deref())
            .bind(task.recurrence_day_of_month)
            .bind(task.recurrence_end_date)
            .bind(task.created_at)
            .bind(task.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| import_error("task", e))?;

            // The embedded list is authoritative for this task's subtasks
            sqlx::query("DELETE FROM subtasks WHERE task_id = $1")
                .bind(task.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            for subtask in &task.subtasks {
                sqlx::query(
                    r#"
                    INSERT INTO subtasks (id, task_id, title, description, completed, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(subtask.id)
                .bind(task.id)
                .bind(&subtask.title)
                .bind(subtask.description.as_deref())
                .bind(subtask.completed)
                .bind(subtask.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| import_error("subtask", e))?;
                subtask_count += 1;
            }
        }

        tx.commit().await.map_err(AppError::Database)?;

        Ok(ImportSummaryDto {
            users: doc.users.len(),
            categories: doc.categories.len(),
            tasks: doc.tasks.len(),
            subtasks: subtask_count,
        })
    }
}

fn import_error(entity: &str, e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::Validation(format!("Backup contains a dangling {} reference", entity))
    } else {
        tracing::error!("Failed to import {}: {:?}", entity, e);
        AppError::Database(e)
    }
}
