use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_unique_violation, AppError, Result};
use crate::features::admin::dtos::{CreateUserDto, UpdateUserDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::User;
use crate::shared::constants::BCRYPT_COST;

/// Service for admin user management
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List accounts with pagination
    pub async fn list_users(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            ORDER BY username
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users, total))
    }

    /// Create an account
    pub async fn create_user(&self, dto: CreateUserDto) -> Result<User> {
        let password_hash = bcrypt::hash(&dto.password, BCRYPT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, is_admin, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dto.username.trim())
        .bind(&password_hash)
        .bind(dto.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username already taken".to_string())
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })
    }

    /// Update an account. A blank password keeps the stored hash.
    pub async fn update_user(&self, id: Uuid, dto: UpdateUserDto) -> Result<User> {
        let password_hash = match dto.new_password() {
            Some(password) => {
                if password.len() < 4 || password.len() > 72 {
                    return Err(AppError::Validation(
                        "Password must be 4-72 characters".to_string(),
                    ));
                }
                Some(
                    bcrypt::hash(password, BCRYPT_COST).map_err(|e| {
                        AppError::Internal(format!("Failed to hash password: {}", e))
                    })?,
                )
            }
            None => None,
        };

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                password_hash = COALESCE($3, password_hash),
                is_admin = $4
            WHERE id = $1
            RETURNING id, username, password_hash, is_admin, created_at
            "#,
        )
        .bind(id)
        .bind(dto.username.trim())
        .bind(password_hash.as_deref())
        .bind(dto.is_admin)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username already taken".to_string())
            } else {
                tracing::error!("Failed to update user: {:?}", e);
                AppError::Database(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Delete an account. Admins cannot delete themselves, so the system
    /// always keeps at least the caller.
    pub async fn delete_user(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if caller.id == id {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
