use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::UserRefDto;
use crate::features::users::models::UserRef;

/// Minimum query length before the search endpoint answers anything
const MIN_SEARCH_LENGTH: usize = 2;

/// Maximum hits returned by the search endpoint
const SEARCH_LIMIT: i64 = 5;

/// Service for non-privileged user lookups (share picker, assignee search)
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All users except the caller, for the share/assign pickers
    pub async fn list_for_sharing(&self, user_id: Uuid) -> Result<Vec<UserRefDto>> {
        let users = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT id, username
            FROM users
            WHERE id <> $1
            ORDER BY username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users for sharing: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    /// Case-insensitive username substring search, excluding the caller.
    /// Queries shorter than two characters return nothing.
    pub async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<UserRefDto>> {
        let query = query.trim();
        if query.len() < MIN_SEARCH_LENGTH {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(query));
        let users = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT id, username
            FROM users
            WHERE id <> $1 AND username ILIKE $2
            ORDER BY username
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(&pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
