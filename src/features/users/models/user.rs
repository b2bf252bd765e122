use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a user account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Minimal user projection used for sharing and assignee displays
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
}
