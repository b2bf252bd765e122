use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, BootstrapRequestDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;
use crate::shared::constants::BCRYPT_COST;

/// Service for login, session issuance and the first-run bootstrap flow
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    /// Whether any user exists yet (drives the first-run setup screen)
    pub async fn is_initialized(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(count > 0)
    }

    /// Create the first user. Only valid while the users table is empty;
    /// the first user is always an admin.
    pub async fn bootstrap(&self, dto: BootstrapRequestDto) -> Result<AuthResponseDto> {
        if self.is_initialized().await? {
            return Err(AppError::Conflict("An admin user already exists".to_string()));
        }

        let password_hash = bcrypt::hash(&dto.password, BCRYPT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, is_admin)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, username, password_hash, is_admin, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&dto.username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create first user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("First admin user created: {}", user.username);

        let token = self.tokens.issue(&user)?;
        Ok(AuthResponseDto {
            token,
            user: user.into(),
        })
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(&dto.username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user for login: {:?}", e);
            AppError::Database(e)
        })?;

        // Same error for unknown user and bad password
        let user = user
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let valid = bcrypt::verify(&dto.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        tracing::info!("User logged in: {}", user.username);

        let token = self.tokens.issue(&user)?;
        Ok(AuthResponseDto {
            token,
            user: user.into(),
        })
    }

    /// Load the fresh database record behind an authenticated session
    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserResponseDto> {
        let record = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load current user: {:?}", e);
            AppError::Database(e)
        })?;

        record
            .map(|u| u.into())
            .ok_or_else(|| AppError::NotFound("User no longer exists".to_string()))
    }
}
