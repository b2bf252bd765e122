//! Authorization guards.
//!
//! Guards extract the authenticated user from request extensions and verify
//! the required access level before the handler body runs.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for admin-only endpoints (user management, backup).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    use super::*;
    use crate::shared::test_helpers::{with_admin_auth, with_regular_auth};

    async fn admin_only(RequireAdmin(user): RequireAdmin) -> String {
        user.username
    }

    fn router() -> Router {
        Router::new().route("/guarded", get(admin_only))
    }

    #[tokio::test]
    async fn test_admin_passes_guard() {
        let server = TestServer::new(with_admin_auth(router())).unwrap();
        let response = server.get("/guarded").await;
        response.assert_status(StatusCode::OK);
        response.assert_text("admin");
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let server = TestServer::new(with_regular_auth(router())).unwrap();
        let response = server.get("/guarded").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let server = TestServer::new(router()).unwrap();
        let response = server.get("/guarded").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
