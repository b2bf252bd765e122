use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, BootstrapRequestDto, BootstrapStatusDto, LoginRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::ApiResponse;

/// Check whether the instance has been set up yet
///
/// Public probe used by the first-run screen: returns `initialized: false`
/// until the first admin user has been created.
#[utoipa::path(
    get,
    path = "/api/auth/bootstrap",
    responses(
        (status = 200, description = "Bootstrap status", body = ApiResponse<BootstrapStatusDto>),
    ),
    tag = "auth"
)]
pub async fn bootstrap_status(
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<BootstrapStatusDto>>> {
    let initialized = service.is_initialized().await?;
    Ok(Json(ApiResponse::success(
        Some(BootstrapStatusDto { initialized }),
        None,
        None,
    )))
}

/// Create the first (admin) user
///
/// Only available while no user exists; afterwards it answers 409.
#[utoipa::path(
    post,
    path = "/api/auth/bootstrap",
    request_body = BootstrapRequestDto,
    responses(
        (status = 200, description = "First user created, session issued", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "An admin user already exists")
    ),
    tag = "auth"
)]
pub async fn bootstrap(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<BootstrapRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.bootstrap(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Session issued", body = ApiResponse<AuthResponseDto>),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Get the current authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let me = service.me(&user).await?;
    Ok(Json(ApiResponse::success(Some(me), None, None)))
}
