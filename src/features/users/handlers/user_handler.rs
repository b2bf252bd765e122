use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::UserRefDto;
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    #[serde(default)]
    pub q: String,
}

/// List all other users for the share picker
#[utoipa::path(
    get,
    path = "/api/users/sharing",
    responses(
        (status = 200, description = "Users available for sharing", body = ApiResponse<Vec<UserRefDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_for_sharing(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserRefDto>>>> {
    let users = service.list_for_sharing(user.id).await?;
    Ok(Json(ApiResponse::success(Some(users), None, None)))
}

/// Search users by username substring
///
/// Returns at most five matches; queries shorter than two characters
/// return an empty list.
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(
        ("q" = String, Query, description = "Username substring (min 2 chars)")
    ),
    responses(
        (status = 200, description = "Matching users", body = ApiResponse<Vec<UserRefDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search_users(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Query(query): Query<SearchUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserRefDto>>>> {
    let users = service.search(user.id, &query.q).await?;
    Ok(Json(ApiResponse::success(Some(users), None, None)))
}
