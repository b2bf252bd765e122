use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryViewDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::CategoryRef;
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

fn parse_category_ref(raw: &str) -> Result<CategoryRef> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid category id".to_string()))
}

/// List categories visible to the current user
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Visible categories, virtual shared view first", body = ApiResponse<Vec<CategoryViewDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_categories(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryViewDto>>>> {
    let views = service.list(&user).await?;
    let dtos = views
        .into_iter()
        .map(|v| CategoryViewDto::from_view(user.id, v))
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CategoryResponseDto::from(category)),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

/// Update a category's name, color and collaborators (owner only)
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or virtual view"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reference = parse_category_ref(&id)?;
    let category = service.update(&user, reference, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(CategoryResponseDto::from(category)),
        Some("Category updated".to_string()),
        None,
    )))
}

/// Delete a category and all tasks inside it (owner only)
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<utoipa::TupleUnit>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or virtual view"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let reference = parse_category_ref(&id)?;
    service.delete(&user, reference).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}
