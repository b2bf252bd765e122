use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::backup::{dtos as backup_dtos, handlers as backup_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::tasks::{dtos as tasks_dtos, handlers as tasks_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::bootstrap_status,
        auth::handlers::bootstrap,
        auth::handlers::login,
        auth::handlers::get_me,
        // Users
        users_handlers::list_for_sharing,
        users_handlers::search_users,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Tasks
        tasks_handlers::list_pending_tasks,
        tasks_handlers::list_category_tasks,
        tasks_handlers::create_task,
        tasks_handlers::update_task,
        tasks_handlers::delete_task,
        tasks_handlers::toggle_task,
        // Subtasks
        tasks_handlers::create_subtask,
        tasks_handlers::update_subtask,
        tasks_handlers::toggle_subtask,
        tasks_handlers::delete_subtask,
        // Admin
        admin_handlers::list_users,
        admin_handlers::create_user,
        admin_handlers::update_user,
        admin_handlers::delete_user,
        // Backup
        backup_handlers::export_backup,
        backup_handlers::import_backup,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::BootstrapRequestDto,
            auth::dtos::BootstrapStatusDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::BootstrapStatusDto>,
            ApiResponse<auth::dtos::AuthResponseDto>,
            // Users
            users_dtos::UserResponseDto,
            users_dtos::UserRefDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<Vec<users_dtos::UserRefDto>>,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryViewDto,
            categories_dtos::SharingRoleDto,
            ApiResponse<Vec<categories_dtos::CategoryViewDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Tasks
            tasks_dtos::CreateTaskDto,
            tasks_dtos::UpdateTaskDto,
            tasks_dtos::ToggleTaskDto,
            tasks_dtos::RecurrenceDto,
            tasks_dtos::CategoryBriefDto,
            tasks_dtos::TaskResponseDto,
            tasks_dtos::CreateSubTaskDto,
            tasks_dtos::UpdateSubTaskDto,
            tasks_dtos::ToggleSubTaskDto,
            tasks_dtos::SubTaskResponseDto,
            ApiResponse<Vec<tasks_dtos::TaskResponseDto>>,
            ApiResponse<tasks_dtos::TaskResponseDto>,
            ApiResponse<tasks_dtos::SubTaskResponseDto>,
            // Admin
            admin_dtos::CreateUserDto,
            admin_dtos::UpdateUserDto,
            // Backup
            backup_dtos::BackupDocument,
            backup_dtos::BackupUser,
            backup_dtos::BackupCategory,
            backup_dtos::BackupTask,
            backup_dtos::BackupSubTask,
            backup_dtos::ImportSummaryDto,
            ApiResponse<backup_dtos::ImportSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Bootstrap, login and session endpoints"),
        (name = "users", description = "User lookups for sharing"),
        (name = "categories", description = "Categories and sharing"),
        (name = "tasks", description = "Tasks, subtasks and recurrence"),
        (name = "admin", description = "User management (admin only)"),
        (name = "backup", description = "Snapshot export and restore (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Kines API",
        version = "0.1.0",
        description = "API documentation for Kines",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
