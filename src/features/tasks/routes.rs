use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::tasks::handlers;
use crate::features::tasks::services::{SubTaskService, TaskService};

/// Create routes for the tasks feature, including category contents and
/// subtask management
///
/// Note: This feature requires authentication
pub fn routes(task_service: Arc<TaskService>, subtask_service: Arc<SubTaskService>) -> Router {
    let tasks = Router::new()
        .route("/api/tasks", post(handlers::create_task))
        .route("/api/tasks/pending", get(handlers::list_pending_tasks))
        .route(
            "/api/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(handlers::toggle_task))
        .route(
            "/api/categories/{id}/tasks",
            get(handlers::list_category_tasks),
        )
        .with_state(task_service);

    let subtasks = Router::new()
        .route("/api/tasks/{id}/subtasks", post(handlers::create_subtask))
        .route(
            "/api/subtasks/{id}",
            put(handlers::update_subtask).delete(handlers::delete_subtask),
        )
        .route("/api/subtasks/{id}/toggle", patch(handlers::toggle_subtask))
        .with_state(subtask_service);

    tasks.merge(subtasks)
}
