//! Tasks, subtasks and the recurring-task schedule.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/tasks/pending` | Yes | Visible pending tasks due by today |
//! | POST | `/api/tasks` | Yes | Create a task |
//! | PUT | `/api/tasks/{id}` | Yes | Update a visible task |
//! | DELETE | `/api/tasks/{id}` | Yes | Delete (creator or category owner) |
//! | PATCH | `/api/tasks/{id}/toggle` | Yes | Complete/reopen; recurrence-aware |
//! | GET | `/api/categories/{id}/tasks` | Yes | Category contents |
//! | POST | `/api/tasks/{id}/subtasks` | Yes | Add a subtask |
//! | PUT | `/api/subtasks/{id}` | Yes | Rename a subtask |
//! | PATCH | `/api/subtasks/{id}/toggle` | Yes | Complete/reopen a subtask |
//! | DELETE | `/api/subtasks/{id}` | Yes | Delete a subtask |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod recurrence;
pub mod routes;
pub mod services;

pub use services::{SubTaskService, TaskService};
