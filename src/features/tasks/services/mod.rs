mod subtask_service;
mod task_service;

pub use subtask_service::SubTaskService;
pub use task_service::TaskService;
