mod subtask_handler;
mod task_handler;

pub use subtask_handler::{
    create_subtask, delete_subtask, toggle_subtask, update_subtask, __path_create_subtask,
    __path_delete_subtask, __path_toggle_subtask, __path_update_subtask,
};
pub use task_handler::{
    create_task, delete_task, list_category_tasks, list_pending_tasks, toggle_task, update_task,
    __path_create_task, __path_delete_task, __path_list_category_tasks, __path_list_pending_tasks,
    __path_toggle_task, __path_update_task,
};
