mod subtask_dto;
mod task_dto;

pub use subtask_dto::{CreateSubTaskDto, SubTaskResponseDto, ToggleSubTaskDto, UpdateSubTaskDto};
pub use task_dto::{
    CategoryBriefDto, CreateTaskDto, RecurrenceDto, TaskResponseDto, ToggleTaskDto, UpdateTaskDto,
};
