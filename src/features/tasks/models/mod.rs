mod task;

pub use task::{SubTask, Task, TaskDetails};
