pub mod board;
pub mod move_task;
pub mod reorder;
pub mod validate;
