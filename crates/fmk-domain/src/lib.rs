pub mod board;
pub mod board_config;
pub mod column;
pub mod drag;
pub mod filter;
pub mod labels;
pub mod markdown;
pub mod session;
pub mod sync;
pub mod task;
pub mod view;

pub use board::{BoardState, ColumnMove};
pub use board_config::{
    validate, AdditionalProperty, BoardConfig, FilterSpec, LastUpdated, PropertyFilter, TimeUnit,
    SAMPLE_CONFIG,
};
pub use column::{Column, ColumnId, UNASSIGNED_COLUMN_ID};
pub use drag::{BoardItem, DragEntity, DragMachine, DragOutcome, DragState};
pub use filter::{select_relevant, select_relevant_at, RecordFilter};
pub use labels::{PropertyLabel, FALLBACK_ACCENT_COLOR};
pub use markdown::{board_blocks, first_board_block};
pub use session::BoardSession;
pub use sync::{SyncQueue, SyncReport, SyncRequest, SyncWorker};
pub use task::{Task, TaskId};
pub use view::{BoardView, ColumnView, ParseErrorView, TaskView};
