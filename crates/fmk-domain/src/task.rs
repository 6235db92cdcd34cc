use fmk_core::RecordHandle;
use serde::Serialize;
use std::fmt;

use crate::column::ColumnId;

/// Session-local task id: an index handed out by the board at load.
///
/// Never persisted; a reload hands out fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    /// Mirrors the record's attribute value.
    pub column_id: ColumnId,
    pub content: String,
    pub record: RecordHandle,
}

impl Task {
    pub fn new(id: TaskId, column_id: ColumnId, record: RecordHandle) -> Self {
        Self {
            id,
            column_id,
            content: record.basename.clone(),
            record,
        }
    }

    /// Relabel the task, returning the column it left.
    pub fn move_to_column(&mut self, column_id: ColumnId) -> ColumnId {
        std::mem::replace(&mut self.column_id, column_id)
    }

    pub fn update_content(&mut self, content: String) {
        self.content = content;
    }
}
