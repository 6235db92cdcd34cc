//! Drag gesture handling.
//!
//! `Idle -> Dragging -> Idle`. Drag-over events reorder tasks and move them
//! between columns as they happen; columns are only reordered on drop. Every
//! column change queues one write of the new column value, which the caller
//! never waits for.

use serde::Serialize;

use crate::board::{BoardState, ColumnMove};
use crate::column::{Column, ColumnId};
use crate::sync::{SyncQueue, SyncRequest};
use crate::task::{Task, TaskId};

/// Something on the board a pointer can grab or hover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum BoardItem {
    Column(ColumnId),
    Task(TaskId),
}

/// The entity being dragged, captured whole at drag start for the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DragEntity {
    Column(Column),
    Task(Task),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragEntity),
}

/// What a drag event did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    Ignored,
    ReorderedTasks,
    /// The task changed column and a write of the new value was queued.
    MovedTask(ColumnMove),
    ReorderedColumns,
}

pub struct DragMachine {
    attribute_key: String,
    sync: SyncQueue,
    state: DragState,
}

impl DragMachine {
    pub fn new(attribute_key: impl Into<String>, sync: SyncQueue) -> Self {
        Self {
            attribute_key: attribute_key.into(),
            sync,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn sync_queue_mut(&mut self) -> &mut SyncQueue {
        &mut self.sync
    }

    /// Capture the grabbed entity. Does not touch the board.
    pub fn on_drag_start(&mut self, board: &BoardState, item: &BoardItem) -> bool {
        let entity = match item {
            BoardItem::Column(id) => board.column(id).cloned().map(DragEntity::Column),
            BoardItem::Task(id) => board.task(*id).cloned().map(DragEntity::Task),
        };
        match entity {
            Some(entity) => {
                tracing::debug!("Drag started: {:?}", item);
                self.state = DragState::Dragging(entity);
                true
            }
            None => {
                tracing::warn!("Cannot start dragging unknown {:?}", item);
                self.state = DragState::Idle;
                false
            }
        }
    }

    /// Handle the pointer hovering `over` while dragging.
    pub fn on_drag_over(&mut self, board: &mut BoardState, over: Option<&BoardItem>) -> DragOutcome {
        let DragState::Dragging(DragEntity::Task(dragged)) = &self.state else {
            // Column drags only act on drop
            return DragOutcome::Ignored;
        };
        let active = dragged.id;

        match over {
            Some(BoardItem::Task(over)) => self.task_over_task(board, active, *over),
            Some(BoardItem::Column(column_id)) => self.task_over_column(board, active, column_id),
            None => DragOutcome::Ignored,
        }
    }

    /// Drop. Reorders columns when a column lands on a column, then goes idle.
    pub fn on_drag_end(&mut self, board: &mut BoardState, over: Option<&BoardItem>) -> DragOutcome {
        let state = std::mem::take(&mut self.state);
        let outcome = match (state, over) {
            (DragState::Dragging(DragEntity::Column(active)), Some(BoardItem::Column(over))) => {
                if board.reorder_columns(&active.id, over) {
                    DragOutcome::ReorderedColumns
                } else {
                    DragOutcome::Ignored
                }
            }
            _ => DragOutcome::Ignored,
        };
        tracing::debug!("Drag ended: {:?}", outcome);
        outcome
    }

    /// Pointer released outside any target.
    pub fn cancel(&mut self, board: &mut BoardState) {
        self.on_drag_end(board, None);
    }

    fn task_over_task(&mut self, board: &mut BoardState, active: TaskId, over: TaskId) -> DragOutcome {
        if active == over {
            return DragOutcome::Ignored;
        }
        let (Some(from), Some(to)) = (
            board.task(active).map(|t| t.column_id.clone()),
            board.task(over).map(|t| t.column_id.clone()),
        ) else {
            tracing::warn!("Drag over unknown task {} or {}", active, over);
            return DragOutcome::Ignored;
        };

        if from == to {
            return if board.reorder_tasks_within_column(active, over) {
                DragOutcome::ReorderedTasks
            } else {
                DragOutcome::Ignored
            };
        }

        // Adopt the hovered task's raw value, even one no column shows
        match board.relabel_task_like(active, over) {
            Some(moved) => {
                board.place_task_before(active, over);
                self.write_back(board, &moved);
                DragOutcome::MovedTask(moved)
            }
            None => DragOutcome::Ignored,
        }
    }

    fn task_over_column(&mut self, board: &mut BoardState, active: TaskId, column_id: &str) -> DragOutcome {
        match board.move_task_across_columns(active, column_id) {
            Some(moved) => {
                self.write_back(board, &moved);
                DragOutcome::MovedTask(moved)
            }
            None => DragOutcome::Ignored,
        }
    }

    fn write_back(&self, board: &BoardState, moved: &ColumnMove) {
        let Some(task) = board.task(moved.task) else {
            return;
        };
        self.sync.dispatch(SyncRequest::new(
            task.record.clone(),
            self.attribute_key.clone(),
            moved.to.clone(),
        ));
    }
}
