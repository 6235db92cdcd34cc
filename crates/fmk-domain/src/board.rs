//! In-memory board state.
//!
//! Columns and tasks each live in one ordered `Vec`. A column's content is the
//! subsequence of tasks whose `column_id` equals the column's id, so moving a
//! task between columns is a relabel plus, optionally, a shift in the shared
//! task sequence. Every operation here is synchronous and free of I/O; calls
//! naming unknown ids are logged and leave the board untouched.

use fmk_core::RecordHandle;
use serde::Serialize;

use crate::board_config::BoardConfig;
use crate::column::{Column, ColumnId, UNASSIGNED_COLUMN_ID};
use crate::task::{Task, TaskId};

/// Relabel produced by moving a task into another column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMove {
    pub task: TaskId,
    pub from: ColumnId,
    pub to: ColumnId,
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    columns: Vec<Column>,
    tasks: Vec<Task>,
    next_task_id: usize,
}

impl BoardState {
    /// Board with the given columns; duplicate ids after the first are dropped.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut board = Self::default();
        for column in columns {
            board.add_column(column);
        }
        board
    }

    /// One column per configured attribute value, titled after the value.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.columns.iter().cloned().map(Column::from_value).collect())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    fn task_index(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Tasks of one column, in board order.
    pub fn tasks_in_column(&self, column_id: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.column_id == column_id).collect()
    }

    /// Tasks whose column id matches none of the current columns, in board order.
    pub fn unassigned_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !self.has_column(&t.column_id))
            .collect()
    }

    // Column CRUD

    pub fn add_column(&mut self, column: Column) -> bool {
        if column.id == UNASSIGNED_COLUMN_ID {
            tracing::warn!("Column id '{}' is reserved, not adding it", column.id);
            return false;
        }
        if self.has_column(&column.id) {
            tracing::warn!("Column '{}' already exists, not adding it", column.id);
            return false;
        }
        self.columns.push(column);
        true
    }

    pub fn rename_column(&mut self, id: &str, title: String) -> bool {
        match self.columns.iter_mut().find(|c| c.id == id) {
            Some(column) => {
                column.update_title(title);
                true
            }
            None => {
                tracing::warn!("Cannot rename unknown column '{}'", id);
                false
            }
        }
    }

    /// Remove a column. Its tasks keep their column id and become unassigned.
    pub fn remove_column(&mut self, id: &str) -> Option<Column> {
        match self.column_index(id) {
            Some(index) => Some(self.columns.remove(index)),
            None => {
                tracing::warn!("Cannot remove unknown column '{}'", id);
                None
            }
        }
    }

    // Task CRUD

    /// Append a task for `record`; its content starts as the record's basename.
    pub fn add_task(&mut self, column_id: impl Into<ColumnId>, record: RecordHandle) -> TaskId {
        let id = TaskId::new(self.next_task_id);
        self.next_task_id += 1;
        self.tasks.push(Task::new(id, column_id.into(), record));
        id
    }

    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        match self.task_index(id) {
            Some(index) => Some(self.tasks.remove(index)),
            None => {
                tracing::warn!("Cannot remove unknown task {}", id);
                None
            }
        }
    }

    pub fn update_task_content(&mut self, id: TaskId, content: String) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.update_content(content);
                true
            }
            None => {
                tracing::warn!("Cannot update unknown task {}", id);
                false
            }
        }
    }

    // Reordering

    /// Move column `active` to the position currently held by `over`.
    pub fn reorder_columns(&mut self, active: &str, over: &str) -> bool {
        if active == over {
            tracing::warn!("Column '{}' dropped onto itself, nothing to reorder", active);
            return false;
        }
        let (Some(from), Some(to)) = (self.column_index(active), self.column_index(over)) else {
            tracing::warn!(
                "Cannot reorder columns '{}' and '{}': unknown column",
                active,
                over
            );
            return false;
        };
        array_move(&mut self.columns, from, to);
        true
    }

    /// Move task `active` to the position currently held by `over`.
    ///
    /// Both tasks must be in the same column.
    pub fn reorder_tasks_within_column(&mut self, active: TaskId, over: TaskId) -> bool {
        if active == over {
            tracing::warn!("Task {} dropped onto itself, nothing to reorder", active);
            return false;
        }
        let (Some(from), Some(to)) = (self.task_index(active), self.task_index(over)) else {
            tracing::warn!("Cannot reorder tasks {} and {}: unknown task", active, over);
            return false;
        };
        if self.tasks[from].column_id != self.tasks[to].column_id {
            tracing::warn!(
                "Cannot reorder tasks {} and {} within a column: they are in '{}' and '{}'",
                active,
                over,
                self.tasks[from].column_id,
                self.tasks[to].column_id
            );
            return false;
        }
        array_move(&mut self.tasks, from, to);
        true
    }

    /// Relabel task `active` into `target`, keeping its place in the task sequence.
    ///
    /// `target` must be a current column or the unassigned column. Returns the
    /// relabel so the caller can write the new value back to the record; a
    /// task already in `target` yields `None`.
    pub fn move_task_across_columns(&mut self, active: TaskId, target: &str) -> Option<ColumnMove> {
        if !self.has_column(target) && target != UNASSIGNED_COLUMN_ID {
            tracing::warn!("Cannot move task {} to unknown column '{}'", active, target);
            return None;
        }
        let already_unassigned = self
            .task(active)
            .is_some_and(|t| !self.has_column(&t.column_id));
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == active) else {
            tracing::warn!("Cannot move unknown task {} to '{}'", active, target);
            return None;
        };
        // Already shown in the target column
        if task.column_id == target || (target == UNASSIGNED_COLUMN_ID && already_unassigned) {
            return None;
        }

        let from = task.move_to_column(target.to_string());
        Some(ColumnMove {
            task: active,
            from,
            to: target.to_string(),
        })
    }

    /// Give task `active` the column id of task `over`, whatever that value is.
    ///
    /// Unlike [`Self::move_task_across_columns`] the value need not name a
    /// current column, so dropping onto an unassigned task adopts its raw
    /// value. Tasks already sharing a column id yield `None`.
    pub fn relabel_task_like(&mut self, active: TaskId, over: TaskId) -> Option<ColumnMove> {
        let Some(target) = self.task(over).map(|t| t.column_id.clone()) else {
            tracing::warn!("Cannot relabel task {} like unknown task {}", active, over);
            return None;
        };
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == active) else {
            tracing::warn!("Cannot relabel unknown task {} to '{}'", active, target);
            return None;
        };
        if task.column_id == target {
            return None;
        }
        let from = task.move_to_column(target.clone());
        Some(ColumnMove {
            task: active,
            from,
            to: target,
        })
    }

    /// Shift task `active` so it sits immediately before task `over`.
    pub fn place_task_before(&mut self, active: TaskId, over: TaskId) -> bool {
        if active == over {
            return false;
        }
        let (Some(from), Some(over_index)) = (self.task_index(active), self.task_index(over))
        else {
            tracing::warn!("Cannot place task {} before {}: unknown task", active, over);
            return false;
        };
        // Removing `active` shifts everything after it one slot left
        let to = if from < over_index {
            over_index - 1
        } else {
            over_index
        };
        array_move(&mut self.tasks, from, to);
        true
    }
}

/// Remove the element at `from` and reinsert it at `to`.
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tracing_test::traced_test;

    fn record(name: &str) -> RecordHandle {
        RecordHandle::new(format!("tasks/{name}.md"), name, Utc::now())
    }

    fn board() -> (BoardState, Vec<TaskId>) {
        let mut board = BoardState::new(vec![
            Column::from_value("todo"),
            Column::from_value("doing"),
            Column::from_value("done"),
        ]);
        let ids = vec![
            board.add_task("todo", record("a")),
            board.add_task("todo", record("b")),
            board.add_task("doing", record("c")),
            board.add_task("todo", record("d")),
            board.add_task("archived", record("e")),
        ];
        (board, ids)
    }

    fn contents(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.content.clone()).collect()
    }

    #[test]
    fn test_from_config_uses_values_as_ids_and_titles() {
        let config = crate::board_config::validate(
            r#"{"frontmatterAttribute": "s", "columns": ["todo", "done"], "cardOrigin": "t"}"#,
        )
        .unwrap();
        let board = BoardState::from_config(&config);
        assert_eq!(board.column_ids(), vec!["todo", "done"]);
        assert_eq!(board.columns()[1].title, "done");
    }

    #[test]
    fn test_task_ids_are_unique() {
        let (mut board, ids) = board();
        let removed = board.remove_task(ids[1]).unwrap();
        let added = board.add_task("todo", record("f"));
        assert_ne!(added, removed.id);
        let mut all = board.task_ids();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), board.tasks().len());
    }

    #[test]
    fn test_tasks_in_column_and_unassigned() {
        let (board, _) = board();
        assert_eq!(contents(&board.tasks_in_column("todo")), vec!["a", "b", "d"]);
        assert_eq!(contents(&board.tasks_in_column("done")), Vec::<String>::new());
        assert_eq!(contents(&board.unassigned_tasks()), vec!["e"]);
        assert!(board.tasks_in_column("archived").len() == 1);
        for column in board.columns() {
            assert!(board
                .tasks_in_column(&column.id)
                .iter()
                .all(|t| t.content != "e"));
        }
    }

    #[test]
    fn test_reorder_columns() {
        let (mut board, _) = board();
        assert!(board.reorder_columns("done", "todo"));
        assert_eq!(board.column_ids(), vec!["done", "todo", "doing"]);
        assert!(board.reorder_columns("done", "doing"));
        assert_eq!(board.column_ids(), vec!["todo", "doing", "done"]);
    }

    #[test]
    #[traced_test]
    fn test_reorder_columns_same_id_is_noop() {
        let (mut board, _) = board();
        assert!(!board.reorder_columns("todo", "todo"));
        assert_eq!(board.column_ids(), vec!["todo", "doing", "done"]);
        assert!(logs_contain("dropped onto itself"));
    }

    #[test]
    #[traced_test]
    fn test_reorder_columns_unknown_id_is_noop() {
        let (mut board, _) = board();
        assert!(!board.reorder_columns("todo", "missing"));
        assert_eq!(board.column_ids(), vec!["todo", "doing", "done"]);
        assert!(logs_contain("unknown column"));
    }

    #[test]
    fn test_reorder_tasks_within_column() {
        let (mut board, ids) = board();
        assert!(board.reorder_tasks_within_column(ids[3], ids[0]));
        assert_eq!(contents(&board.tasks_in_column("todo")), vec!["d", "a", "b"]);
        assert_eq!(board.tasks().len(), 5);
    }

    #[test]
    #[traced_test]
    fn test_reorder_tasks_across_columns_is_rejected() {
        let (mut board, ids) = board();
        let before = board.task_ids();
        assert!(!board.reorder_tasks_within_column(ids[0], ids[2]));
        assert_eq!(board.task_ids(), before);
        assert!(logs_contain("within a column"));
    }

    #[test]
    #[traced_test]
    fn test_reorder_tasks_unknown_id_is_noop() {
        let (mut board, ids) = board();
        let before = board.task_ids();
        assert!(!board.reorder_tasks_within_column(ids[0], TaskId::new(99)));
        assert_eq!(board.task_ids(), before);
        assert!(logs_contain("unknown task"));
    }

    #[test]
    fn test_move_task_across_columns_relabels_only_that_task() {
        let (mut board, ids) = board();
        let before = board.tasks().to_vec();

        let moved = board.move_task_across_columns(ids[0], "done").unwrap();
        assert_eq!(
            moved,
            ColumnMove {
                task: ids[0],
                from: "todo".to_string(),
                to: "done".to_string(),
            }
        );

        for (old, new) in before.iter().zip(board.tasks()) {
            if old.id == ids[0] {
                assert_eq!(new.column_id, "done");
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(board.task_ids(), before.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_move_task_into_current_column_is_noop() {
        let (mut board, ids) = board();
        assert_eq!(board.move_task_across_columns(ids[0], "todo"), None);
    }

    #[test]
    fn test_move_task_to_unassigned_column() {
        let (mut board, ids) = board();
        let moved = board
            .move_task_across_columns(ids[2], UNASSIGNED_COLUMN_ID)
            .unwrap();
        assert_eq!(moved.to, UNASSIGNED_COLUMN_ID);
        assert_eq!(contents(&board.unassigned_tasks()), vec!["c", "e"]);

        // "e" is already unassigned
        assert_eq!(board.move_task_across_columns(ids[4], UNASSIGNED_COLUMN_ID), None);
        assert_eq!(board.task(ids[4]).unwrap().column_id, "archived");
    }

    #[test]
    #[traced_test]
    fn test_move_task_to_unknown_column_is_noop() {
        let (mut board, ids) = board();
        assert_eq!(board.move_task_across_columns(ids[0], "nowhere"), None);
        assert_eq!(board.task(ids[0]).unwrap().column_id, "todo");
        assert!(logs_contain("unknown column 'nowhere'"));
    }

    #[test]
    fn test_relabel_task_like_adopts_raw_value() {
        let (mut board, ids) = board();
        let moved = board.relabel_task_like(ids[0], ids[4]).unwrap();
        assert_eq!(moved.from, "todo");
        assert_eq!(moved.to, "archived");
        assert_eq!(board.task(ids[0]).unwrap().column_id, "archived");
        assert_eq!(contents(&board.unassigned_tasks()), vec!["a", "e"]);

        assert_eq!(board.relabel_task_like(ids[1], ids[3]), None);
        assert_eq!(board.relabel_task_like(ids[1], TaskId::new(99)), None);
        assert_eq!(board.task(ids[1]).unwrap().column_id, "todo");
    }

    #[test]
    fn test_place_task_before() {
        let (mut board, ids) = board();
        // backward move: d before b
        assert!(board.place_task_before(ids[3], ids[1]));
        assert_eq!(
            contents(&board.tasks().iter().collect::<Vec<_>>()),
            vec!["a", "d", "b", "c", "e"]
        );
        // forward move: a before e
        assert!(board.place_task_before(ids[0], ids[4]));
        assert_eq!(
            contents(&board.tasks().iter().collect::<Vec<_>>()),
            vec!["d", "b", "c", "a", "e"]
        );
    }

    #[test]
    fn test_column_crud() {
        let (mut board, _) = board();
        assert!(!board.add_column(Column::from_value("todo")));
        assert!(!board.add_column(Column::from_value(UNASSIGNED_COLUMN_ID)));
        assert!(board.add_column(Column::new("archived", "Archive")));
        assert!(board.unassigned_tasks().is_empty());

        assert!(board.rename_column("archived", "Old stuff".to_string()));
        assert_eq!(board.column("archived").unwrap().title, "Old stuff");
        assert!(!board.rename_column("missing", "x".to_string()));

        let removed = board.remove_column("todo").unwrap();
        assert_eq!(removed.id, "todo");
        assert_eq!(contents(&board.unassigned_tasks()), vec!["a", "b", "d"]);
        assert_eq!(board.task(TaskId::new(0)).unwrap().column_id, "todo");
    }

    #[test]
    fn test_task_crud() {
        let (mut board, ids) = board();
        assert!(board.update_task_content(ids[0], "Renamed".to_string()));
        assert_eq!(board.task(ids[0]).unwrap().content, "Renamed");

        let removed = board.remove_task(ids[0]).unwrap();
        assert_eq!(removed.content, "Renamed");
        assert!(board.task(ids[0]).is_none());
        assert!(board.remove_task(ids[0]).is_none());
        assert!(!board.update_task_content(ids[0], "x".to_string()));
    }
}
