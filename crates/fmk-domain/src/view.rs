//! Serializable snapshots of a board for rendering.

use std::collections::HashMap;

use fmk_core::{ConfigError, FieldViolation};
use serde::Serialize;

use crate::board::BoardState;
use crate::board_config::{BoardConfig, SAMPLE_CONFIG};
use crate::column::{ColumnId, UNASSIGNED_COLUMN_ID};
use crate::labels::{self, PropertyLabel};
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub content: String,
    pub column_id: ColumnId,
    pub path: String,
    pub labels: Vec<PropertyLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub id: ColumnId,
    pub title: String,
    pub unassigned: bool,
    pub task_count: usize,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_height: Option<String>,
    pub card_color: String,
    pub legend: Vec<PropertyLabel>,
}

impl BoardView {
    /// Snapshot `board`. The unassigned column comes first and is only shown
    /// when `defaultColumnName` is set or some task needs it.
    pub fn build(
        board: &BoardState,
        config: &BoardConfig,
        task_labels: &HashMap<TaskId, Vec<PropertyLabel>>,
        accent: &str,
    ) -> Self {
        let task_view = |task: &Task| TaskView {
            id: task.id,
            content: task.content.clone(),
            column_id: task.column_id.clone(),
            path: task.record.path.clone(),
            labels: task_labels.get(&task.id).cloned().unwrap_or_default(),
        };
        let column_view = |id: &str, title: &str, unassigned: bool, tasks: Vec<&Task>| ColumnView {
            id: id.to_string(),
            title: title.to_string(),
            unassigned,
            task_count: tasks.len(),
            tasks: tasks.into_iter().map(&task_view).collect(),
        };

        let mut columns = Vec::with_capacity(board.columns().len() + 1);
        let unassigned = board.unassigned_tasks();
        if config.default_column_name.is_some() || !unassigned.is_empty() {
            let title = config
                .default_column_name
                .as_deref()
                .unwrap_or(UNASSIGNED_COLUMN_ID);
            columns.push(column_view(UNASSIGNED_COLUMN_ID, title, true, unassigned));
        }
        for column in board.columns() {
            columns.push(column_view(
                &column.id,
                &column.title,
                false,
                board.tasks_in_column(&column.id),
            ));
        }

        Self {
            columns,
            column_width: config.column_width.clone(),
            column_height: config.column_height.clone(),
            card_color: labels::card_color(config, accent),
            legend: labels::legend(config, accent),
        }
    }

    pub fn column(&self, id: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.id == id)
    }
}

/// Shown in place of the board when the configuration does not validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseErrorView {
    pub error: String,
    pub violations: Vec<FieldViolation>,
    pub sample: &'static str,
}

impl From<&ConfigError> for ParseErrorView {
    fn from(err: &ConfigError) -> Self {
        Self {
            error: err.to_string(),
            violations: err.violations().to_vec(),
            sample: SAMPLE_CONFIG,
        }
    }
}

impl From<ConfigError> for ParseErrorView {
    fn from(err: ConfigError) -> Self {
        Self::from(&err)
    }
}
