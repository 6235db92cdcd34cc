//! A loaded board: configuration, state, drag handling and write-back.

use std::collections::HashMap;
use std::sync::Arc;

use fmk_core::{AttributeStore, RecordSource};
use futures::future::join_all;

use crate::board::BoardState;
use crate::board_config::{self, BoardConfig};
use crate::drag::{BoardItem, DragMachine, DragOutcome};
use crate::filter::select_relevant;
use crate::labels::{self, FALLBACK_ACCENT_COLOR};
use crate::sync::SyncQueue;
use crate::view::{BoardView, ParseErrorView};

pub struct BoardSession {
    config: BoardConfig,
    board: BoardState,
    drag: DragMachine,
    store: Arc<dyn AttributeStore>,
    accent_color: String,
}

impl BoardSession {
    /// Validate `raw` and load the board it describes.
    pub async fn open(
        raw: &str,
        source: &dyn RecordSource,
        store: Arc<dyn AttributeStore>,
        sync: SyncQueue,
    ) -> Result<Self, ParseErrorView> {
        let config = board_config::validate(raw).map_err(|e| {
            tracing::warn!("{}", e);
            ParseErrorView::from(e)
        })?;
        Ok(Self::load(config, source, store, sync).await)
    }

    /// Build the board from the relevant records of `config.record_origin`.
    ///
    /// Each task's column is its record's current attribute value; a record
    /// whose value cannot be read lands in the unassigned column.
    pub async fn load(
        config: BoardConfig,
        source: &dyn RecordSource,
        store: Arc<dyn AttributeStore>,
        sync: SyncQueue,
    ) -> Self {
        let records = select_relevant(
            source,
            store.as_ref(),
            &config.record_origin,
            config.filter.as_ref(),
        )
        .await;

        let key = config.attribute_key.as_str();
        let values = join_all(records.iter().map(|record| {
            let store = store.as_ref();
            async move {
                store.read(record, key).await.unwrap_or_else(|e| {
                    tracing::warn!("Could not read '{}' of {}: {}", key, record.path, e);
                    String::new()
                })
            }
        }))
        .await;

        let mut board = BoardState::from_config(&config);
        for (record, value) in records.into_iter().zip(values) {
            board.add_task(value, record);
        }
        tracing::debug!(
            "Loaded board '{}' with {} tasks in {} columns",
            config.record_origin,
            board.tasks().len(),
            board.columns().len()
        );

        let drag = DragMachine::new(config.attribute_key.clone(), sync);
        Self {
            config,
            board,
            drag,
            store,
            accent_color: FALLBACK_ACCENT_COLOR.to_string(),
        }
    }

    pub fn with_accent_color(mut self, accent: impl Into<String>) -> Self {
        self.accent_color = accent.into();
        self
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn drag_start(&mut self, item: &BoardItem) -> bool {
        self.drag.on_drag_start(&self.board, item)
    }

    pub fn drag_over(&mut self, over: Option<&BoardItem>) -> DragOutcome {
        self.drag.on_drag_over(&mut self.board, over)
    }

    pub fn drag_end(&mut self, over: Option<&BoardItem>) -> DragOutcome {
        self.drag.on_drag_end(&mut self.board, over)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel(&mut self.board);
    }

    /// Stop queueing writes. Already queued writes still land.
    pub fn close_sync(&mut self) {
        self.drag.sync_queue_mut().close();
    }

    /// Snapshot with property labels read fresh from the store.
    pub async fn view(&self) -> BoardView {
        let store = self.store.as_ref();
        let labels = join_all(self.board.tasks().iter().map(|task| async move {
            let labels =
                labels::task_labels(&self.config, store, &task.record, &self.accent_color).await;
            (task.id, labels)
        }))
        .await;
        let labels: HashMap<_, _> = labels.into_iter().collect();
        BoardView::build(&self.board, &self.config, &labels, &self.accent_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::UNASSIGNED_COLUMN_ID;
    use crate::sync::SyncWorker;
    use chrono::{Duration, Utc};
    use fmk_persistence::{MemoryVault, VaultStore};
    use std::fs;
    use tempfile::tempdir;

    const CONFIG: &str =
        r#"{"frontmatterAttribute": "status", "columns": ["todo", "done"], "cardOrigin": "tasks"}"#;

    #[tokio::test]
    async fn test_drag_onto_column_writes_to_note() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tasks")).unwrap();
        fs::write(
            dir.path().join("tasks/write-docs.md"),
            "---\nstatus: todo\n---\nDraft the guide.\n",
        )
        .unwrap();

        let vault = Arc::new(VaultStore::new(dir.path()));
        let (queue, rx) = SyncQueue::channel();
        let worker = SyncWorker::new(vault.clone(), rx).spawn();

        let mut session = BoardSession::open(CONFIG, vault.as_ref(), vault.clone(), queue)
            .await
            .unwrap();
        let todo: Vec<_> = session.board().tasks_in_column("todo");
        assert_eq!(todo.len(), 1);
        assert_eq!(todo[0].content, "write-docs");
        assert!(session.board().tasks_in_column("done").is_empty());

        let task = todo[0].id;
        assert!(session.drag_start(&BoardItem::Task(task)));
        let outcome = session.drag_over(Some(&BoardItem::Column("done".into())));
        assert!(matches!(outcome, DragOutcome::MovedTask(_)));
        session.drag_end(Some(&BoardItem::Column("done".into())));
        assert_eq!(session.board().tasks_in_column("done").len(), 1);

        session.close_sync();
        let report = worker.await.unwrap();
        assert_eq!(report.delivered, 1);

        let note = fs::read_to_string(dir.path().join("tasks/write-docs.md")).unwrap();
        assert!(note.contains("status: done"));
        assert!(note.ends_with("Draft the guide.\n"));
    }

    #[tokio::test]
    async fn test_open_invalid_config_returns_error_view() {
        let vault = Arc::new(MemoryVault::new());
        let result =
            BoardSession::open(r#"{"columns": []}"#, vault.as_ref(), vault.clone(), SyncQueue::disabled()).await;
        let Err(view) = result else {
            panic!("expected a parse error view");
        };
        assert!(view.violations.iter().any(|v| v.field == "frontmatterAttribute"));
    }

    #[tokio::test]
    async fn test_load_applies_filter_and_attribute_values() {
        let vault = Arc::new(MemoryVault::new());
        let now = Utc::now();
        vault.add_record("tasks", "a", now, &[("status", "todo")]);
        vault.add_record("tasks", "b", now - Duration::days(30), &[("status", "todo")]);
        vault.add_record("tasks", "c", now, &[("status", "blocked")]);
        vault.add_record("tasks", "d", now, &[]);

        let config = r#"{
            "frontmatterAttribute": "status",
            "columns": ["todo", "done"],
            "cardOrigin": "tasks",
            "filter": {"lastUpdated": {"amount": -7, "unit": "days"}}
        }"#;
        let session = BoardSession::open(config, vault.as_ref(), vault.clone(), SyncQueue::disabled())
            .await
            .unwrap();

        let contents: Vec<_> = session.board().tasks().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c", "d"]);
        let unassigned: Vec<_> = session
            .board()
            .unassigned_tasks()
            .iter()
            .map(|t| t.column_id.as_str())
            .collect();
        assert_eq!(unassigned, vec!["blocked", ""]);
    }

    #[tokio::test]
    async fn test_missing_origin_gives_empty_board() {
        let vault = Arc::new(MemoryVault::new());
        let session = BoardSession::open(CONFIG, vault.as_ref(), vault.clone(), SyncQueue::disabled())
            .await
            .unwrap();
        assert!(session.board().tasks().is_empty());
        assert_eq!(session.board().column_ids(), vec!["todo", "done"]);
    }

    #[tokio::test]
    async fn test_view_includes_labels_and_unassigned_column() {
        let vault = Arc::new(MemoryVault::new());
        vault.add_record("tasks", "a", Utc::now(), &[("status", "todo"), ("priority", "high")]);
        vault.add_record("tasks", "b", Utc::now(), &[("priority", "low")]);

        let config = r##"{
            "frontmatterAttribute": "status",
            "columns": ["todo", "done"],
            "cardOrigin": "tasks",
            "additionalProperties": [{"property": "priority", "color": "#FF0000"}]
        }"##;
        let session = BoardSession::open(config, vault.as_ref(), vault.clone(), SyncQueue::disabled())
            .await
            .unwrap()
            .with_accent_color("#000000");

        let view = session.view().await;
        assert_eq!(view.columns[0].id, UNASSIGNED_COLUMN_ID);
        assert_eq!(view.columns[0].tasks[0].labels[0].text, "low");
        let todo = view.column("todo").unwrap();
        assert_eq!(todo.tasks[0].labels[0].text, "high");
        assert_eq!(todo.tasks[0].labels[0].color, "#FF0000");
        assert_eq!(view.card_color, "#000000");
        assert_eq!(view.legend[0].text, "priority");
    }

    #[tokio::test]
    async fn test_drag_to_unassigned_column_writes_its_id() {
        let vault = Arc::new(MemoryVault::new());
        vault.add_record("tasks", "a", Utc::now(), &[("status", "todo")]);
        let (queue, rx) = SyncQueue::channel();

        let mut session = BoardSession::open(CONFIG, vault.as_ref(), vault.clone(), queue)
            .await
            .unwrap();
        let task = session.board().tasks()[0].id;
        session.drag_start(&BoardItem::Task(task));
        session.drag_over(Some(&BoardItem::Column(UNASSIGNED_COLUMN_ID.into())));
        session.drag_end(None);
        session.close_sync();

        SyncWorker::new(vault.clone(), rx).run().await;
        assert_eq!(
            vault.value("tasks/a.md", "status").as_deref(),
            Some(UNASSIGNED_COLUMN_ID)
        );
    }
}
