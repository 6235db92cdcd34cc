use crate::cli::MoveArgs;
use crate::context::CliContext;
use crate::output;
use fmk_domain::{BoardItem, DragOutcome, SyncQueue, SyncWorker, UNASSIGNED_COLUMN_ID};

/// Drag the task onto the target column and wait for the write to land.
pub async fn handle(ctx: &CliContext, args: MoveArgs) -> anyhow::Result<()> {
    let raw = ctx.read_config(&args.config.config)?;
    let (queue, rx) = SyncQueue::channel();
    let worker = SyncWorker::new(ctx.vault.clone(), rx).spawn();

    let mut session = match ctx.open_session(&raw, queue).await {
        Ok(session) => session,
        Err(view) => output::output_error_with(&view.error.clone(), view),
    };

    let Some(task) = session
        .board()
        .tasks()
        .iter()
        .find(|t| t.record.basename == args.task)
        .map(|t| t.id)
    else {
        output::output_error(&format!("Task not found on board: {}", args.task));
    };
    if !session.board().has_column(&args.to) && args.to != UNASSIGNED_COLUMN_ID {
        output::output_error(&format!("Column not found: {}", args.to));
    }

    let target = BoardItem::Column(args.to.clone());
    session.drag_start(&BoardItem::Task(task));
    let outcome = session.drag_over(Some(&target));
    session.drag_end(Some(&target));
    session.close_sync();

    let report = worker.await?;
    if report.failed > 0 {
        output::output_error(&format!(
            "Moved {} to '{}' but the write to its note failed",
            args.task, args.to
        ));
    }

    match outcome {
        DragOutcome::MovedTask(moved) => output::output_success(serde_json::json!({
            "task": args.task,
            "from": moved.from,
            "to": moved.to,
            "moved": true,
        })),
        _ => output::output_success(serde_json::json!({
            "task": args.task,
            "to": args.to,
            "moved": false,
        })),
    }
}
