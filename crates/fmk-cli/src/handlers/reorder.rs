use crate::cli::ReorderArgs;
use crate::context::CliContext;
use crate::output;
use fmk_domain::{BoardItem, DragOutcome, SyncQueue};

pub async fn handle(ctx: &CliContext, args: ReorderArgs) -> anyhow::Result<()> {
    let raw = ctx.read_config(&args.config.config)?;
    let mut session = match ctx.open_session(&raw, SyncQueue::disabled()).await {
        Ok(session) => session,
        Err(view) => output::output_error_with(&view.error.clone(), view),
    };

    for id in [&args.column, &args.over] {
        if !session.board().has_column(id) {
            output::output_error(&format!("Column not found: {}", id));
        }
    }

    session.drag_start(&BoardItem::Column(args.column.clone()));
    let outcome = session.drag_end(Some(&BoardItem::Column(args.over.clone())));

    output::output_success(serde_json::json!({
        "reordered": outcome == DragOutcome::ReorderedColumns,
        "columns": session.board().column_ids(),
    }))
}
