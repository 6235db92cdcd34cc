use crate::context::CliContext;
use crate::output;
use fmk_domain::SyncQueue;

pub async fn handle(ctx: &CliContext, source: &str) -> anyhow::Result<()> {
    let raw = ctx.read_config(source)?;
    let session = match ctx.open_session(&raw, SyncQueue::disabled()).await {
        Ok(session) => session,
        Err(view) => output::output_error_with(&view.error.clone(), view),
    };
    output::output_success(session.view().await)
}
