use crate::context::CliContext;
use crate::output;
use fmk_domain::{validate, ParseErrorView};

pub fn handle(ctx: &CliContext, source: &str) -> anyhow::Result<()> {
    let raw = ctx.read_config(source)?;
    match validate(&raw) {
        Ok(config) => output::output_success(&config),
        Err(e) => output::output_error_with(&e.to_string(), ParseErrorView::from(&e)),
    }
}
