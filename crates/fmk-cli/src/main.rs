mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("FMK_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "fmk", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = match CliContext::new(cli.vault, cli.markdown_identifier) {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&e.to_string()),
    };

    let result = match cli.command {
        Commands::Validate(args) => handlers::validate::handle(&ctx, &args.config),
        Commands::Board(args) => handlers::board::handle(&ctx, &args.config).await,
        Commands::Move(args) => handlers::move_task::handle(&ctx, args).await,
        Commands::Reorder(args) => handlers::reorder::handle(&ctx, args).await,
        Commands::Completions { .. } => Ok(()),
    };
    if let Err(e) = result {
        output::output_error(&format!("{:#}", e));
    }

    Ok(())
}
