use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fmk")]
#[command(about = "Kanban boards over markdown front matter", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Vault directory holding the notes (or set FMK_VAULT env var)
    #[arg(
        long,
        value_name = "DIR",
        env = "FMK_VAULT",
        default_value = ".",
        global = true
    )]
    pub vault: PathBuf,

    /// Code block language that marks a board inside a markdown note
    #[arg(long, value_name = "LANG", env = "FMK_MARKDOWN_IDENTIFIER", global = true)]
    pub markdown_identifier: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a board configuration
    Validate(ConfigArgs),
    /// Load a board and print it
    Board(ConfigArgs),
    /// Drag a task onto a column and write its new value
    Move(MoveArgs),
    /// Drag a column onto another column
    Reorder(ReorderArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    /// JSON file, markdown note with a board block, or - for stdin
    #[arg(value_name = "CONFIG")]
    pub config: String,
}

#[derive(Args)]
pub struct MoveArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Note name of the task, without the .md extension
    #[arg(long)]
    pub task: String,
    /// Target column id
    #[arg(long)]
    pub to: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Column being dragged
    #[arg(long)]
    pub column: String,
    /// Column it is dropped on
    #[arg(long)]
    pub over: String,
}
