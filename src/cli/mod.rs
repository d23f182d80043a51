//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod output;

pub use commands::Commands;
pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "sfwr",
    version,
    about = "Book catalog with deployment checkpoints and rollback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store root (directory holding the catalog database and its git history)
    #[arg(long, global = true, env = "SFWR_ROOT")]
    pub root: Option<PathBuf>,

    /// Explicit config file (skips global and project config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub robot: bool,
}

impl Cli {
    pub const fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}
