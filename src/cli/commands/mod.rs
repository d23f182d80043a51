//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod deploy;
pub mod history;
pub mod init;
pub mod rollback;
pub mod status;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the checkpoint repository and catalog database
    Init(init::InitArgs),

    /// Create a deployment checkpoint and publish it
    Deploy(deploy::DeployArgs),

    /// List deployment checkpoints, newest first
    History(history::HistoryArgs),

    /// Restore the catalog to an earlier checkpoint
    Rollback(rollback::RollbackArgs),

    /// Show whether the catalog has unsaved changes
    Status(status::StatusArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Deploy(args) => deploy::run(ctx, args),
        Commands::History(args) => history::run(ctx, args),
        Commands::Rollback(args) => rollback::run(ctx, args),
        Commands::Status(args) => status::run(ctx, args),
    }
}
