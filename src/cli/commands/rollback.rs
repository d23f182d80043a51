//! sfwr rollback - Restore the catalog to an earlier checkpoint

use clap::Args;
use serde::Serialize;

use crate::app::{AppContext, rollback_catalog};
use crate::cli::output::{self, HumanLayout, OutputFormat};
use crate::error::{Result, SfwrError, short_id};
use crate::versioning::{RollbackOutcome, StoreCounts};

#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Checkpoint identifier (as shown by `sfwr history`)
    pub checkpoint: String,

    /// Confirm replacing the current catalog
    #[arg(long)]
    pub yes: bool,
}

#[derive(Serialize)]
struct RollbackReport<'a> {
    #[serde(flatten)]
    outcome: &'a RollbackOutcome,
    counts: StoreCounts,
}

pub fn run(ctx: &AppContext, args: &RollbackArgs) -> Result<()> {
    if !args.yes {
        return Err(SfwrError::ConfirmationRequired(format!(
            "rollback replaces the current catalog with checkpoint {}; re-run with --yes to confirm",
            short_id(&args.checkpoint)
        )));
    }

    let db = ctx.open_catalog()?;
    let (db, outcome) = rollback_catalog(&ctx.versioning(), db, &args.checkpoint)?;
    let counts = db.counts()?;
    db.close()?;

    if ctx.output_format == OutputFormat::Json {
        return output::emit_json(&output::robot_ok(RollbackReport {
            outcome: &outcome,
            counts,
        }));
    }

    let mut layout = HumanLayout::new();
    layout
        .push_line(format!("Rolled back to {}.", short_id(&outcome.target)))
        .kv("Books", &counts.books.to_string())
        .kv("Authors", &counts.authors.to_string());
    if !outcome.assets_restored {
        layout.push_line("Cover images were not restored (none recorded at that checkpoint).");
    }
    output::emit_human(&layout);
    Ok(())
}
