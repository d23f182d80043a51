//! sfwr deploy - Checkpoint the catalog and publish history

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout, OutputFormat};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct DeployArgs {}

pub fn run(ctx: &AppContext, _args: &DeployArgs) -> Result<()> {
    let db = ctx.open_catalog()?;
    let counts = db.counts()?;
    // Release the file before git reads it.
    db.close()?;

    let outcome = ctx.versioning().create_checkpoint(counts)?;

    if ctx.output_format == OutputFormat::Json {
        return output::emit_json(&output::robot_ok(&outcome));
    }

    let mut layout = HumanLayout::new();
    layout.push_line(outcome.status_message());
    if let (Some(id), Some(message)) = (&outcome.checkpoint, &outcome.message) {
        layout.kv("Checkpoint", crate::error::short_id(id));
        layout.kv("Message", message);
    }
    output::emit_human(&layout);
    Ok(())
}
