//! sfwr init - Set up a store root for checkpointing

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout, OutputFormat};
use crate::error::Result;
use crate::storage::{Database, StoreRepository};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// URL of the remote mirror to publish checkpoints to
    #[arg(long)]
    pub remote: Option<String>,
}

#[derive(Serialize)]
struct InitReport {
    root: String,
    database: String,
    branch: String,
    remote_added: bool,
    schema_version: u32,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let layout = ctx.layout();
    let store = StoreRepository::open_or_init(&layout.root, &ctx.config.publish.branch)?;

    let remote_added = match args.remote.as_deref() {
        Some(url) => store.ensure_remote(&ctx.config.publish.remote, url)?,
        None => false,
    };

    let db = Database::open(layout.database_path())?;
    let schema_version = db.schema_version();
    db.close()?;

    let report = InitReport {
        root: layout.root.display().to_string(),
        database: layout.database.display().to_string(),
        branch: ctx.config.publish.branch.clone(),
        remote_added,
        schema_version,
    };

    if ctx.output_format == OutputFormat::Json {
        return output::emit_json(&output::robot_ok(report));
    }

    let mut layout_out = HumanLayout::new();
    layout_out
        .title("Store initialized")
        .kv("Root", &report.root)
        .kv("Database", &report.database)
        .kv("Branch", &report.branch);
    if report.remote_added {
        layout_out.kv("Remote", &ctx.config.publish.remote);
    }
    output::emit_human(&layout_out);
    Ok(())
}
