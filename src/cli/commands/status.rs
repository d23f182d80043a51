//! sfwr status - Checkpoint state of the catalog

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout, OutputFormat};
use crate::error::Result;
use crate::versioning::{Checkpoint, StoreCounts};

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Serialize)]
struct StatusReport {
    root: String,
    config: Option<String>,
    git_available: bool,
    versioned: bool,
    unsaved_changes: Option<bool>,
    counts: Option<StoreCounts>,
    latest: Option<Checkpoint>,
}

pub fn run(ctx: &AppContext, _args: &StatusArgs) -> Result<()> {
    let versioning = ctx.versioning();
    let git_available = versioning.backend().is_available();
    if !git_available {
        tracing::warn!(binary = %ctx.config.git.binary, "git binary not found");
    }
    let versioned = git_available && versioning.is_versioned()?;

    let counts = if versioning.layout().database_path().exists() {
        let db = ctx.open_catalog()?;
        let counts = db.counts()?;
        db.close()?;
        Some(counts)
    } else {
        None
    };

    let (unsaved_changes, latest) = if versioned {
        (
            Some(versioning.has_unsaved_changes()?),
            versioning.latest_checkpoint()?,
        )
    } else {
        (None, None)
    };

    let report = StatusReport {
        root: ctx.root.display().to_string(),
        config: ctx
            .config_path
            .is_file()
            .then(|| ctx.config_path.display().to_string()),
        git_available,
        versioned,
        unsaved_changes,
        counts,
        latest,
    };

    if ctx.output_format == OutputFormat::Json {
        return output::emit_json(&output::robot_ok(report));
    }

    let mut layout = HumanLayout::new();
    layout.title("Catalog status").kv("Root", &report.root);
    if let Some(config) = &report.config {
        layout.kv("Config", config);
    }
    if !report.git_available {
        layout.kv("Git", &format!("{} not found", ctx.config.git.binary));
    } else if !report.versioned {
        layout.kv("History", "not versioned (run `sfwr init`)");
    }
    if let Some(counts) = report.counts {
        layout
            .kv("Books", &counts.books.to_string())
            .kv("Authors", &counts.authors.to_string());
    }
    if let Some(dirty) = report.unsaved_changes {
        let state = if dirty {
            "unsaved changes (deploy to checkpoint them)"
        } else {
            "clean"
        };
        layout.kv("State", state);
    }
    if let Some(latest) = &report.latest {
        layout.kv(
            "Last checkpoint",
            &format!("{} {}", latest.short_id(), latest.message),
        );
    }
    output::emit_human(&layout);
    Ok(())
}
