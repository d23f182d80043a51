//! sfwr history - List deployment checkpoints

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout, OutputFormat, truncate_string};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Maximum number of checkpoints to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &HistoryArgs) -> Result<()> {
    let versioning = ctx.versioning();
    let checkpoints = match args.limit {
        Some(limit) => versioning.list_checkpoints_limited(limit)?,
        None => versioning.list_checkpoints()?,
    };

    if ctx.output_format == OutputFormat::Json {
        return output::emit_json(&output::robot_ok(&checkpoints));
    }

    if checkpoints.is_empty() {
        println!("No checkpoints yet. Run `sfwr deploy` to create one.");
        return Ok(());
    }

    let mut layout = HumanLayout::new();
    layout.title("Checkpoints");
    let marker = versioning.marker();
    for checkpoint in &checkpoints {
        let books = checkpoint
            .derived_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        // Pre-convention commits show up when nothing carries the marker.
        let flag = if checkpoint.has_marker(marker) { ' ' } else { '*' };
        layout.push_line(format!(
            "{}{flag} {}  {:>6}  {}",
            checkpoint.short_id(),
            checkpoint.timestamp.format("%Y-%m-%d %H:%M"),
            books,
            truncate_string(&checkpoint.message, 72)
        ));
    }
    output::emit_human(&layout);
    Ok(())
}
