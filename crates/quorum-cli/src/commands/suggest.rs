//! Suggested-slot ranking.

use clap::Args;
use quorum_core::storage::{AppConfig, MeetingDb};
use quorum_core::{Scheduler, SuggestionEngine};

use super::common::parse_id;

#[derive(Args)]
pub struct SuggestArgs {
    /// Meeting ID
    meeting: String,
    /// Maximum number of suggestions (default from config)
    #[arg(long)]
    limit: Option<usize>,
    /// Minimum availability percentage (default from config)
    #[arg(long)]
    min_pct: Option<f64>,
    /// Clear persisted slots before recomputing
    #[arg(long)]
    force: bool,
    /// Rank what is already persisted without recomputing
    #[arg(long, conflicts_with = "force")]
    no_recompute: bool,
    /// Emit the ranked slots as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let meeting_id = parse_id(&args.meeting)?;
    let app = AppConfig::load_or_default();
    let limit = args.limit.unwrap_or(app.suggestions.default_limit);
    let min_pct = args.min_pct.unwrap_or(app.suggestions.min_availability_pct);

    let engine = SuggestionEngine::new().with_prune_stale(app.suggestions.prune_stale);
    let scheduler = Scheduler::with_engine(MeetingDb::open()?, engine);

    if !args.no_recompute {
        scheduler.recompute(meeting_id, args.force)?;
    }
    let top = scheduler.top_suggestions(meeting_id, limit, min_pct)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&top)?);
        return Ok(());
    }

    if top.is_empty() {
        println!("No slot reaches {min_pct}% availability.");
        return Ok(());
    }
    println!("{:<26}{:<26}{:>12}{:>9}{:>7}", "START (UTC)", "END (UTC)", "AVAILABLE", "PCT", "LEVEL");
    for slot in &top {
        println!(
            "{:<26}{:<26}{:>9}/{:<2}{:>8.1}%{:>7}",
            slot.start.format("%Y-%m-%d %H:%M"),
            slot.end.format("%Y-%m-%d %H:%M"),
            slot.available_count,
            slot.total_participants,
            slot.availability_percentage(),
            slot.heatmap_level(),
        );
    }
    Ok(())
}
