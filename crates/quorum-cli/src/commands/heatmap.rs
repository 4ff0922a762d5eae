//! Availability heatmap output.

use clap::Args;
use quorum_core::storage::{AppConfig, MeetingDb};
use quorum_core::Scheduler;

use super::common::parse_id;

#[derive(Args)]
pub struct HeatmapArgs {
    /// Meeting ID
    meeting: String,
    /// Display timezone (default from config)
    #[arg(long)]
    timezone: Option<String>,
    /// Render an ASCII grid instead of JSON
    #[arg(long)]
    ascii: bool,
}

pub fn run(args: HeatmapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let meeting_id = parse_id(&args.meeting)?;
    let timezone = args
        .timezone
        .unwrap_or_else(|| AppConfig::load_or_default().display.timezone);

    let scheduler = Scheduler::new(MeetingDb::open()?);
    let view = scheduler.heatmap(meeting_id, &timezone)?;

    if args.ascii {
        print!("{}", view.render_ascii());
    } else {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }
    Ok(())
}
