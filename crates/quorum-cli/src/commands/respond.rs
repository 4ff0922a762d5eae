//! Busy-interval submission.
//!
//! Takes a participant's busy intervals as a JSON array of
//! `{"start": ..., "end": ...}` objects, normalizes them to UTC in the
//! participant's timezone, stores them, marks the participant as having
//! responded, and recomputes the meeting's suggestions.

use clap::Args;
use quorum_core::storage::MeetingDb;
use quorum_core::{parse_busy_intervals_json, Scheduler};

use super::common::parse_id;

#[derive(Args)]
pub struct RespondArgs {
    /// Participant ID
    participant: String,
    /// Busy intervals as a JSON array; naive datetimes are read in the
    /// participant's timezone
    #[arg(long, conflicts_with = "busy_file")]
    busy: Option<String>,
    /// Read the JSON array from a file instead
    #[arg(long)]
    busy_file: Option<std::path::PathBuf>,
    /// Store the response without recomputing suggestions
    #[arg(long)]
    no_recompute: bool,
}

pub fn run(args: RespondArgs) -> Result<(), Box<dyn std::error::Error>> {
    let participant_id = parse_id(&args.participant)?;
    let raw = match (args.busy, args.busy_file) {
        (Some(inline), None) => inline,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        _ => return Err("provide exactly one of --busy or --busy-file".into()),
    };

    let db = MeetingDb::open()?;
    let participant = db.get_participant(participant_id)?;
    let intervals = parse_busy_intervals_json(&raw, &participant.timezone)?;
    db.set_busy_intervals(participant_id, &intervals)?;
    println!(
        "Stored {} busy interval(s) for participant {participant_id}",
        intervals.len()
    );

    if !args.no_recompute {
        let meeting_id = db.participant_meeting(participant_id)?;
        let scheduler = Scheduler::new(db);
        let slots = scheduler.recompute(meeting_id, true)?;
        println!("Recomputed {} suggested slot(s)", slots.len());
    }
    Ok(())
}
