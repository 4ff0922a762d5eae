//! Meeting request commands for CLI.

use clap::Subcommand;
use quorum_core::storage::MeetingDb;
use quorum_core::{MeetingConfig, ParticipantSource};

use super::common::{parse_date, parse_id, parse_work_time};

#[derive(Subcommand)]
pub enum MeetingAction {
    /// Create a new meeting request
    Create {
        /// Meeting title
        title: String,
        /// First day of the search window (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day of the search window, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Meeting duration in minutes
        #[arg(long, default_value = "60")]
        duration: u32,
        /// Start of working hours (HH:MM)
        #[arg(long, default_value = "09:00")]
        work_start: String,
        /// End of working hours (HH:MM)
        #[arg(long, default_value = "17:00")]
        work_end: String,
        /// Candidate step size in minutes
        #[arg(long, default_value = "30")]
        step: u32,
        /// Also consider Saturdays and Sundays
        #[arg(long)]
        include_weekends: bool,
        /// IANA timezone the working hours are expressed in
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// List meeting requests
    List,
    /// Show one meeting with its participants
    Show {
        /// Meeting ID
        id: String,
    },
    /// Delete a meeting and everything attached to it
    Delete {
        /// Meeting ID
        id: String,
    },
}

pub fn run(action: MeetingAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = MeetingDb::open()?;

    match action {
        MeetingAction::Create {
            title,
            from,
            to,
            duration,
            work_start,
            work_end,
            step,
            include_weekends,
            timezone,
        } => {
            let config = MeetingConfig {
                date_range_start: parse_date(&from)?,
                date_range_end: parse_date(&to)?,
                duration_minutes: duration,
                work_hours_start: parse_work_time(&work_start)?,
                work_hours_end: parse_work_time(&work_end)?,
                step_size_minutes: step,
                work_days_only: !include_weekends,
                timezone,
            };
            config.validate()?;
            let record = db.create_meeting(&title, &config)?;
            println!("Meeting created: {}", record.id);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        MeetingAction::List => {
            let meetings = db.list_meetings()?;
            println!("{}", serde_json::to_string_pretty(&meetings)?);
        }
        MeetingAction::Show { id } => {
            let meeting_id = parse_id(&id)?;
            let record = db.get_meeting(meeting_id)?;
            let participants = db.participants(meeting_id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            println!(
                "Responses: {}% ({} participants)",
                quorum_core::response_rate(&participants),
                participants.len()
            );
        }
        MeetingAction::Delete { id } => {
            let meeting_id = parse_id(&id)?;
            db.delete_meeting(meeting_id)?;
            println!("Meeting deleted: {meeting_id}");
        }
    }
    Ok(())
}
