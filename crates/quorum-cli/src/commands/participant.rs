//! Participant commands for CLI.

use clap::Subcommand;
use quorum_core::storage::MeetingDb;
use quorum_core::ParticipantSource;

use super::common::parse_id;

#[derive(Subcommand)]
pub enum ParticipantAction {
    /// Invite a participant to a meeting
    Add {
        /// Meeting ID
        meeting: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// IANA timezone naive busy intervals are interpreted in
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// List a meeting's participants
    List {
        /// Meeting ID
        meeting: String,
    },
    /// Show one participant with their busy intervals
    Show {
        /// Participant ID
        id: String,
    },
}

pub fn run(action: ParticipantAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = MeetingDb::open()?;

    match action {
        ParticipantAction::Add {
            meeting,
            name,
            timezone,
        } => {
            let meeting_id = parse_id(&meeting)?;
            let participant = db.add_participant(meeting_id, name.as_deref(), &timezone)?;
            println!("Participant added: {}", participant.id);
            println!("{}", serde_json::to_string_pretty(&participant)?);
        }
        ParticipantAction::List { meeting } => {
            let meeting_id = parse_id(&meeting)?;
            let participants = db.participants(meeting_id)?;
            println!("{}", serde_json::to_string_pretty(&participants)?);
        }
        ParticipantAction::Show { id } => {
            let participant = db.get_participant(parse_id(&id)?)?;
            println!("{}", serde_json::to_string_pretty(&participant)?);
        }
    }
    Ok(())
}
