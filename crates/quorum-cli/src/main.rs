use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quorum-cli", version, about = "Quorum CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Meeting request management
    Meeting {
        #[command(subcommand)]
        action: commands::meeting::MeetingAction,
    },
    /// Participant management
    Participant {
        #[command(subcommand)]
        action: commands::participant::ParticipantAction,
    },
    /// Submit a participant's busy intervals
    Respond(commands::respond::RespondArgs),
    /// Recompute and rank suggested slots
    Suggest(commands::suggest::SuggestArgs),
    /// Availability heatmap for a meeting
    Heatmap(commands::heatmap::HeatmapArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Meeting { action } => commands::meeting::run(action),
        Commands::Participant { action } => commands::participant::run(action),
        Commands::Respond(args) => commands::respond::run(args),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Heatmap(args) => commands::heatmap::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
