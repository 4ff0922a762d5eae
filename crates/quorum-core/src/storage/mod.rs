mod config;
pub mod database;
pub mod memory;

pub use config::{AppConfig, DisplayConfig, SuggestionsConfig};
pub use database::{MeetingDb, MeetingRecord};
pub use memory::MemoryStore;

use std::path::PathBuf;

/// Directory holding the database and the configuration file, created on
/// first use: `<platform config dir>/quorum`, or `quorum-dev` when
/// `QUORUM_ENV=dev` so development data stays apart from real data.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let app = match std::env::var("QUORUM_ENV").as_deref() {
        Ok("dev") => "quorum-dev",
        _ => "quorum",
    };
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
