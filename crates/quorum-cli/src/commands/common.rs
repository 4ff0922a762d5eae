//! Argument parsing helpers shared by the command modules.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

pub fn parse_id(raw: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    Uuid::parse_str(raw).map_err(|e| format!("invalid id '{raw}': {e}").into())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{raw}' (expected YYYY-MM-DD): {e}").into())
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_work_time(raw: &str) -> Result<NaiveTime, Box<dyn std::error::Error>> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| format!("invalid time '{raw}' (expected HH:MM): {e}").into())
}
