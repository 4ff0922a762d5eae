//! Busy-interval normalization.
//!
//! Participant submissions arrive as datetime strings in one of three
//! shapes: naive (interpreted in the participant's zone), `Z`-suffixed
//! (UTC), or carrying an explicit numeric offset. All are normalized to
//! canonical UTC instants here; nothing ambiguous crosses this boundary.
//!
//! A malformed entry aborts the whole parse with its index. Skipping it
//! would silently understate the participant's unavailability downstream.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError, IntervalParseError};
use crate::meeting::BusyInterval;
use crate::slots::resolve_local;

/// One raw submission entry. Fields are optional so that missing keys are
/// detected and reported rather than failing deserialization wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBusyEntry {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Normalize raw busy entries into UTC intervals.
///
/// Empty input yields an empty list. Any missing key, empty string,
/// unparsable datetime, or non-positive interval fails the whole call with
/// the offending entry's index.
pub fn parse_busy_intervals(
    entries: &[RawBusyEntry],
    participant_timezone: &str,
) -> Result<Vec<BusyInterval>, CoreError> {
    let tz: Tz = participant_timezone
        .parse()
        .map_err(|_| ConfigError::UnknownTimezone {
            name: participant_timezone.to_string(),
        })?;

    let mut intervals = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let start = parse_instant(entry.start.as_deref(), tz, index, "start")?;
        let end = parse_instant(entry.end.as_deref(), tz, index, "end")?;
        if end <= start {
            return Err(IntervalParseError::EndNotAfterStart { index, start, end }.into());
        }
        intervals.push(BusyInterval { start, end });
    }
    Ok(intervals)
}

/// JSON convenience wrapper for the wire format:
/// `[{"start": "...", "end": "..."}, ...]`.
pub fn parse_busy_intervals_json(
    json: &str,
    participant_timezone: &str,
) -> Result<Vec<BusyInterval>, CoreError> {
    let entries: Vec<RawBusyEntry> = serde_json::from_str(json)?;
    parse_busy_intervals(&entries, participant_timezone)
}

fn parse_instant(
    value: Option<&str>,
    tz: Tz,
    index: usize,
    field: &'static str,
) -> Result<DateTime<Utc>, IntervalParseError> {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Err(IntervalParseError::MissingField { index, field }),
    };

    // Explicit offset or Z suffix: honored as given
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%z") {
        return Ok(dt.with_timezone(&Utc));
    }

    // Naive: interpreted in the participant's zone
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(resolve_local(tz, naive));
        }
    }

    Err(IntervalParseError::UnparsableDatetime {
        index,
        value: raw.to_string(),
    })
}
