//! Heatmap projection.
//!
//! Re-expresses suggested slots in an arbitrary display timezone, grouped
//! by local date and local time-of-day. The `dates`/`time_slots` axes are
//! the sorted sets of distinct keys encountered, so the grid stays
//! rectangular even when day lengths differ across a DST transition.

use std::collections::{BTreeMap, BTreeSet};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::meeting::{MeetingConfig, SuggestedSlot};
use crate::slots::generate_time_slots;

/// One (date, time-of-day) grid entry. UTC bounds are preserved as RFC3339
/// strings for traceability back to the canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub level: u8,
    pub available: u32,
    pub total: u32,
    pub percentage: f64,
    pub start_utc: String,
    pub end_utc: String,
}

/// Heatmap view in one display timezone, shaped for the wire format:
/// `{dates, time_slots, heatmap, timezone}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapView {
    /// Sorted distinct local dates, `YYYY-MM-DD`
    pub dates: Vec<String>,
    /// Sorted distinct local start times, `HH:MM`
    pub time_slots: Vec<String>,
    /// Cells keyed by date, then time-of-day
    pub heatmap: BTreeMap<String, BTreeMap<String, HeatmapCell>>,
    pub timezone: String,
}

/// Project suggestion data into `display_timezone`.
///
/// When `slots` is empty the grid is synthesized from the configuration
/// with zero-participant cells, so the shape exists before any response.
///
/// # Errors
/// `ConfigError` for an unresolvable display timezone, or for a broken
/// config when synthesis is needed.
pub fn build_heatmap(
    meeting_id: Uuid,
    config: &MeetingConfig,
    slots: &[SuggestedSlot],
    display_timezone: &str,
) -> Result<HeatmapView, ConfigError> {
    let tz: Tz = display_timezone
        .parse()
        .map_err(|_| ConfigError::UnknownTimezone {
            name: display_timezone.to_string(),
        })?;

    let synthesized;
    let slots = if slots.is_empty() {
        synthesized = generate_time_slots(config)?
            .into_iter()
            .map(|c| SuggestedSlot {
                meeting_id,
                start: c.start,
                end: c.end,
                available_count: 0,
                total_participants: 0,
            })
            .collect::<Vec<_>>();
        &synthesized
    } else {
        slots
    };

    let mut heatmap: BTreeMap<String, BTreeMap<String, HeatmapCell>> = BTreeMap::new();
    let mut times = BTreeSet::new();

    for slot in slots {
        let local_start = slot.start.with_timezone(&tz);
        let date_key = local_start.format("%Y-%m-%d").to_string();
        let time_key = local_start.format("%H:%M").to_string();
        times.insert(time_key.clone());

        heatmap.entry(date_key).or_default().insert(
            time_key,
            HeatmapCell {
                level: slot.heatmap_level(),
                available: slot.available_count,
                total: slot.total_participants,
                percentage: slot.availability_percentage(),
                start_utc: slot.start.to_rfc3339(),
                end_utc: slot.end.to_rfc3339(),
            },
        );
    }

    Ok(HeatmapView {
        dates: heatmap.keys().cloned().collect(),
        time_slots: times.into_iter().collect(),
        heatmap,
        timezone: display_timezone.to_string(),
    })
}

impl HeatmapView {
    /// Look up the cell at a (date, time) coordinate.
    pub fn cell(&self, date: &str, time: &str) -> Option<&HeatmapCell> {
        self.heatmap.get(date).and_then(|row| row.get(time))
    }

    /// Render the grid as ASCII, one row per time-of-day, one column per
    /// date, intensity by heatmap level.
    pub fn render_ascii(&self) -> String {
        const LEVEL_CHARS: [char; 6] = ['.', '\u{2581}', '\u{2591}', '\u{2592}', '\u{2593}', '\u{2588}'];

        let mut out = String::new();
        if self.dates.is_empty() {
            out.push_str("no slots to display\n");
            return out;
        }

        out.push_str(&format!("Availability heatmap ({})\n", self.timezone));
        out.push_str("      ");
        for date in &self.dates {
            // MM-DD column headers
            out.push_str(&format!("{:>6}", &date[5..]));
        }
        out.push('\n');

        for time in &self.time_slots {
            out.push_str(&format!("{time:<6}"));
            for date in &self.dates {
                match self.cell(date, time) {
                    Some(cell) => {
                        let ch = LEVEL_CHARS[usize::from(cell.level.min(5))];
                        out.push_str(&format!("{ch:>6}"));
                    }
                    None => out.push_str("      "),
                }
            }
            out.push('\n');
        }
        out
    }
}
