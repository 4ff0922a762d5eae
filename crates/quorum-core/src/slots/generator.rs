//! Candidate slot generation.
//!
//! Walks the configured date range in the meeting's timezone, lays
//! fixed-duration slots across the work-hour window at the configured step,
//! and converts each one to UTC. Weekend days are skipped when
//! `work_days_only` is set, judged on the local calendar date.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;
use crate::meeting::{CandidateSlot, MeetingConfig};

/// Generate every candidate slot for the configured window, ordered by
/// start instant and grouped by date.
///
/// A slot must fit entirely within the work window; one ending exactly at
/// `work_hours_end` is included. A date whose window cannot fit the
/// duration contributes no slots. Each slot's end is derived from its
/// resolved start, so slots span exactly `duration_minutes` even when the
/// window crosses a DST transition.
///
/// # Errors
/// Returns `ConfigError` for an unresolvable timezone or an invalid
/// date/hour relationship.
pub fn generate_time_slots(config: &MeetingConfig) -> Result<Vec<CandidateSlot>, ConfigError> {
    config.validate()?;
    let tz = config.tz()?;
    let duration = Duration::minutes(i64::from(config.duration_minutes));
    let step = Duration::minutes(i64::from(config.step_size_minutes));

    let mut slots = Vec::new();
    let mut date = config.date_range_start;
    while date <= config.date_range_end {
        if config.work_days_only && is_weekend_local(date) {
            date += Duration::days(1);
            continue;
        }

        let window_end = date.and_time(config.work_hours_end);
        let mut local_start = date.and_time(config.work_hours_start);
        let mut day_slots = Vec::new();
        while local_start + duration <= window_end {
            let start = resolve_local(tz, local_start);
            day_slots.push(CandidateSlot {
                start,
                end: start + duration,
            });
            local_start += step;
        }
        // A spring-forward gap maps several wall-clock starts to the same
        // instant and puts them out of order; restore start order and keep
        // one slot per (start, end) key.
        day_slots.sort_by_key(|slot| (slot.start, slot.end));
        day_slots.dedup();
        slots.append(&mut day_slots);

        date += Duration::days(1);
    }
    Ok(slots)
}

fn is_weekend_local(date: chrono::NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Map a local wall-clock time in `tz` to a UTC instant.
///
/// DST policy: an ambiguous local time (fall-back overlap) resolves to the
/// later, post-transition interpretation; a nonexistent local time
/// (spring-forward gap) is interpreted with the offset in force once the
/// gap is over. Nothing is dropped.
pub(crate) fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(_, later) => later.with_timezone(&Utc),
        LocalResult::None => {
            // Probe forward past the gap to find the post-transition
            // offset, then apply it to the original wall-clock time.
            // Real-world gaps are at most a few hours.
            let mut probe = local;
            for _ in 0..96 {
                probe += Duration::minutes(30);
                if let Some(dt) = tz.from_local_datetime(&probe).latest() {
                    let offset = dt.offset().fix();
                    let utc_naive = local - Duration::seconds(i64::from(offset.local_minus_utc()));
                    return Utc.from_utc_datetime(&utc_naive);
                }
            }
            // Unreachable for any real tzdata zone; treat as UTC rather
            // than panic.
            Utc.from_utc_datetime(&local)
        }
    }
}
