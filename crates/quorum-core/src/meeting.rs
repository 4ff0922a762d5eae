//! Meeting domain records.
//!
//! All instants are canonical UTC. A meeting's configuration describes a
//! local search window (date range, work hours, step) in one IANA timezone;
//! participants submit busy intervals that are normalized to UTC before
//! they reach this module.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;

/// Search-window configuration for one meeting request.
///
/// Immutable input to the engine; owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingConfig {
    pub date_range_start: NaiveDate,
    pub date_range_end: NaiveDate,
    pub duration_minutes: u32,
    pub work_hours_start: NaiveTime,
    pub work_hours_end: NaiveTime,
    pub step_size_minutes: u32,
    pub work_days_only: bool,
    /// IANA zone name the date range and work hours are expressed in
    pub timezone: String,
}

impl MeetingConfig {
    /// Resolve the configured timezone name.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone {
                name: self.timezone.clone(),
            })
    }

    /// Validate invariants: positive duration and step, ordered work hours
    /// and date range, resolvable timezone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "duration_minutes",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.step_size_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "step_size_minutes",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.work_hours_start >= self.work_hours_end {
            return Err(ConfigError::InvalidValue {
                field: "work_hours_start",
                message: format!(
                    "work hours start ({}) must be before end ({})",
                    self.work_hours_start, self.work_hours_end
                ),
            });
        }
        if self.date_range_start > self.date_range_end {
            return Err(ConfigError::InvalidValue {
                field: "date_range_start",
                message: format!(
                    "date range start ({}) must not be after end ({})",
                    self.date_range_start, self.date_range_end
                ),
            });
        }
        self.tz()?;
        Ok(())
    }
}

/// A participant invited to provide availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: Option<String>,
    /// Zone used to interpret naive datetime submissions
    pub timezone: String,
    /// Gates whether the participant is counted, not whether their busy
    /// data is honored
    pub has_responded: bool,
    pub busy_intervals: Vec<BusyInterval>,
}

/// A half-open `[start, end)` interval when a participant is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// Half-open overlap test: touching intervals do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// A generated, not-yet-scored interval. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A persisted interval with computed availability counts, keyed by
/// `(meeting_id, start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedSlot {
    pub meeting_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available_count: u32,
    pub total_participants: u32,
}

impl SuggestedSlot {
    /// Percentage of counted participants available for this slot, rounded
    /// to one decimal (round-half-to-even). Zero participants yields 0.0.
    pub fn availability_percentage(&self) -> f64 {
        if self.total_participants == 0 {
            return 0.0;
        }
        let pct = self.available_count as f64 / self.total_participants as f64 * 100.0;
        (pct * 10.0).round_ties_even() / 10.0
    }

    /// Heatmap intensity level (0-5) derived from the percentage:
    /// 5 = 80%+, 4 = 60-79%, 3 = 40-59%, 2 = 20-39%, 1 = 1-19%, 0 = 0%.
    pub fn heatmap_level(&self) -> u8 {
        let pct = self.availability_percentage();
        if pct >= 80.0 {
            5
        } else if pct >= 60.0 {
            4
        } else if pct >= 40.0 {
            3
        } else if pct >= 20.0 {
            2
        } else if pct > 0.0 {
            1
        } else {
            0
        }
    }

    /// Key the store upserts on.
    pub fn key(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }
}

/// Percentage of participants who have responded, rounded to the nearest
/// whole number.
pub fn response_rate(participants: &[Participant]) -> u32 {
    if participants.is_empty() {
        return 0;
    }
    let responded = participants.iter().filter(|p| p.has_responded).count();
    (responded as f64 / participants.len() as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(available: u32, total: u32) -> SuggestedSlot {
        SuggestedSlot {
            meeting_id: Uuid::nil(),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            available_count: available,
            total_participants: total,
        }
    }

    fn config() -> MeetingConfig {
        MeetingConfig {
            date_range_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_range_end: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            duration_minutes: 60,
            work_hours_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_hours_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            step_size_minutes: 30,
            work_days_only: true,
            timezone: "UTC".to_string(),
        }
    }

    #[test]
    fn percentage_is_zero_without_participants() {
        assert_eq!(slot(0, 0).availability_percentage(), 0.0);
        assert_eq!(slot(0, 0).heatmap_level(), 0);
    }

    #[test]
    fn percentage_rounds_half_to_even() {
        // 1/16 = 6.25% -> 6.2, 3/16 = 18.75% -> 18.8
        assert_eq!(slot(1, 16).availability_percentage(), 6.2);
        assert_eq!(slot(3, 16).availability_percentage(), 18.8);
        // 1/3 = 33.333...% -> 33.3
        assert_eq!(slot(1, 3).availability_percentage(), 33.3);
    }

    #[test]
    fn heatmap_level_boundaries() {
        assert_eq!(slot(0, 5).heatmap_level(), 0); // 0%
        assert_eq!(slot(199, 1000).heatmap_level(), 1); // 19.9%
        assert_eq!(slot(1, 5).heatmap_level(), 2); // 20%
        assert_eq!(slot(399, 1000).heatmap_level(), 2); // 39.9%
        assert_eq!(slot(2, 5).heatmap_level(), 3); // 40%
        assert_eq!(slot(599, 1000).heatmap_level(), 3); // 59.9%
        assert_eq!(slot(3, 5).heatmap_level(), 4); // 60%
        assert_eq!(slot(799, 1000).heatmap_level(), 4); // 79.9%
        assert_eq!(slot(4, 5).heatmap_level(), 5); // 80%
        assert_eq!(slot(5, 5).heatmap_level(), 5); // 100%
        assert_eq!(slot(1, 1000).heatmap_level(), 1); // 0.1%, nonzero floor
    }

    #[test]
    fn busy_interval_overlap_is_half_open() {
        let busy = BusyInterval {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
        };
        // Touching on either side is not an overlap
        assert!(!busy.overlaps(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        ));
        assert!(!busy.overlaps(
            Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        assert!(busy.overlaps(
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap(),
        ));
    }

    #[test]
    fn config_validation() {
        assert!(config().validate().is_ok());

        let mut bad = config();
        bad.duration_minutes = 0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.work_hours_start = bad.work_hours_end;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.date_range_end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::UnknownTimezone { .. })
        ));
    }

    #[test]
    fn response_rate_rounds() {
        let mk = |responded| Participant {
            id: Uuid::new_v4(),
            name: None,
            timezone: "UTC".to_string(),
            has_responded: responded,
            busy_intervals: Vec::new(),
        };
        assert_eq!(response_rate(&[]), 0);
        assert_eq!(response_rate(&[mk(true), mk(false), mk(false)]), 33);
        assert_eq!(response_rate(&[mk(true), mk(true), mk(false)]), 67);
    }
}
