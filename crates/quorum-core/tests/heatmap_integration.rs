//! Integration tests for heatmap projection.
//!
//! This test file verifies:
//! - Projection into a non-UTC display timezone via the facade
//! - Grid synthesis before any recompute has run
//! - Axis behavior across a DST transition
//! - The JSON wire format

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use quorum_core::{MeetingConfig, MemoryStore, Participant, Scheduler};

fn config(from: NaiveDate, to: NaiveDate, tz: &str) -> MeetingConfig {
    MeetingConfig {
        date_range_start: from,
        date_range_end: to,
        duration_minutes: 60,
        work_hours_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        work_hours_end: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        step_size_minutes: 60,
        work_days_only: false,
        timezone: tz.to_string(),
    }
}

fn seeded(cfg: MeetingConfig, responded: usize) -> (Scheduler<MemoryStore>, Uuid) {
    let store = MemoryStore::new();
    let meeting_id = Uuid::new_v4();
    store.insert_meeting(meeting_id, cfg);
    for _ in 0..responded {
        store.insert_participant(
            meeting_id,
            Participant {
                id: Uuid::new_v4(),
                name: None,
                timezone: "UTC".to_string(),
                has_responded: true,
                busy_intervals: Vec::new(),
            },
        );
    }
    (Scheduler::new(store), meeting_id)
}

#[test]
fn heatmap_before_any_recompute_synthesizes_the_grid() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let (scheduler, meeting_id) = seeded(config(day, day, "UTC"), 3);

    // No recompute yet: grid shape exists, counts are zero
    let view = scheduler.heatmap(meeting_id, "UTC").unwrap();
    assert_eq!(view.dates, vec!["2024-01-01"]);
    assert_eq!(view.time_slots, vec!["09:00", "10:00"]);
    assert_eq!(view.cell("2024-01-01", "09:00").unwrap().total, 0);
    assert_eq!(view.cell("2024-01-01", "09:00").unwrap().level, 0);
}

#[test]
fn heatmap_reflects_persisted_counts_in_display_zone() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let (scheduler, meeting_id) = seeded(config(day, day, "UTC"), 4);
    scheduler.recompute(meeting_id, false).unwrap();

    // UTC 09:00 is 16:00 in Asia/Ho_Chi_Minh (+07:00)
    let view = scheduler.heatmap(meeting_id, "Asia/Ho_Chi_Minh").unwrap();
    assert_eq!(view.timezone, "Asia/Ho_Chi_Minh");
    assert_eq!(view.dates, vec!["2024-01-01"]);
    assert_eq!(view.time_slots, vec!["16:00", "17:00"]);
    let cell = view.cell("2024-01-01", "16:00").unwrap();
    assert_eq!(cell.available, 4);
    assert_eq!(cell.total, 4);
    assert_eq!(cell.level, 5);
    assert_eq!(cell.start_utc, "2024-01-01T09:00:00+00:00");
}

#[test]
fn dst_transition_keeps_axes_as_distinct_key_unions() {
    // America/New_York falls back on 2024-11-03; local work hours stay
    // 09:00-11:00 on both days, so time axis keys coincide while the UTC
    // instants behind them shift by an hour.
    let from = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
    let (scheduler, meeting_id) = seeded(config(from, to, "America/New_York"), 1);
    scheduler.recompute(meeting_id, false).unwrap();

    let view = scheduler.heatmap(meeting_id, "America/New_York").unwrap();
    assert_eq!(view.dates, vec!["2024-11-02", "2024-11-03"]);
    assert_eq!(view.time_slots, vec!["09:00", "10:00"]);

    let before = view.cell("2024-11-02", "09:00").unwrap();
    let after = view.cell("2024-11-03", "09:00").unwrap();
    // EDT (-04:00) vs EST (-05:00)
    assert_eq!(before.start_utc, "2024-11-02T13:00:00+00:00");
    assert_eq!(after.start_utc, "2024-11-03T14:00:00+00:00");
}

#[test]
fn wire_format_matches_the_contract() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let (scheduler, meeting_id) = seeded(config(day, day, "UTC"), 2);
    scheduler.recompute(meeting_id, false).unwrap();

    let view = scheduler.heatmap(meeting_id, "UTC").unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert!(json["dates"].is_array());
    assert!(json["time_slots"].is_array());
    assert_eq!(json["timezone"], "UTC");
    let cell = &json["heatmap"]["2024-01-01"]["09:00"];
    assert_eq!(cell["available"], 2);
    assert_eq!(cell["total"], 2);
    assert_eq!(cell["level"], 5);
    assert_eq!(cell["percentage"], 100.0);
    assert!(cell["start_utc"].is_string());
    assert!(cell["end_utc"].is_string());
}

#[test]
fn invalid_display_timezone_is_rejected() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let (scheduler, meeting_id) = seeded(config(day, day, "UTC"), 0);
    assert!(scheduler.heatmap(meeting_id, "Noplace/Nowhere").is_err());
}
