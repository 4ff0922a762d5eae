//! Per-participant availability checks and per-slot aggregation.

use uuid::Uuid;

use crate::meeting::{BusyInterval, CandidateSlot, Participant};

/// Availability counts for one candidate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub available_count: u32,
    pub total_count: u32,
    pub available_participants: Vec<Uuid>,
}

/// A candidate is available iff it overlaps no busy interval, using
/// half-open semantics: `[a,b)` and `[c,d)` overlap iff `a < d && c < b`.
/// Touching intervals do not conflict.
pub fn is_participant_available(busy_intervals: &[BusyInterval], candidate: &CandidateSlot) -> bool {
    !busy_intervals
        .iter()
        .any(|b| b.overlaps(candidate.start, candidate.end))
}

/// Count how many responded participants are free for a candidate slot.
///
/// Only participants with `has_responded` are counted toward the total;
/// zero responded participants yields `(0, 0, [])`.
pub fn slot_availability(participants: &[Participant], candidate: &CandidateSlot) -> SlotAvailability {
    let mut total = 0u32;
    let mut available = Vec::new();
    for participant in participants.iter().filter(|p| p.has_responded) {
        total += 1;
        if is_participant_available(&participant.busy_intervals, candidate) {
            available.push(participant.id);
        }
    }
    SlotAvailability {
        available_count: available.len() as u32,
        total_count: total,
        available_participants: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candidate(start_h: u32, end_h: u32) -> CandidateSlot {
        CandidateSlot {
            start: Utc.with_ymd_and_hms(2024, 1, 1, start_h, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, end_h, 0, 0).unwrap(),
        }
    }

    fn busy(start_h: u32, end_h: u32) -> BusyInterval {
        BusyInterval {
            start: Utc.with_ymd_and_hms(2024, 1, 1, start_h, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, end_h, 0, 0).unwrap(),
        }
    }

    fn participant(responded: bool, intervals: Vec<BusyInterval>) -> Participant {
        Participant {
            id: Uuid::new_v4(),
            name: None,
            timezone: "UTC".to_string(),
            has_responded: responded,
            busy_intervals: intervals,
        }
    }

    #[test]
    fn free_without_busy_intervals() {
        assert!(is_participant_available(&[], &candidate(9, 10)));
    }

    #[test]
    fn touching_intervals_stay_available() {
        // Busy 10:00-11:00; a slot ending 10:00 or starting 11:00 is fine
        let intervals = [busy(10, 11)];
        assert!(is_participant_available(&intervals, &candidate(9, 10)));
        assert!(is_participant_available(&intervals, &candidate(11, 12)));
    }

    #[test]
    fn strict_overlap_blocks() {
        let intervals = [busy(10, 11)];
        assert!(!is_participant_available(&intervals, &candidate(10, 11)));
        assert!(!is_participant_available(
            &intervals,
            &CandidateSlot {
                start: Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap(),
            }
        ));
        // Busy interval fully inside the candidate
        assert!(!is_participant_available(&[busy(10, 11)], &candidate(9, 12)));
    }

    #[test]
    fn zero_responded_participants_yields_empty() {
        let participants = [participant(false, vec![]), participant(false, vec![busy(9, 17)])];
        let result = slot_availability(&participants, &candidate(9, 10));
        assert_eq!(result.available_count, 0);
        assert_eq!(result.total_count, 0);
        assert!(result.available_participants.is_empty());
    }

    #[test]
    fn only_responded_participants_are_counted() {
        let free = participant(true, vec![]);
        let blocked = participant(true, vec![busy(9, 10)]);
        let silent = participant(false, vec![]);
        let result = slot_availability(&[free.clone(), blocked, silent], &candidate(9, 10));
        assert_eq!(result.total_count, 2);
        assert_eq!(result.available_count, 1);
        assert_eq!(result.available_participants, vec![free.id]);
    }

    #[test]
    fn busy_data_of_unresponded_participant_is_not_consulted() {
        // The flag gates counting, not the stored data; an unresponded
        // participant with conflicts changes nothing.
        let responded_free = participant(true, vec![]);
        let unresponded_blocked = participant(false, vec![busy(0, 23)]);
        let result =
            slot_availability(&[responded_free, unresponded_blocked], &candidate(9, 10));
        assert_eq!(result.total_count, 1);
        assert_eq!(result.available_count, 1);
    }
}
