//! Suggestion engine and scheduling facade.
//!
//! The engine composes slot generation and availability aggregation, then
//! writes the result through a [`SuggestionStore`] keyed by
//! `(meeting_id, start, end)`. Repeated runs with an unchanged
//! configuration upsert the same keys, so the operation is idempotent.
//!
//! The engine assumes exclusive ownership of one meeting's suggestion set
//! for the duration of a call; callers must not run two `recompute`s for
//! the same meeting concurrently. Separate meetings share no state.

use chrono::{DateTime, Utc};
use log::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, StoreError};
use crate::heatmap::{build_heatmap, HeatmapView};
use crate::meeting::{MeetingConfig, Participant, SuggestedSlot};
use crate::slots::{generate_time_slots, slot_availability, top_suggestions};

/// Read access to a meeting's configuration.
pub trait MeetingConfigSource {
    fn meeting_config(&self, meeting_id: Uuid) -> Result<MeetingConfig, StoreError>;
}

/// Read access to a meeting's participants, busy intervals included.
pub trait ParticipantSource {
    fn participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, StoreError>;
}

/// Persistence seam for suggested slots.
///
/// Errors are propagated to the engine's caller without retrying; a failed
/// write fails the whole recompute.
pub trait SuggestionStore {
    /// Create-or-overwrite by `(meeting_id, start, end)`.
    fn upsert_slot(&self, slot: &SuggestedSlot) -> Result<(), StoreError>;

    /// Remove every suggested slot for a meeting.
    fn delete_all(&self, meeting_id: Uuid) -> Result<(), StoreError>;

    /// Remove suggested slots whose key is not in `keep`.
    fn delete_except(
        &self,
        meeting_id: Uuid,
        keep: &[(DateTime<Utc>, DateTime<Utc>)],
    ) -> Result<(), StoreError>;

    /// Load a meeting's suggested slots ordered by start instant.
    fn load_slots(&self, meeting_id: Uuid) -> Result<Vec<SuggestedSlot>, StoreError>;
}

/// Combined store bound for the [`Scheduler`] facade.
pub trait MeetingStore: MeetingConfigSource + ParticipantSource + SuggestionStore {}

impl<T: MeetingConfigSource + ParticipantSource + SuggestionStore> MeetingStore for T {}

/// Recomputes and persists a meeting's suggested slots.
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    /// When set, a non-forced recompute also deletes records whose key the
    /// current configuration no longer produces. Off by default: stale
    /// keys from an older configuration are left in place as history.
    pub prune_stale: bool,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self { prune_stale: false }
    }

    pub fn with_prune_stale(mut self, prune_stale: bool) -> Self {
        self.prune_stale = prune_stale;
        self
    }

    /// Generate candidates, aggregate availability, and upsert one record
    /// per candidate. With `force_recalculate` the meeting's prior records
    /// are deleted first, removing slots a changed configuration no longer
    /// produces.
    ///
    /// Returns the freshly written set in generation order.
    pub fn recompute<S: SuggestionStore>(
        &self,
        store: &S,
        meeting_id: Uuid,
        config: &MeetingConfig,
        participants: &[Participant],
        force_recalculate: bool,
    ) -> Result<Vec<SuggestedSlot>, CoreError> {
        if force_recalculate {
            debug!("clearing existing suggestions for meeting {meeting_id}");
            store.delete_all(meeting_id)?;
        }

        let candidates = generate_time_slots(config)?;
        debug!(
            "generated {} candidate slots for meeting {meeting_id}",
            candidates.len()
        );

        let mut written = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let availability = slot_availability(participants, candidate);
            let slot = SuggestedSlot {
                meeting_id,
                start: candidate.start,
                end: candidate.end,
                available_count: availability.available_count,
                total_participants: availability.total_count,
            };
            store.upsert_slot(&slot)?;
            written.push(slot);
        }

        if self.prune_stale && !force_recalculate {
            let keep: Vec<_> = written.iter().map(SuggestedSlot::key).collect();
            store.delete_except(meeting_id, &keep)?;
        }

        info!(
            "recomputed {} suggested slots for meeting {meeting_id}",
            written.len()
        );
        Ok(written)
    }
}

/// Facade over a [`MeetingStore`] exposing the four host-facing operations:
/// recompute, top suggestions, heatmap, and busy-interval parsing
/// (re-exported from [`crate::busy`]).
pub struct Scheduler<S> {
    store: S,
    engine: SuggestionEngine,
}

impl<S: MeetingStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: SuggestionEngine::new(),
        }
    }

    pub fn with_engine(store: S, engine: SuggestionEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recompute and persist the meeting's suggestion set.
    pub fn recompute(
        &self,
        meeting_id: Uuid,
        force_recalculate: bool,
    ) -> Result<Vec<SuggestedSlot>, CoreError> {
        let config = self.store.meeting_config(meeting_id)?;
        let participants = self.store.participants(meeting_id)?;
        self.engine
            .recompute(&self.store, meeting_id, &config, &participants, force_recalculate)
    }

    /// Best persisted suggestions, filtered and ranked.
    pub fn top_suggestions(
        &self,
        meeting_id: Uuid,
        limit: usize,
        min_availability_pct: f64,
    ) -> Result<Vec<SuggestedSlot>, CoreError> {
        let slots = self.store.load_slots(meeting_id)?;
        Ok(top_suggestions(&slots, limit, min_availability_pct))
    }

    /// Heatmap of persisted suggestions in `display_timezone`, synthesized
    /// from the configuration when nothing is persisted yet.
    pub fn heatmap(
        &self,
        meeting_id: Uuid,
        display_timezone: &str,
    ) -> Result<HeatmapView, CoreError> {
        let config = self.store.meeting_config(meeting_id)?;
        let slots = self.store.load_slots(meeting_id)?;
        Ok(build_heatmap(meeting_id, &config, &slots, display_timezone)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::BusyInterval;
    use crate::storage::MemoryStore;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn config(step: u32) -> MeetingConfig {
        MeetingConfig {
            date_range_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_range_end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration_minutes: 60,
            work_hours_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_hours_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            step_size_minutes: step,
            work_days_only: true,
            timezone: "UTC".to_string(),
        }
    }

    fn free_participant() -> Participant {
        Participant {
            id: Uuid::new_v4(),
            name: None,
            timezone: "UTC".to_string(),
            has_responded: true,
            busy_intervals: Vec::new(),
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let store = MemoryStore::new();
        let engine = SuggestionEngine::new();
        let meeting_id = Uuid::new_v4();
        let participants = vec![free_participant(), free_participant()];

        let first = engine
            .recompute(&store, meeting_id, &config(30), &participants, false)
            .unwrap();
        let second = engine
            .recompute(&store, meeting_id, &config(30), &participants, false)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load_slots(meeting_id).unwrap().len(), first.len());
    }

    #[test]
    fn force_recalculate_removes_stale_keys() {
        let store = MemoryStore::new();
        let engine = SuggestionEngine::new();
        let meeting_id = Uuid::new_v4();

        // Step 30 writes starts at 09:00, 09:30, ..., 11:00
        engine
            .recompute(&store, meeting_id, &config(30), &[], false)
            .unwrap();
        assert_eq!(store.load_slots(meeting_id).unwrap().len(), 5);

        // Step 60 without force: the half-hour keys linger
        engine
            .recompute(&store, meeting_id, &config(60), &[], false)
            .unwrap();
        assert_eq!(store.load_slots(meeting_id).unwrap().len(), 5);

        // With force the set shrinks to what the new config produces
        let written = engine
            .recompute(&store, meeting_id, &config(60), &[], true)
            .unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(store.load_slots(meeting_id).unwrap().len(), 3);
    }

    #[test]
    fn prune_stale_removes_orphans_without_force() {
        let store = MemoryStore::new();
        let engine = SuggestionEngine::new().with_prune_stale(true);
        let meeting_id = Uuid::new_v4();

        engine
            .recompute(&store, meeting_id, &config(30), &[], false)
            .unwrap();
        engine
            .recompute(&store, meeting_id, &config(60), &[], false)
            .unwrap();
        assert_eq!(store.load_slots(meeting_id).unwrap().len(), 3);
    }

    #[test]
    fn counts_reflect_busy_participants() {
        let store = MemoryStore::new();
        let engine = SuggestionEngine::new();
        let meeting_id = Uuid::new_v4();

        let mut busy = free_participant();
        busy.busy_intervals = vec![BusyInterval {
            start: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        }];
        let participants = vec![free_participant(), busy];

        let written = engine
            .recompute(&store, meeting_id, &config(60), &participants, false)
            .unwrap();
        // 09:00 overlaps the busy hour, later slots do not
        assert_eq!(written[0].available_count, 1);
        assert_eq!(written[1].available_count, 2);
        assert_eq!(written[2].available_count, 2);
        assert!(written.iter().all(|s| s.total_participants == 2));
    }
}
