//! In-memory meeting store.
//!
//! Implements the same store seams as [`super::MeetingDb`] against plain
//! maps. Used by tests and by embedders that don't want a database file.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::{MeetingConfigSource, ParticipantSource, SuggestionStore};
use crate::error::StoreError;
use crate::meeting::{MeetingConfig, Participant, SuggestedSlot};

type SlotKey = (DateTime<Utc>, DateTime<Utc>);

#[derive(Default)]
struct Inner {
    meetings: HashMap<Uuid, MeetingConfig>,
    participants: HashMap<Uuid, Vec<Participant>>,
    slots: HashMap<Uuid, BTreeMap<SlotKey, SuggestedSlot>>,
}

/// HashMap-backed store. A missing meeting behaves like an empty one for
/// reads that can tolerate it and errors where the database would.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a meeting configuration.
    pub fn insert_meeting(&self, meeting_id: Uuid, config: MeetingConfig) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.meetings.insert(meeting_id, config);
    }

    /// Attach a participant to a meeting.
    pub fn insert_participant(&self, meeting_id: Uuid, participant: Participant) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner
            .participants
            .entry(meeting_id)
            .or_default()
            .push(participant);
    }
}

impl MeetingConfigSource for MemoryStore {
    fn meeting_config(&self, meeting_id: Uuid) -> Result<MeetingConfig, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        inner
            .meetings
            .get(&meeting_id)
            .cloned()
            .ok_or(StoreError::MeetingNotFound(meeting_id))
    }
}

impl ParticipantSource for MemoryStore {
    fn participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .participants
            .get(&meeting_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl SuggestionStore for MemoryStore {
    fn upsert_slot(&self, slot: &SuggestedSlot) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner
            .slots
            .entry(slot.meeting_id)
            .or_default()
            .insert(slot.key(), slot.clone());
        Ok(())
    }

    fn delete_all(&self, meeting_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.slots.remove(&meeting_id);
        Ok(())
    }

    fn delete_except(&self, meeting_id: Uuid, keep: &[SlotKey]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if let Some(slots) = inner.slots.get_mut(&meeting_id) {
            slots.retain(|key, _| keep.contains(key));
        }
        Ok(())
    }

    fn load_slots(&self, meeting_id: Uuid) -> Result<Vec<SuggestedSlot>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .slots
            .get(&meeting_id)
            .map(|slots| slots.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(meeting_id: Uuid, hour: u32, available: u32) -> SuggestedSlot {
        SuggestedSlot {
            meeting_id,
            start: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, hour + 1, 0, 0).unwrap(),
            available_count: available,
            total_participants: 5,
        }
    }

    #[test]
    fn upsert_replaces_by_key() {
        let store = MemoryStore::new();
        let meeting_id = Uuid::new_v4();
        store.upsert_slot(&slot(meeting_id, 9, 2)).unwrap();
        store.upsert_slot(&slot(meeting_id, 9, 4)).unwrap();
        let slots = store.load_slots(meeting_id).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].available_count, 4);
    }

    #[test]
    fn slots_load_in_start_order() {
        let store = MemoryStore::new();
        let meeting_id = Uuid::new_v4();
        for hour in [11, 9, 10] {
            store.upsert_slot(&slot(meeting_id, hour, 0)).unwrap();
        }
        let starts: Vec<_> = store
            .load_slots(meeting_id)
            .unwrap()
            .iter()
            .map(|s| s.start)
            .collect();
        assert!(starts.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn meetings_are_isolated() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert_slot(&slot(a, 9, 1)).unwrap();
        store.upsert_slot(&slot(b, 9, 1)).unwrap();
        store.delete_all(a).unwrap();
        assert!(store.load_slots(a).unwrap().is_empty());
        assert_eq!(store.load_slots(b).unwrap().len(), 1);
    }

    #[test]
    fn missing_meeting_config_errors() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.meeting_config(Uuid::new_v4()),
            Err(StoreError::MeetingNotFound(_))
        ));
    }
}
