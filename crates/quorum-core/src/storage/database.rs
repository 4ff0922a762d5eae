//! SQLite-backed meeting storage.
//!
//! Persists meeting requests, participants with their busy intervals, and
//! the suggested-slot records the engine writes. Instants are stored as
//! RFC3339 text in UTC; a row that fails to parse back is a hard error,
//! never silently replaced.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::engine::{MeetingConfigSource, ParticipantSource, SuggestionStore};
use crate::error::StoreError;
use crate::meeting::{BusyInterval, MeetingConfig, Participant, SuggestedSlot};

/// A stored meeting request: configuration plus identity and title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: Uuid,
    pub title: String,
    pub config: MeetingConfig,
    pub created_at: DateTime<Utc>,
}

/// SQLite database for meetings, participants, and suggested slots.
pub struct MeetingDb {
    conn: Connection,
}

impl MeetingDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/quorum/quorum.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("quorum.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and throwaway runs).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meetings (
                id                TEXT PRIMARY KEY,
                title             TEXT NOT NULL,
                date_range_start  TEXT NOT NULL,
                date_range_end    TEXT NOT NULL,
                duration_minutes  INTEGER NOT NULL,
                work_hours_start  TEXT NOT NULL,
                work_hours_end    TEXT NOT NULL,
                step_size_minutes INTEGER NOT NULL,
                work_days_only    INTEGER NOT NULL,
                timezone          TEXT NOT NULL,
                created_at        TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS participants (
                id            TEXT PRIMARY KEY,
                meeting_id    TEXT NOT NULL REFERENCES meetings(id),
                name          TEXT,
                timezone      TEXT NOT NULL,
                has_responded INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS busy_intervals (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                participant_id TEXT NOT NULL REFERENCES participants(id),
                start_time     TEXT NOT NULL,
                end_time       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS suggested_slots (
                meeting_id         TEXT NOT NULL REFERENCES meetings(id),
                start_time         TEXT NOT NULL,
                end_time           TEXT NOT NULL,
                available_count    INTEGER NOT NULL DEFAULT 0,
                total_participants INTEGER NOT NULL DEFAULT 0,
                calculated_at      TEXT NOT NULL,
                PRIMARY KEY (meeting_id, start_time, end_time)
            );

            CREATE INDEX IF NOT EXISTS idx_participants_meeting
                ON participants(meeting_id, has_responded);
            CREATE INDEX IF NOT EXISTS idx_busy_participant
                ON busy_intervals(participant_id, start_time, end_time);
            CREATE INDEX IF NOT EXISTS idx_slots_meeting_count
                ON suggested_slots(meeting_id, available_count DESC);",
        )?;
        Ok(())
    }

    /// Create a meeting request.
    pub fn create_meeting(
        &self,
        title: &str,
        config: &MeetingConfig,
    ) -> Result<MeetingRecord, StoreError> {
        let record = MeetingRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            config: config.clone(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO meetings (id, title, date_range_start, date_range_end,
                duration_minutes, work_hours_start, work_hours_end,
                step_size_minutes, work_days_only, timezone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.id.to_string(),
                record.title,
                config.date_range_start.format("%Y-%m-%d").to_string(),
                config.date_range_end.format("%Y-%m-%d").to_string(),
                config.duration_minutes,
                config.work_hours_start.format("%H:%M:%S").to_string(),
                config.work_hours_end.format("%H:%M:%S").to_string(),
                config.step_size_minutes,
                config.work_days_only,
                config.timezone,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(record)
    }

    /// Load a meeting request by id.
    pub fn get_meeting(&self, meeting_id: Uuid) -> Result<MeetingRecord, StoreError> {
        self.conn
            .query_row(
                "SELECT id, title, date_range_start, date_range_end, duration_minutes,
                        work_hours_start, work_hours_end, step_size_minutes,
                        work_days_only, timezone, created_at
                 FROM meetings WHERE id = ?1",
                params![meeting_id.to_string()],
                row_to_meeting,
            )
            .optional()?
            .ok_or(StoreError::MeetingNotFound(meeting_id))
    }

    /// List all meeting requests, newest first.
    pub fn list_meetings(&self) -> Result<Vec<MeetingRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, date_range_start, date_range_end, duration_minutes,
                    work_hours_start, work_hours_end, step_size_minutes,
                    work_days_only, timezone, created_at
             FROM meetings ORDER BY created_at DESC",
        )?;
        let records = stmt
            .query_map([], row_to_meeting)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete a meeting and everything attached to it.
    pub fn delete_meeting(&self, meeting_id: Uuid) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let id = meeting_id.to_string();
        tx.execute(
            "DELETE FROM busy_intervals WHERE participant_id IN
                 (SELECT id FROM participants WHERE meeting_id = ?1)",
            params![id],
        )?;
        tx.execute("DELETE FROM participants WHERE meeting_id = ?1", params![id])?;
        tx.execute(
            "DELETE FROM suggested_slots WHERE meeting_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM meetings WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    /// Invite a participant to a meeting.
    pub fn add_participant(
        &self,
        meeting_id: Uuid,
        name: Option<&str>,
        timezone: &str,
    ) -> Result<Participant, StoreError> {
        // Surface a missing meeting as its own error, not a constraint hit
        self.get_meeting(meeting_id)?;
        let participant = Participant {
            id: Uuid::new_v4(),
            name: name.map(str::to_string),
            timezone: timezone.to_string(),
            has_responded: false,
            busy_intervals: Vec::new(),
        };
        self.conn.execute(
            "INSERT INTO participants (id, meeting_id, name, timezone, has_responded)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![
                participant.id.to_string(),
                meeting_id.to_string(),
                participant.name,
                participant.timezone,
            ],
        )?;
        Ok(participant)
    }

    /// Load one participant with their busy intervals.
    pub fn get_participant(&self, participant_id: Uuid) -> Result<Participant, StoreError> {
        let mut participant = self
            .conn
            .query_row(
                "SELECT id, name, timezone, has_responded
                 FROM participants WHERE id = ?1",
                params![participant_id.to_string()],
                row_to_participant,
            )
            .optional()?
            .ok_or(StoreError::ParticipantNotFound(participant_id))?;
        participant.busy_intervals = self.busy_intervals(participant_id)?;
        Ok(participant)
    }

    /// Look up the meeting a participant belongs to.
    pub fn participant_meeting(&self, participant_id: Uuid) -> Result<Uuid, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT meeting_id FROM participants WHERE id = ?1",
                params![participant_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let raw = raw.ok_or(StoreError::ParticipantNotFound(participant_id))?;
        Uuid::parse_str(&raw).map_err(|e| StoreError::QueryFailed(e.to_string()))
    }

    /// Replace a participant's busy intervals and mark them as responded.
    pub fn set_busy_intervals(
        &self,
        participant_id: Uuid,
        intervals: &[BusyInterval],
    ) -> Result<(), StoreError> {
        self.get_participant(participant_id)?;
        let tx = self.conn.unchecked_transaction()?;
        let id = participant_id.to_string();
        tx.execute(
            "DELETE FROM busy_intervals WHERE participant_id = ?1",
            params![id],
        )?;
        for interval in intervals {
            tx.execute(
                "INSERT INTO busy_intervals (participant_id, start_time, end_time)
                 VALUES (?1, ?2, ?3)",
                params![
                    id,
                    interval.start.to_rfc3339(),
                    interval.end.to_rfc3339()
                ],
            )?;
        }
        tx.execute(
            "UPDATE participants SET has_responded = 1 WHERE id = ?1",
            params![id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn busy_intervals(&self, participant_id: Uuid) -> Result<Vec<BusyInterval>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT start_time, end_time FROM busy_intervals
             WHERE participant_id = ?1 ORDER BY start_time",
        )?;
        let intervals = stmt
            .query_map(params![participant_id.to_string()], |row| {
                let start: String = row.get(0)?;
                let end: String = row.get(1)?;
                Ok(BusyInterval {
                    start: parse_utc(0, &start)?,
                    end: parse_utc(1, &end)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(intervals)
    }
}

impl MeetingConfigSource for MeetingDb {
    fn meeting_config(&self, meeting_id: Uuid) -> Result<MeetingConfig, StoreError> {
        Ok(self.get_meeting(meeting_id)?.config)
    }
}

impl ParticipantSource for MeetingDb {
    fn participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, timezone, has_responded
             FROM participants WHERE meeting_id = ?1",
        )?;
        let mut participants = stmt
            .query_map(params![meeting_id.to_string()], row_to_participant)?
            .collect::<Result<Vec<_>, _>>()?;
        for participant in &mut participants {
            participant.busy_intervals = self.busy_intervals(participant.id)?;
        }
        Ok(participants)
    }
}

impl SuggestionStore for MeetingDb {
    fn upsert_slot(&self, slot: &SuggestedSlot) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO suggested_slots
                (meeting_id, start_time, end_time, available_count,
                 total_participants, calculated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (meeting_id, start_time, end_time) DO UPDATE SET
                available_count = excluded.available_count,
                total_participants = excluded.total_participants,
                calculated_at = excluded.calculated_at",
            params![
                slot.meeting_id.to_string(),
                slot.start.to_rfc3339(),
                slot.end.to_rfc3339(),
                slot.available_count,
                slot.total_participants,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_all(&self, meeting_id: Uuid) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM suggested_slots WHERE meeting_id = ?1",
            params![meeting_id.to_string()],
        )?;
        Ok(())
    }

    fn delete_except(
        &self,
        meeting_id: Uuid,
        keep: &[(DateTime<Utc>, DateTime<Utc>)],
    ) -> Result<(), StoreError> {
        let keep: HashSet<_> = keep.iter().copied().collect();
        let stale: Vec<_> = self
            .load_slots(meeting_id)?
            .into_iter()
            .filter(|slot| !keep.contains(&slot.key()))
            .collect();
        // All-or-nothing: a failure mid-prune must not leave a partially
        // deleted set.
        let tx = self.conn.unchecked_transaction()?;
        for slot in &stale {
            tx.execute(
                "DELETE FROM suggested_slots
                 WHERE meeting_id = ?1 AND start_time = ?2 AND end_time = ?3",
                params![
                    meeting_id.to_string(),
                    slot.start.to_rfc3339(),
                    slot.end.to_rfc3339()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load_slots(&self, meeting_id: Uuid) -> Result<Vec<SuggestedSlot>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT meeting_id, start_time, end_time, available_count, total_participants
             FROM suggested_slots WHERE meeting_id = ?1
             ORDER BY start_time, end_time",
        )?;
        let slots = stmt
            .query_map(params![meeting_id.to_string()], |row| {
                let id: String = row.get(0)?;
                let start: String = row.get(1)?;
                let end: String = row.get(2)?;
                Ok(SuggestedSlot {
                    meeting_id: parse_uuid(0, &id)?,
                    start: parse_utc(1, &start)?,
                    end: parse_utc(2, &end)?,
                    available_count: row.get(3)?,
                    total_participants: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }
}

// === Row mappers ===
//
// Parsing is strict: a corrupt column fails the query instead of being
// papered over with a default.

fn row_to_meeting(row: &rusqlite::Row) -> Result<MeetingRecord, rusqlite::Error> {
    let id: String = row.get(0)?;
    let range_start: String = row.get(2)?;
    let range_end: String = row.get(3)?;
    let hours_start: String = row.get(5)?;
    let hours_end: String = row.get(6)?;
    let created_at: String = row.get(10)?;
    Ok(MeetingRecord {
        id: parse_uuid(0, &id)?,
        title: row.get(1)?,
        config: MeetingConfig {
            date_range_start: parse_date(2, &range_start)?,
            date_range_end: parse_date(3, &range_end)?,
            duration_minutes: row.get(4)?,
            work_hours_start: parse_time(5, &hours_start)?,
            work_hours_end: parse_time(6, &hours_end)?,
            step_size_minutes: row.get(7)?,
            work_days_only: row.get(8)?,
            timezone: row.get(9)?,
        },
        created_at: parse_utc(10, &created_at)?,
    })
}

fn row_to_participant(row: &rusqlite::Row) -> Result<Participant, rusqlite::Error> {
    let id: String = row.get(0)?;
    Ok(Participant {
        id: parse_uuid(0, &id)?,
        name: row.get(1)?,
        timezone: row.get(2)?,
        has_responded: row.get(3)?,
        busy_intervals: Vec::new(),
    })
}

fn parse_utc(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_uuid(idx: usize, raw: &str) -> Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_date(idx: usize, raw: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_time(idx: usize, raw: &str) -> Result<NaiveTime, rusqlite::Error> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
