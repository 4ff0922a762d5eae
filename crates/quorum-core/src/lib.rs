//! # Quorum Core Library
//!
//! This library provides the core business logic for Quorum, a meeting
//! time finder that maximizes participant overlap across timezones. All
//! operations are available to a standalone CLI binary; any other host
//! (web, desktop) is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Slots**: candidate slot generation over a meeting's search window,
//!   half-open availability checks, aggregation, and ranking
//! - **Engine**: recomputes and persists suggestion records through a
//!   store seam, idempotently under repeated runs
//! - **Heatmap**: projects suggestion data into a display timezone as a
//!   date x time-of-day grid
//! - **Busy**: normalizes participant-submitted intervals to UTC
//! - **Storage**: SQLite-backed meeting store and TOML configuration
//!
//! All computation is synchronous and single-threaded; callers may
//! parallelize across meetings but not within one.
//!
//! ## Key Components
//!
//! - [`Scheduler`]: facade over a [`MeetingStore`]
//! - [`SuggestionEngine`]: recompute/upsert core
//! - [`MeetingDb`]: persistent storage
//! - [`HeatmapView`]: display projection

pub mod busy;
pub mod engine;
pub mod error;
pub mod heatmap;
pub mod meeting;
pub mod slots;
pub mod storage;

pub use busy::{parse_busy_intervals, parse_busy_intervals_json, RawBusyEntry};
pub use engine::{
    MeetingConfigSource, MeetingStore, ParticipantSource, Scheduler, SuggestionEngine,
    SuggestionStore,
};
pub use error::{ConfigError, CoreError, IntervalParseError, StoreError};
pub use heatmap::{build_heatmap, HeatmapCell, HeatmapView};
pub use meeting::{
    response_rate, BusyInterval, CandidateSlot, MeetingConfig, Participant, SuggestedSlot,
};
pub use slots::{
    generate_time_slots, is_participant_available, slot_availability, top_suggestions,
    SlotAvailability,
};
pub use storage::{AppConfig, MeetingDb, MeetingRecord, MemoryStore};
