//! Slot generation, availability checks, and ranking.
//!
//! This module provides:
//! - Candidate slot generation from a meeting's search window
//! - Half-open overlap checks against participant busy intervals
//! - Aggregation of per-participant checks into availability counts
//! - Ranked selection of the best suggestions

mod availability;
mod generator;
mod ranking;

pub use availability::{is_participant_available, slot_availability, SlotAvailability};
pub use generator::generate_time_slots;
pub use ranking::top_suggestions;

pub(crate) use generator::resolve_local;
