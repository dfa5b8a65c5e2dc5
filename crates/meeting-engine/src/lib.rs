//! # meeting-engine
//!
//! Deterministic scheduling computations for the meetings calendar.
//!
//! Everything here is a pure function over plain meeting records: no I/O, no
//! shared state, safe to call from any thread. Persistence, auth and transport
//! belong to the client and backend around it.
//!
//! ## Modules
//!
//! - [`expander`] — seed meeting + frequency → later occurrences (capped at 100)
//! - [`conflict`] — half-open overlap checks against booked meetings
//! - [`dst`] — how occurrences inside DST gaps are resolved
//! - [`geo`] — haversine distance, distance/travel labels, map bounds
//! - [`timezone`] — zone-aware date/time labels that never fail
//! - [`model`] — `Meeting`, `TimeSlot`, frequency and status enums
//! - [`config`] — TOML-backed `ScheduleConfig`
//! - [`error`] — Error types for the parsing/validation entry points

pub mod config;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod expander;
pub mod geo;
pub mod locale;
pub mod model;
pub mod timezone;

pub use config::ScheduleConfig;
pub use conflict::{check_conflict, check_instances, ConflictVerdict};
pub use error::EngineError;
pub use expander::{generate_instances, generate_instances_with, ExpansionOptions};
pub use geo::{
    calculate_distance, estimate_travel_time, format_distance, get_bounds_for_coordinates,
    BoundingBox, Coordinates,
};
pub use locale::Locale;
pub use model::{Meeting, MeetingStatus, RecurrenceFrequency, TimeSlot};
pub use timezone::format_in_timezone;
