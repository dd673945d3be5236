//! Core domain logic for biathlon race processing.
//!
//! This crate contains the fundamental types and logic for:
//! - Clock codec: parsing and printing race-clock instants and durations
//! - Event parsing: turning race log lines into typed records
//! - Race interpretation: folding events into per-competitor state
//! - Standings: lap/penalty statistics and the final ranking

pub mod clock;
pub mod competitor;
pub mod config;
pub mod event;
pub mod event_type;
pub mod race;
pub mod standings;
pub mod types;

pub use competitor::{Competitor, Status};
pub use config::RaceConfig;
pub use event::{EventRecord, ParsedLog, RejectedLine, parse_log};
pub use event_type::{EventKind, OutgoingKind};
pub use race::{Entry, Narration, Race, RaceOutcome, process_events};
pub use standings::{SegmentStat, Standing, standings};
pub use types::{CompetitorId, FormatError};
