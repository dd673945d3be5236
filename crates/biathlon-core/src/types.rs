//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding clock strings and event log lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A timestamp was not enclosed in a single pair of square brackets.
    #[error("time string must be enclosed in square brackets: {input}")]
    MissingBrackets { input: String },

    /// A clock string did not match the fixed-width `HH:MM:SS.mmm` pattern.
    #[error("invalid clock value: {input}")]
    InvalidClock { input: String },

    /// No `"] "` separator between the timestamp and the event body.
    #[error("invalid event log format: {line}")]
    MissingBody { line: String },

    /// The event body has fewer than two tokens.
    #[error("invalid event format: {body}")]
    MissingFields { body: String },

    /// The event kind token is not an integer.
    #[error("invalid event ID: {token}")]
    InvalidKind { token: String },

    /// The event kind is numeric but not an inbound event.
    #[error("unknown event ID: {code}")]
    UnknownKind { code: u32 },

    /// The competitor token is not an integer.
    #[error("invalid competitor ID: {token}")]
    InvalidCompetitor { token: String },
}

/// A competitor's bib number as it appears in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(u32);

impl CompetitorId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompetitorId {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self).map_err(|_| FormatError::InvalidCompetitor {
            token: s.to_string(),
        })
    }
}

impl From<u32> for CompetitorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
