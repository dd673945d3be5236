//! Event kind enums as the single source of truth for event codes.

use std::fmt;
use std::str::FromStr;

use crate::types::FormatError;

/// Inbound event kinds, as numbered in the race log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Registered,
    StartDrawn,
    OnStartLine,
    Started,
    OnFiringRange,
    TargetHit,
    LeftFiringRange,
    EnteredPenalty,
    LeftPenalty,
    LapEnded,
    CannotContinue,
}

impl EventKind {
    /// Every inbound kind in code order.
    pub const ALL: [Self; 11] = [
        Self::Registered,
        Self::StartDrawn,
        Self::OnStartLine,
        Self::Started,
        Self::OnFiringRange,
        Self::TargetHit,
        Self::LeftFiringRange,
        Self::EnteredPenalty,
        Self::LeftPenalty,
        Self::LapEnded,
        Self::CannotContinue,
    ];

    /// Numeric code used in the log.
    pub const fn code(self) -> u32 {
        match self {
            Self::Registered => 1,
            Self::StartDrawn => 2,
            Self::OnStartLine => 3,
            Self::Started => 4,
            Self::OnFiringRange => 5,
            Self::TargetHit => 6,
            Self::LeftFiringRange => 7,
            Self::EnteredPenalty => 8,
            Self::LeftPenalty => 9,
            Self::LapEnded => 10,
            Self::CannotContinue => 11,
        }
    }
}

impl TryFrom<u32> for EventKind {
    type Error = FormatError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(FormatError::UnknownKind { code })
    }
}

impl FromStr for EventKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u32 = s.parse().map_err(|_| FormatError::InvalidKind {
            token: s.to_string(),
        })?;
        Self::try_from(code)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outgoing events synthesised while interpreting the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutgoingKind {
    Disqualified,
    Finished,
}

impl OutgoingKind {
    pub const fn code(self) -> u32 {
        match self {
            Self::Disqualified => 32,
            Self::Finished => 33,
        }
    }
}

impl fmt::Display for OutgoingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
