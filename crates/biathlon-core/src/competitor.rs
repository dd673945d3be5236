//! Per-competitor race record.

use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::types::CompetitorId;

/// Lifecycle status of a competitor.
///
/// `Finished`, `NotFinished` and `Disqualified` are terminal: once reached,
/// later events never change the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    NotStarted,
    Started,
    Finished,
    NotFinished,
    Disqualified,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Started => "Started",
            Self::Finished => "Finished",
            Self::NotFinished => "NotFinished",
            Self::Disqualified => "Disqualified",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::NotFinished | Self::Disqualified)
    }

    /// Position of the status group in the standings, lower first.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Finished => 0,
            Self::NotFinished => 1,
            Self::Started => 2,
            Self::Disqualified => 3,
            Self::NotStarted => 4,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What closing a lap did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapClose {
    /// No lap was open.
    Ignored,
    /// A lap closed and the next one began.
    NextLap,
    /// The last lap closed.
    RaceDistance,
}

/// Mutable race state of one registered competitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competitor {
    pub id: CompetitorId,
    pub status: Status,
    pub registered_at: NaiveTime,
    pub planned_start: Option<NaiveTime>,
    pub actual_start: Option<NaiveTime>,
    pub finished_at: Option<NaiveTime>,
    /// 1-based lap in progress; `laps + 1` once the distance is complete.
    pub current_lap: u32,
    pub lap_starts: Vec<NaiveTime>,
    pub lap_durations: Vec<Duration>,
    pub penalty_starts: Vec<NaiveTime>,
    pub penalty_ends: Vec<NaiveTime>,
    pub penalty_durations: Vec<Duration>,
    pub total_penalty: Duration,
    pub hits: u32,
    pub shots: u32,
    pub firing_range: Option<u32>,
    pub dnf_reason: Option<String>,
}

impl Competitor {
    /// Creates a record for a competitor registered at `registered_at`.
    pub fn new(id: CompetitorId, registered_at: NaiveTime) -> Self {
        Self {
            id,
            status: Status::NotStarted,
            registered_at,
            planned_start: None,
            actual_start: None,
            finished_at: None,
            current_lap: 0,
            lap_starts: Vec::new(),
            lap_durations: Vec::new(),
            penalty_starts: Vec::new(),
            penalty_ends: Vec::new(),
            penalty_durations: Vec::new(),
            total_penalty: Duration::zero(),
            hits: 0,
            shots: 0,
            firing_range: None,
            dnf_reason: None,
        }
    }

    /// Moves to `to` unless the current status is terminal.
    /// Returns whether the status changed.
    pub fn transition(&mut self, to: Status) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = to;
        true
    }

    /// Start time of the lap in progress, if any.
    pub fn open_lap(&self) -> Option<NaiveTime> {
        if self.lap_starts.len() > self.lap_durations.len() {
            self.lap_starts.last().copied()
        } else {
            None
        }
    }

    /// Entry time of the penalty loop in progress, if any.
    pub fn open_penalty(&self) -> Option<NaiveTime> {
        if self.penalty_starts.len() > self.penalty_ends.len() {
            self.penalty_starts.last().copied()
        } else {
            None
        }
    }

    /// Records crossing the start line at `at` and opens the first lap.
    pub(crate) fn start(&mut self, at: NaiveTime) {
        self.actual_start = Some(at);
        self.current_lap = 1;
        self.lap_starts.push(at);
        self.transition(Status::Started);
    }

    /// Closes the open lap at `at`, opening the next one while laps remain.
    pub(crate) fn close_lap(&mut self, at: NaiveTime, laps: u32) -> LapClose {
        let Some(lap_start) = self.open_lap() else {
            return LapClose::Ignored;
        };

        self.lap_durations.push(at - lap_start);
        self.current_lap += 1;

        if self.current_lap <= laps {
            self.lap_starts.push(at);
            LapClose::NextLap
        } else {
            self.finished_at = Some(at);
            LapClose::RaceDistance
        }
    }

    pub(crate) fn enter_penalty(&mut self, at: NaiveTime) {
        self.penalty_starts.push(at);
    }

    /// Closes the open penalty loop at `at`, returning the time spent in it.
    pub(crate) fn leave_penalty(&mut self, at: NaiveTime) -> Option<Duration> {
        let entered = self.open_penalty()?;
        let spent = at - entered;
        self.penalty_durations.push(spent);
        self.penalty_ends.push(at);
        self.total_penalty += spent;
        Some(spent)
    }

    /// Counts a hit. Every hit is also a shot fired.
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
        self.shots += 1;
    }
}
