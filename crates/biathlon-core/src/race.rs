//! Race log interpretation.
//!
//! Folds the ordered event stream into one [`Competitor`] record per
//! registered competitor. Every processed event, and every outgoing event the
//! interpretation produces, is recorded as a [`Narration`] entry so callers can
//! print commentary separately from the final standings.
//!
//! # Algorithm Summary
//!
//! 1. Events for competitors without a prior registration are dropped
//! 2. Each event mutates only its competitor's record (laps, penalty loops,
//!    shooting tallies, status)
//! 3. After the stream, competitors that never started are disqualified once
//!    their start window has passed at the evaluation instant

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveTime};

use crate::clock;
use crate::competitor::{Competitor, LapClose, Status};
use crate::config::RaceConfig;
use crate::event::EventRecord;
use crate::event_type::{EventKind, OutgoingKind};
use crate::types::CompetitorId;

/// How late after the drawn start time a competitor may cross the start line.
pub fn start_tolerance() -> Duration {
    Duration::seconds(1)
}

/// Whether `at` is past the start window opened by `planned`.
///
/// Compares the signed offset so a window straddling midnight does not wrap.
fn past_start_window(at: NaiveTime, planned: NaiveTime) -> bool {
    at - planned > start_tolerance()
}

/// What a narration entry reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Registered,
    StartDrawn { start: String },
    OnStartLine,
    Started,
    Disqualified,
    OnFiringRange { range: String },
    TargetHit { target: String },
    LeftFiringRange,
    EnteredPenalty,
    LeftPenalty,
    LapEnded,
    Finished,
    CannotContinue { reason: String },
    /// A synthesised outgoing event, printed in log form.
    Outgoing(OutgoingKind),
}

/// One line of race commentary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub time: NaiveTime,
    pub competitor: CompetitorId,
    pub entry: Entry,
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.competitor;
        write!(f, "[{}] ", clock::format_instant(self.time))?;
        match &self.entry {
            Entry::Registered => write!(f, "The competitor({id}) registered"),
            Entry::StartDrawn { start } => write!(
                f,
                "The start time for the competitor({id}) was set by a draw to {start}"
            ),
            Entry::OnStartLine => write!(f, "The competitor({id}) is on the start line"),
            Entry::Started => write!(f, "The competitor({id}) has started"),
            Entry::Disqualified => write!(f, "The competitor({id}) is disqualified"),
            Entry::OnFiringRange { range } => {
                write!(f, "The competitor({id}) is on the firing range({range})")
            }
            Entry::TargetHit { target } => {
                write!(f, "The target({target}) has been hit by competitor({id})")
            }
            Entry::LeftFiringRange => write!(f, "The competitor({id}) left the firing range"),
            Entry::EnteredPenalty => write!(f, "The competitor({id}) entered the penalty laps"),
            Entry::LeftPenalty => write!(f, "The competitor({id}) left the penalty laps"),
            Entry::LapEnded => write!(f, "The competitor({id}) ended the main lap"),
            Entry::Finished => write!(f, "The competitor({id}) has finished"),
            Entry::CannotContinue { reason } => {
                write!(f, "The competitor({id}) can`t continue: {reason}")
            }
            Entry::Outgoing(kind) => write!(f, "{kind} {id}"),
        }
    }
}

/// Final state of a race: every registered competitor plus the commentary.
#[derive(Debug, Clone, Default)]
pub struct RaceOutcome {
    pub competitors: BTreeMap<CompetitorId, Competitor>,
    pub narration: Vec<Narration>,
}

/// Incremental interpreter over an ordered event stream.
#[derive(Debug)]
pub struct Race {
    laps: u32,
    competitors: BTreeMap<CompetitorId, Competitor>,
    narration: Vec<Narration>,
    last_event_at: Option<NaiveTime>,
}

impl Race {
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            laps: config.laps,
            competitors: BTreeMap::new(),
            narration: Vec::new(),
            last_event_at: None,
        }
    }

    fn narrate(&mut self, time: NaiveTime, competitor: CompetitorId, entry: Entry) {
        self.narration.push(Narration {
            time,
            competitor,
            entry,
        });
    }

    fn disqualify(&mut self, time: NaiveTime, competitor: CompetitorId) {
        self.narrate(time, competitor, Entry::Disqualified);
        self.narrate(
            time,
            competitor,
            Entry::Outgoing(OutgoingKind::Disqualified),
        );
    }

    /// Applies one event. Events must arrive in non-decreasing time order.
    #[allow(clippy::too_many_lines)]
    pub fn apply(&mut self, event: &EventRecord) {
        let id = event.competitor;
        let at = event.time;

        if event.kind == EventKind::Registered {
            self.competitors
                .entry(id)
                .or_insert_with(|| Competitor::new(id, at));
        }

        let laps = self.laps;
        let Some(competitor) = self.competitors.get_mut(&id) else {
            tracing::debug!(competitor = %id, kind = %event.kind, "dropping event for unregistered competitor");
            return;
        };
        self.last_event_at = Some(at);
        tracing::debug!(competitor = %id, kind = %event.kind, "applying event");

        let mut disqualified = false;
        let mut finished = false;

        let entry = match event.kind {
            EventKind::Registered => Entry::Registered,
            EventKind::StartDrawn => {
                match clock::parse_clock(&event.payload) {
                    Ok(start) => competitor.planned_start = Some(start),
                    Err(error) => {
                        tracing::warn!(competitor = %id, %error, "ignoring unparsable start time");
                    }
                }
                Entry::StartDrawn {
                    start: event.payload.clone(),
                }
            }
            EventKind::OnStartLine => Entry::OnStartLine,
            EventKind::Started => {
                competitor.start(at);
                let late = competitor
                    .planned_start
                    .is_none_or(|planned| past_start_window(at, planned));
                if late {
                    disqualified = competitor.transition(Status::Disqualified);
                }
                Entry::Started
            }
            EventKind::OnFiringRange => {
                match event.payload.parse() {
                    Ok(range) => competitor.firing_range = Some(range),
                    Err(error) => {
                        tracing::warn!(competitor = %id, %error, "ignoring unparsable firing range");
                    }
                }
                Entry::OnFiringRange {
                    range: event.payload.clone(),
                }
            }
            EventKind::TargetHit => {
                competitor.record_hit();
                Entry::TargetHit {
                    target: event.payload.clone(),
                }
            }
            EventKind::LeftFiringRange => Entry::LeftFiringRange,
            EventKind::EnteredPenalty => {
                competitor.enter_penalty(at);
                Entry::EnteredPenalty
            }
            EventKind::LeftPenalty => {
                competitor.leave_penalty(at);
                Entry::LeftPenalty
            }
            EventKind::LapEnded => {
                if competitor.close_lap(at, laps) == LapClose::RaceDistance {
                    finished = competitor.transition(Status::Finished);
                }
                Entry::LapEnded
            }
            EventKind::CannotContinue => {
                if competitor.transition(Status::NotFinished) {
                    competitor.dnf_reason = Some(event.payload.clone());
                }
                Entry::CannotContinue {
                    reason: event.payload.clone(),
                }
            }
        };

        // A finish is announced before the lap-end that caused it
        if finished {
            self.narrate(at, id, Entry::Outgoing(OutgoingKind::Finished));
            self.narrate(at, id, Entry::Finished);
        }
        self.narrate(at, id, entry);
        if disqualified {
            self.disqualify(at, id);
        }
    }

    /// Runs the start-window post-pass and returns the outcome.
    ///
    /// `evaluated_at` is the instant the start windows are judged against;
    /// when `None`, the time of the last applied event is used.
    pub fn finish(mut self, evaluated_at: Option<NaiveTime>) -> RaceOutcome {
        let evaluated_at = evaluated_at.or(self.last_event_at);

        if let Some(now) = evaluated_at {
            let mut expired = Vec::new();
            for competitor in self.competitors.values_mut() {
                if competitor.status != Status::NotStarted {
                    continue;
                }
                let Some(planned) = competitor.planned_start else {
                    continue;
                };
                if past_start_window(now, planned)
                    && competitor.transition(Status::Disqualified)
                {
                    expired.push((planned + start_tolerance(), competitor.id));
                }
            }

            for (deadline, id) in expired {
                tracing::debug!(competitor = %id, "start window elapsed");
                self.disqualify(deadline, id);
            }
        }

        RaceOutcome {
            competitors: self.competitors,
            narration: self.narration,
        }
    }
}

/// Interprets a whole event stream in one pass.
pub fn process_events(
    events: &[EventRecord],
    config: &RaceConfig,
    evaluated_at: Option<NaiveTime>,
) -> RaceOutcome {
    let mut race = Race::new(config);
    for event in events {
        race.apply(event);
    }
    race.finish(evaluated_at)
}
