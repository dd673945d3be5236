//! Race log records and line parsing.

use std::io::BufRead;
use std::str::FromStr;

use chrono::NaiveTime;

use crate::clock;
use crate::event_type::EventKind;
use crate::types::{CompetitorId, FormatError};

/// One parsed line of the race log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// When the event occurred on the race clock.
    pub time: NaiveTime,
    /// What happened.
    pub kind: EventKind,
    /// Who it happened to.
    pub competitor: CompetitorId,
    /// Trailing free text, words rejoined with single spaces. Empty when absent.
    pub payload: String,
}

impl EventRecord {
    /// Parses a line of the form `[HH:MM:SS.mmm] <kind> <competitor> [payload...]`.
    pub fn parse(line: &str) -> Result<Self, FormatError> {
        let (head, body) = line
            .split_once("] ")
            .ok_or_else(|| FormatError::MissingBody {
                line: line.to_string(),
            })?;

        let time = clock::parse_instant(&format!("{head}]"))?;

        let fields: Vec<&str> = body.split_whitespace().collect();
        let [kind, competitor, rest @ ..] = fields.as_slice() else {
            return Err(FormatError::MissingFields {
                body: body.to_string(),
            });
        };

        Ok(Self {
            time,
            kind: kind.parse()?,
            competitor: competitor.parse()?,
            payload: rest.join(" "),
        })
    }
}

impl FromStr for EventRecord {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A log line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the source.
    pub line_number: usize,
    pub error: FormatError,
}

/// Result of reading a whole race log.
#[derive(Debug, Default)]
pub struct ParsedLog {
    /// Successfully parsed events in file order.
    pub events: Vec<EventRecord>,
    /// Lines skipped because they were malformed.
    pub rejected: Vec<RejectedLine>,
}

/// Reads a race log, skipping blank lines and collecting malformed ones.
///
/// Only I/O failures abort the read; a bad line is recorded in
/// [`ParsedLog::rejected`] and parsing continues.
pub fn parse_log<R: BufRead>(reader: R) -> std::io::Result<ParsedLog> {
    let mut parsed = ParsedLog::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match EventRecord::parse(&line) {
            Ok(event) => parsed.events.push(event),
            Err(error) => {
                tracing::warn!(line = idx + 1, %error, "skipping malformed event");
                parsed.rejected.push(RejectedLine {
                    line_number: idx + 1,
                    error,
                });
            }
        }
    }

    Ok(parsed)
}
