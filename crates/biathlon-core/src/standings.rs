//! Result aggregation and ranking.
//!
//! Turns finished [`Competitor`] records into ranked [`Standing`] rows:
//! per-lap and penalty-loop speeds, total race time, and a deterministic
//! order (status group first, then total time among finishers, then id).

use std::cmp::Ordering;
use std::fmt;

use chrono::Duration;
use serde::Serialize;

use crate::clock;
use crate::competitor::{Competitor, Status};
use crate::config::RaceConfig;
use crate::types::CompetitorId;

/// Time and average speed over one stretch of course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStat {
    /// Duration formatted as `HH:MM:SS.mmm`.
    pub time: String,
    /// Metres per second.
    pub speed: f64,
}

impl SegmentStat {
    /// A stretch covered in no time reports zero speed.
    fn new(length: u32, duration: Duration) -> Self {
        let secs = clock::seconds(duration);
        let speed = if secs > 0.0 {
            f64::from(length) / secs
        } else {
            0.0
        };
        Self {
            time: clock::format_duration(duration),
            speed,
        }
    }
}

impl fmt::Display for SegmentStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {:.3}}}", self.time, self.speed)
    }
}

/// Stats for each completed lap, in lap order.
pub fn lap_stats(competitor: &Competitor, config: &RaceConfig) -> Vec<SegmentStat> {
    competitor
        .lap_durations
        .iter()
        .map(|&d| SegmentStat::new(config.lap_len, d))
        .collect()
}

/// Aggregate penalty-loop stat, present only when penalty time was served.
pub fn penalty_stat(competitor: &Competitor, config: &RaceConfig) -> Option<SegmentStat> {
    (competitor.total_penalty > Duration::zero())
        .then(|| SegmentStat::new(config.penalty_len, competitor.total_penalty))
}

/// Total race time of a finished competitor.
///
/// Measured from the actual start; a start later than the drawn slot adds
/// the lateness on top.
pub fn total_time(competitor: &Competitor) -> Option<Duration> {
    if competitor.status != Status::Finished {
        return None;
    }
    let started = competitor.actual_start?;
    let mut total = competitor.finished_at? - started;

    match competitor.planned_start {
        Some(planned) if started > planned => total += started - planned,
        _ => {}
    }
    Some(total)
}

/// Standings order between two competitors.
pub fn compare(a: &Competitor, b: &Competitor) -> Ordering {
    a.status
        .priority()
        .cmp(&b.status.priority())
        .then_with(|| {
            if a.status == Status::Finished && b.status == Status::Finished {
                total_time(a).cmp(&total_time(b))
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// One row of the final standings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub competitor: CompetitorId,
    pub status: Status,
    /// Formatted total time, for finishers only.
    pub total_time: Option<String>,
    /// One slot per configured lap; `None` for laps never completed.
    pub laps: Vec<Option<SegmentStat>>,
    pub penalty: Option<SegmentStat>,
    pub hits: u32,
    pub shots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnf_reason: Option<String>,
}

impl Standing {
    pub fn new(competitor: &Competitor, config: &RaceConfig) -> Self {
        let completed = lap_stats(competitor, config);
        let slots = usize::try_from(config.laps)
            .unwrap_or(usize::MAX)
            .max(completed.len());
        let mut laps: Vec<Option<SegmentStat>> = completed.into_iter().map(Some).collect();
        laps.resize(slots, None);

        Self {
            competitor: competitor.id,
            status: competitor.status,
            total_time: total_time(competitor).map(clock::format_duration),
            laps,
            penalty: penalty_stat(competitor, config),
            hits: competitor.hits,
            shots: competitor.shots,
            dnf_reason: competitor.dnf_reason.clone(),
        }
    }
}

fn write_cell(f: &mut fmt::Formatter<'_>, cell: Option<&SegmentStat>) -> fmt::Result {
    match cell {
        Some(stat) => write!(f, "{stat}"),
        None => write!(f, "{{,}}"),
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.total_time.as_deref().unwrap_or(self.status.as_str());
        write!(f, "[{status}] {} [", self.competitor)?;
        for (i, lap) in self.laps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_cell(f, lap.as_ref())?;
        }
        write!(f, "] ")?;
        write_cell(f, self.penalty.as_ref())?;
        write!(f, " {}/{}", self.hits, self.shots)
    }
}

/// Ranks competitors and derives their standings rows.
///
/// The input is only read, so ranking the same records twice gives the same rows.
pub fn standings<'a, I>(competitors: I, config: &RaceConfig) -> Vec<Standing>
where
    I: IntoIterator<Item = &'a Competitor>,
{
    let mut ranked: Vec<&Competitor> = competitors.into_iter().collect();
    ranked.sort_by(|a, b| compare(a, b));
    ranked
        .into_iter()
        .map(|c| Standing::new(c, config))
        .collect()
}
