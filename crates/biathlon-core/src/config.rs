//! Race configuration document.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Deserializer};

use crate::clock;

/// Parameters of one race, read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    /// Number of main laps each competitor must complete.
    pub laps: u32,
    /// Length of one main lap, in metres.
    pub lap_len: u32,
    /// Length of one penalty loop, in metres.
    pub penalty_len: u32,
    /// Number of firing lines per lap.
    pub firing_lines: u32,
    /// Scheduled start of the first slot.
    #[serde(deserialize_with = "deserialize_clock")]
    pub start: NaiveTime,
    /// Interval between start slots.
    #[serde(deserialize_with = "deserialize_interval")]
    pub start_delta: Duration,
}

fn deserialize_clock<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    clock::parse_clock(&s).map_err(serde::de::Error::custom)
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    clock::parse_interval(&s).map_err(serde::de::Error::custom)
}
