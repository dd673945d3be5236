//! Race-clock codec.
//!
//! Instants on the race clock are times of day with millisecond precision and
//! no date component. Durations are printed with an unbounded hour field so
//! totals beyond one day render as e.g. `25:12:37.128`.

use std::sync::LazyLock;

use chrono::{Duration, NaiveTime};
use regex::Regex;

use crate::types::FormatError;

/// Fixed-width clock pattern. The millisecond group is optional so intervals
/// from the configuration document can omit it.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})(?:\.(\d{3}))?$").unwrap());

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Splits a clock string into hour, minute, second and millisecond fields.
fn clock_fields(text: &str, require_millis: bool) -> Result<(u32, u32, u32, u32), FormatError> {
    let invalid = || FormatError::InvalidClock {
        input: text.to_string(),
    };

    let caps = CLOCK_RE.captures(text).ok_or_else(invalid)?;
    if require_millis && caps.get(4).is_none() {
        return Err(invalid());
    }

    let field = |i: usize| -> Result<u32, FormatError> {
        caps.get(i)
            .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| invalid()))
    };

    Ok((field(1)?, field(2)?, field(3)?, field(4)?))
}

/// Parses an unbracketed `HH:MM:SS.mmm` clock string into a race-clock instant.
pub fn parse_clock(text: &str) -> Result<NaiveTime, FormatError> {
    let (h, m, s, ms) = clock_fields(text, true)?;
    NaiveTime::from_hms_milli_opt(h, m, s, ms).ok_or_else(|| FormatError::InvalidClock {
        input: text.to_string(),
    })
}

/// Parses a bracketed `[HH:MM:SS.mmm]` timestamp as found at the head of a log line.
pub fn parse_instant(text: &str) -> Result<NaiveTime, FormatError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| FormatError::MissingBrackets {
            input: text.to_string(),
        })?;

    parse_clock(inner)
}

/// Parses an `HH:MM:SS` or `HH:MM:SS.mmm` interval into a duration.
///
/// Unlike [`parse_clock`], the hour field is not limited to a single day.
pub fn parse_interval(text: &str) -> Result<Duration, FormatError> {
    let (h, m, s, ms) = clock_fields(text, false)?;
    if m > 59 || s > 59 {
        return Err(FormatError::InvalidClock {
            input: text.to_string(),
        });
    }

    Ok(Duration::hours(i64::from(h))
        + Duration::minutes(i64::from(m))
        + Duration::seconds(i64::from(s))
        + Duration::milliseconds(i64::from(ms)))
}

/// Formats a race-clock instant as `HH:MM:SS.mmm`.
pub fn format_instant(t: NaiveTime) -> String {
    t.format("%H:%M:%S%.3f").to_string()
}

/// Formats a duration as `HH:MM:SS.mmm` without wrapping the hour field.
/// Negative durations are treated as zero.
pub fn format_duration(d: Duration) -> String {
    let ms = d.num_milliseconds().max(0);
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Returns the duration in fractional seconds at millisecond precision.
#[allow(clippy::cast_precision_loss)]
pub fn seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / MS_PER_SECOND as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_instant_accepts_bracketed_clock() {
        for input in ["[10:00:00.000]", "[09:30:01.005]", "[23:59:59.999]"] {
            let t = parse_instant(input).expect("should parse");
            assert_eq!(format!("[{}]", format_instant(t)), input);
        }
    }

    #[test]
    fn parse_instant_requires_brackets() {
        let err = parse_instant("10:00:00.000").unwrap_err();
        assert!(matches!(err, FormatError::MissingBrackets { .. }));

        assert!(parse_instant("[10:00:00.000").is_err());
        assert!(parse_instant("10:00:00.000]").is_err());
        assert!(parse_instant("[[10:00:00.000]]").is_err());
    }

    #[test]
    fn parse_instant_requires_millisecond_precision() {
        let err = parse_instant("[10:00:00]").unwrap_err();
        assert!(matches!(err, FormatError::InvalidClock { .. }));

        assert!(parse_instant("[10:00:00.00]").is_err());
        assert!(parse_instant("[1:00:00.000]").is_err());
    }

    #[test]
    fn parse_clock_rejects_out_of_range_fields() {
        assert!(parse_clock("24:00:00.000").is_err());
        assert!(parse_clock("10:60:00.000").is_err());
        assert!(parse_clock("10:00:60.000").is_err());
    }

    #[test]
    fn parse_interval_allows_missing_millis() {
        assert_eq!(parse_interval("00:00:30").unwrap(), Duration::seconds(30));
        assert_eq!(
            parse_interval("00:01:30.250").unwrap(),
            Duration::milliseconds(90_250)
        );
        assert!(parse_interval("00:61:00").is_err());
        assert!(parse_interval("30s").is_err());
    }

    #[test]
    fn format_duration_pads_fields() {
        let d = Duration::hours(1)
            + Duration::minutes(30)
            + Duration::seconds(45)
            + Duration::milliseconds(500);
        assert_eq!(format_duration(d), "01:30:45.500");
        assert_eq!(
            format_duration(Duration::seconds(45) + Duration::milliseconds(5)),
            "00:00:45.005"
        );
    }

    #[test]
    fn format_duration_does_not_wrap_hours() {
        let d = Duration::hours(25)
            + Duration::minutes(12)
            + Duration::seconds(37)
            + Duration::milliseconds(128);
        assert_eq!(format_duration(d), "25:12:37.128");
    }

    #[test]
    fn format_duration_negative_is_zero() {
        assert_eq!(format_duration(Duration::seconds(-5)), "00:00:00.000");
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "millisecond values are exact in f64")]
    fn seconds_keeps_milliseconds() {
        assert_eq!(seconds(Duration::milliseconds(1_500)), 1.5);
        assert_eq!(seconds(Duration::minutes(10)), 600.0);
    }
}
