//! Report command: replays the race log and prints the standings.
//!
//! Output is the event commentary (unless suppressed) followed by the final
//! standings, either human-readable or as JSON.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use biathlon_core::{RaceConfig, Standing, parse_log, process_events, standings};
use chrono::NaiveTime;

/// Output switches for the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print standings as JSON instead of text.
    pub json: bool,
    /// Skip the event commentary.
    pub quiet: bool,
    /// Instant at which missed starts are judged.
    pub evaluate_at: Option<NaiveTime>,
}

/// Formats the human-readable standings block.
pub fn format_report(rows: &[Standing]) -> String {
    let mut output = String::new();
    writeln!(output, "Final Results:").unwrap();
    for row in rows {
        writeln!(output, "{row}").unwrap();
    }
    output
}

/// Formats standings as JSON.
pub fn format_report_json(rows: &[Standing]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Runs the report for the log at `events_path`.
pub fn run<W: Write>(
    writer: &mut W,
    config: &RaceConfig,
    events_path: &Path,
    options: ReportOptions,
) -> Result<()> {
    let file = File::open(events_path)
        .with_context(|| format!("failed to open events file {}", events_path.display()))?;
    let log = parse_log(BufReader::new(file))
        .with_context(|| format!("failed to read events from {}", events_path.display()))?;

    if !log.rejected.is_empty() {
        tracing::warn!(count = log.rejected.len(), "some event lines were skipped");
    }
    tracing::debug!(events = log.events.len(), "parsed race log");

    let outcome = process_events(&log.events, config, options.evaluate_at);
    let rows = standings(outcome.competitors.values(), config);

    if options.json {
        writeln!(writer, "{}", format_report_json(&rows)?)?;
        return Ok(());
    }

    if !options.quiet {
        for line in &outcome.narration {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;
    }
    write!(writer, "{}", format_report(&rows))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use biathlon_core::clock;
    use chrono::Duration;
    use insta::assert_snapshot;

    fn config() -> RaceConfig {
        RaceConfig {
            laps: 2,
            lap_len: 3651,
            penalty_len: 50,
            firing_lines: 1,
            start: clock::parse_clock("09:30:00.000").unwrap(),
            start_delta: Duration::seconds(30),
        }
    }

    const LOG: &str = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1
[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:34.650] 6 1 2
[09:49:35.937] 6 1 4
[09:49:37.364] 6 1 5
[09:49:38.339] 7 1
[09:49:55.915] 8 1
[09:51:48.391] 9 1
[09:59:03.872] 10 1
[09:59:03.872] 11 1 Lost in the forest
";

    fn write_log(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("events");
        std::fs::write(&path, LOG).unwrap();
        path
    }

    #[test]
    fn report_prints_commentary_then_standings() {
        let temp = tempfile::tempdir().unwrap();
        let events = write_log(temp.path());

        let mut output = Vec::new();
        run(&mut output, &config(), &events, ReportOptions::default()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        [09:05:59.867] The competitor(1) registered
        [09:15:00.841] The start time for the competitor(1) was set by a draw to 09:30:00.000
        [09:29:45.734] The competitor(1) is on the start line
        [09:30:01.005] The competitor(1) has started
        [09:30:01.005] The competitor(1) is disqualified
        [09:30:01.005] 32 1
        [09:49:31.659] The competitor(1) is on the firing range(1)
        [09:49:33.123] The target(1) has been hit by competitor(1)
        [09:49:34.650] The target(2) has been hit by competitor(1)
        [09:49:35.937] The target(4) has been hit by competitor(1)
        [09:49:37.364] The target(5) has been hit by competitor(1)
        [09:49:38.339] The competitor(1) left the firing range
        [09:49:55.915] The competitor(1) entered the penalty laps
        [09:51:48.391] The competitor(1) left the penalty laps
        [09:59:03.872] The competitor(1) ended the main lap
        [09:59:03.872] The competitor(1) can`t continue: Lost in the forest

        Final Results:
        [Disqualified] 1 [{00:29:02.867, 2.095}, {,}] {00:01:52.476, 0.445} 4/4
        ");
    }

    #[test]
    fn quiet_report_prints_only_standings() {
        let temp = tempfile::tempdir().unwrap();
        let events = write_log(temp.path());

        let options = ReportOptions {
            quiet: true,
            ..ReportOptions::default()
        };
        let mut output = Vec::new();
        run(&mut output, &config(), &events, options).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        Final Results:
        [Disqualified] 1 [{00:29:02.867, 2.095}, {,}] {00:01:52.476, 0.445} 4/4
        ");
    }

    #[test]
    fn json_report_lists_rows() {
        let temp = tempfile::tempdir().unwrap();
        let events = write_log(temp.path());

        let options = ReportOptions {
            json: true,
            ..ReportOptions::default()
        };
        let mut output = Vec::new();
        run(&mut output, &config(), &events, options).unwrap();

        let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let row = &rows[0];
        assert_eq!(row["competitor"], 1);
        assert_eq!(row["status"], "Disqualified");
        assert_eq!(row["total_time"], serde_json::Value::Null);
        assert_eq!(row["laps"][0]["time"], "00:29:02.867");
        assert_eq!(row["laps"][1], serde_json::Value::Null);
        assert_eq!(row["penalty"]["time"], "00:01:52.476");
        assert_eq!(row["hits"], 4);
        assert_eq!(row["shots"], 4);
    }

    #[test]
    fn missing_events_file_errors() {
        let temp = tempfile::tempdir().unwrap();
        let mut output = Vec::new();
        let err = run(
            &mut output,
            &config(),
            &temp.path().join("absent"),
            ReportOptions::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("failed to open events file"));
        assert!(output.is_empty());
    }

    #[test]
    fn empty_standings_print_header_only() {
        assert_eq!(format_report(&[]), "Final Results:\n");
    }
}
