//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::Parser;

/// Biathlon race log processor.
///
/// Replays a race event log against a race configuration, printing commentary
/// for every event followed by the final standings.
#[derive(Debug, Parser)]
#[command(name = "biathlon", version, about, long_about = None)]
pub struct Cli {
    /// Race configuration document (JSON).
    pub config: Option<PathBuf>,

    /// Race event log, one event per line.
    pub events: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a settings file.
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Print the standings as JSON.
    #[arg(long)]
    pub json: bool,

    /// Suppress the event commentary.
    #[arg(short, long)]
    pub quiet: bool,

    /// Instant (HH:MM:SS.mmm) at which missed starts are judged.
    /// Defaults to the time of the last event.
    #[arg(long, value_parser = biathlon_core::clock::parse_clock)]
    pub evaluate_at: Option<NaiveTime>,
}
