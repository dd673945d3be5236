use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use biathlon_cli::report::{self, ReportOptions};
use biathlon_cli::{Cli, Config, load_race_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries commentary and standings
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.settings.as_deref())
        .context("failed to load settings")?
        .with_paths(cli.config, cli.events);
    tracing::debug!(?config, "loaded settings");

    let race_config = load_race_config(&config.config_path)?;
    tracing::debug!(
        laps = race_config.laps,
        lap_len = race_config.lap_len,
        penalty_len = race_config.penalty_len,
        firing_lines = race_config.firing_lines,
        start = %race_config.start,
        start_delta = %race_config.start_delta,
        "loaded race configuration"
    );

    let options = ReportOptions {
        json: cli.json,
        quiet: cli.quiet,
        evaluate_at: cli.evaluate_at,
    };

    let mut stdout = std::io::stdout().lock();
    report::run(&mut stdout, &race_config, &config.events_path, options)
}
