//! Biathlon race processor CLI library.
//!
//! This crate provides the CLI interface around `biathlon-core`.

mod cli;
mod config;
pub mod report;

pub use cli::Cli;
pub use config::{Config, load_race_config};
