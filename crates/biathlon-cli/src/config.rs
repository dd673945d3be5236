//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use biathlon_core::RaceConfig;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::value::{Uncased, UncasedStr};
use serde::{Deserialize, Serialize};

/// Settings file looked up in the working directory.
const SETTINGS_FILE: &str = "biathlon.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the race configuration document.
    pub config_path: PathBuf,
    /// Path to the race event log.
    pub events_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let dataset = PathBuf::from("sunny_5_skiers");
        Self {
            config_path: dataset.join("config.json"),
            events_path: dataset.join("events"),
        }
    }
}

impl Config {
    /// Loads settings, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(settings_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(SETTINGS_FILE));

        if let Some(path) = settings_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables (BIATHLON_*) win over files
        figment = figment.merge(Env::prefixed("BIATHLON_"));

        figment.extract()
    }

    /// Overrides the input paths with any given on the command line.
    #[must_use]
    pub fn with_paths(mut self, config: Option<PathBuf>, events: Option<PathBuf>) -> Self {
        if let Some(path) = config {
            self.config_path = path;
        }
        if let Some(path) = events {
            self.events_path = path;
        }
        self
    }
}

/// Maps `LAP_LEN`-style environment keys onto the document's `lapLen` keys.
fn camel_case_key(key: &UncasedStr) -> Uncased<'_> {
    let mut out = String::with_capacity(key.as_str().len());
    let mut upper = false;
    for ch in key.as_str().chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out.into()
}

/// Reads and decodes the race configuration document.
///
/// `BIATHLON_RACE_*` environment variables override document fields
/// (e.g. `BIATHLON_RACE_LAP_LEN`).
pub fn load_race_config(path: &Path) -> Result<RaceConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to open configuration file {}", path.display()))?;

    Figment::from(Json::string(&text))
        // Keys are already cased by the mapping; figment would lowercase them again
        .merge(
            Env::prefixed("BIATHLON_RACE_")
                .map(camel_case_key)
                .lowercase(false),
        )
        .extract()
        .with_context(|| format!("failed to parse configuration {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_sample_dataset() {
        let config = Config::default();
        assert_eq!(
            config.config_path,
            PathBuf::from("sunny_5_skiers").join("config.json")
        );
        assert_eq!(
            config.events_path,
            PathBuf::from("sunny_5_skiers").join("events")
        );
    }

    #[test]
    fn cli_paths_override_settings() {
        let config = Config::default().with_paths(Some(PathBuf::from("race.json")), None);
        assert_eq!(config.config_path, PathBuf::from("race.json"));
        assert_eq!(
            config.events_path,
            PathBuf::from("sunny_5_skiers").join("events")
        );
    }

    #[test]
    fn camel_case_key_maps_snake_keys() {
        assert_eq!(camel_case_key(UncasedStr::new("lap_len")).as_str(), "lapLen");
        assert_eq!(camel_case_key(UncasedStr::new("laps")).as_str(), "laps");
        assert_eq!(camel_case_key(UncasedStr::new("start_delta")).as_str(), "startDelta");
    }

    #[test]
    fn camel_case_key_maps_env_var_keys() {
        assert_eq!(camel_case_key(UncasedStr::new("LAP_LEN")).as_str(), "lapLen");
        assert_eq!(camel_case_key(UncasedStr::new("LAPS")).as_str(), "laps");
        assert_eq!(
            camel_case_key(UncasedStr::new("FIRING_LINES")).as_str(),
            "firingLines"
        );
    }

    #[test]
    fn load_race_config_reads_json_document() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"laps": 3, "lapLen": 4000, "penaltyLen": 150, "firingLines": 2,
                "start": "10:00:00.000", "startDelta": "00:01:30"}"#,
        )
        .unwrap();

        let config = load_race_config(&path).unwrap();
        assert_eq!(config.laps, 3);
        assert_eq!(config.lap_len, 4000);
        assert_eq!(config.firing_lines, 2);
    }

    #[test]
    fn load_race_config_missing_file_errors() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_race_config(&temp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to open configuration file"));
    }

    #[test]
    fn load_race_config_malformed_document_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ laps: two }").unwrap();

        let err = load_race_config(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse configuration"));
    }
}
