use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_engine::{ApiSettings, PollSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILENAME: &str = "dashboard.ron";
const CONFIG_PATH_VAR: &str = "NEWS_DASHBOARD_CONFIG";
const BASE_URL_VAR: &str = "NEWS_DASHBOARD_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config {path:?}: {field} must be greater than zero")]
    Invalid { path: PathBuf, field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub progress_hide_delay_ms: u64,
    pub email_status_clear_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Directory holding `activities.json` and `dashboard.log`.
    pub data_dir: PathBuf,
    pub log_to_file: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 2000,
            progress_hide_delay_ms: 3000,
            email_status_clear_ms: 5000,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            data_dir: PathBuf::from("."),
            log_to_file: true,
        }
    }
}

impl DashboardConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self = ron::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let durations = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ];
        match durations.iter().find(|(_, value)| *value == 0) {
            Some(&(field, _)) => Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                field,
            }),
            None => Ok(()),
        }
    }

    /// Loads from `NEWS_DASHBOARD_CONFIG` (or `./dashboard.ron`) and applies
    /// the `NEWS_DASHBOARD_URL` override.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
        let mut config = Self::load(&path)?;
        if let Ok(url) = env::var(BASE_URL_VAR) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn progress_hide_delay(&self) -> Duration {
        Duration::from_millis(self.progress_hide_delay_ms)
    }

    pub fn email_status_clear_delay(&self) -> Duration {
        Duration::from_millis(self.email_status_clear_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.poll_settings().interval, Duration::from_millis(2000));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(base_url: "http://news.internal:8080", poll_interval_ms: 500)"#,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://news.internal:8080");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.email_status_clear_ms, 5000);
        assert_eq!(config.api_settings().base_url, "http://news.internal:8080");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(base_url: 42").unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(poll_interval_ms: 0)").unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "poll_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(request_timeout_ms: 0)").unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "request_timeout_ms",
                ..
            }
        ));
    }
}
