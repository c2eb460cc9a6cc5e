//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Unknown file keys are rejected so typos surface.
//!
//! | Key (file)             | Environment                     | Default |
//! |------------------------|---------------------------------|---------|
//! | `sheet_url`            | `TASKMIND_SHEET_URL`, `GOOGLE_SHEET_URL` | none |
//! | `request_timeout_secs` | `TASKMIND_REQUEST_TIMEOUT_SECS` | 10      |
//! | `quiet_period_ms`      | `TASKMIND_QUIET_PERIOD_MS`      | 2000    |
//! | `load_attempts`        | `TASKMIND_LOAD_ATTEMPTS`        | 3       |
//! | `load_backoff_ms`      | `TASKMIND_LOAD_BACKOFF_MS`      | 500     |

use crate::task::services::{RetryPolicy, SyncConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while assembling configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config file: {0}")]
    Parse(String),

    /// An environment variable holds a value of the wrong shape.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Assembled configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskmindConfig {
    /// Sheet web app endpoint. `None` means no remote store is configured.
    pub sheet_url: Option<String>,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Debounce and retry settings.
    pub sync: SyncConfig,
}

impl Default for TaskmindConfig {
    fn default() -> Self {
        Self {
            sheet_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sync: SyncConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    sheet_url: Option<String>,
    request_timeout_secs: Option<u64>,
    quiet_period_ms: Option<u64>,
    load_attempts: Option<u32>,
    load_backoff_ms: Option<u64>,
}

impl TaskmindConfig {
    /// Loads defaults, then `path` if given, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// environment value is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(file) => {
                let raw = std::fs::read_to_string(file).map_err(|err| ConfigError::Read {
                    path: file.to_path_buf(),
                    source: Arc::new(err),
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Parses a TOML document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let defaults = Self::default();
        Ok(Self {
            sheet_url: file.sheet_url.filter(|url| !url.trim().is_empty()),
            request_timeout: file
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            sync: SyncConfig {
                quiet_period: file
                    .quiet_period_ms
                    .map_or(defaults.sync.quiet_period, Duration::from_millis),
                retry: RetryPolicy::new(
                    file.load_attempts
                        .unwrap_or_else(|| defaults.sync.retry.max_attempts()),
                    file.load_backoff_ms
                        .map_or(defaults.sync.retry.initial_backoff(), Duration::from_millis),
                ),
            },
        })
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for non-numeric durations or
    /// attempt counts.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty("TASKMIND_SHEET_URL").or_else(|| non_empty("GOOGLE_SHEET_URL"))
        {
            self.sheet_url = Some(url);
        }
        if let Some(secs) = parse_env::<u64>(&non_empty, "TASKMIND_REQUEST_TIMEOUT_SECS")? {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = parse_env::<u64>(&non_empty, "TASKMIND_QUIET_PERIOD_MS")? {
            self.sync.quiet_period = Duration::from_millis(millis);
        }
        let attempts = parse_env::<u32>(&non_empty, "TASKMIND_LOAD_ATTEMPTS")?
            .unwrap_or_else(|| self.sync.retry.max_attempts());
        let backoff = parse_env::<u64>(&non_empty, "TASKMIND_LOAD_BACKOFF_MS")?
            .map_or(self.sync.retry.initial_backoff(), Duration::from_millis);
        self.sync.retry = RetryPolicy::new(attempts, backoff);
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    fn defaults_match_documented_values() {
        let config = TaskmindConfig::default();
        assert_eq!(config.sheet_url, None);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.sync.quiet_period, Duration::from_secs(2));
        assert_eq!(config.sync.retry.max_attempts(), 3);
        assert_eq!(config.sync.retry.initial_backoff(), Duration::from_millis(500));
    }

    #[rstest]
    fn toml_overrides_defaults() {
        let config = TaskmindConfig::from_toml_str(
            r#"
            sheet_url = "https://example.test/exec"
            quiet_period_ms = 250
            load_attempts = 5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.sheet_url.as_deref(), Some("https://example.test/exec"));
        assert_eq!(config.sync.quiet_period, Duration::from_millis(250));
        assert_eq!(config.sync.retry.max_attempts(), 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[rstest]
    fn toml_rejects_unknown_keys() {
        let result = TaskmindConfig::from_toml_str("sheet_uri = \"typo\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn env_overrides_file_values() {
        let env = env_of(&[
            ("TASKMIND_SHEET_URL", "https://env.test/exec"),
            ("TASKMIND_QUIET_PERIOD_MS", "100"),
        ]);
        let config = TaskmindConfig::from_toml_str("sheet_url = \"https://file.test\"")
            .and_then(|base| base.with_env(|key| env.get(key).cloned()))
            .expect("valid config");

        assert_eq!(config.sheet_url.as_deref(), Some("https://env.test/exec"));
        assert_eq!(config.sync.quiet_period, Duration::from_millis(100));
    }

    #[rstest]
    fn legacy_sheet_variable_is_a_fallback() {
        let env = env_of(&[("GOOGLE_SHEET_URL", "https://legacy.test/exec")]);
        let config = TaskmindConfig::default()
            .with_env(|key| env.get(key).cloned())
            .expect("valid config");
        assert_eq!(config.sheet_url.as_deref(), Some("https://legacy.test/exec"));
    }

    #[rstest]
    #[case("TASKMIND_QUIET_PERIOD_MS", "soon")]
    #[case("TASKMIND_LOAD_ATTEMPTS", "-1")]
    #[case("TASKMIND_REQUEST_TIMEOUT_SECS", "1.5")]
    fn env_rejects_malformed_numbers(#[case] key: &'static str, #[case] value: &str) {
        let env = env_of(&[(key, value)]);
        let result = TaskmindConfig::default().with_env(|k| env.get(k).cloned());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: rejected, .. }) if rejected == key
        ));
    }

    #[rstest]
    fn zero_attempts_is_clamped_to_one() {
        let config = TaskmindConfig::from_toml_str("load_attempts = 0").expect("valid config");
        assert_eq!(config.sync.retry.max_attempts(), 1);
    }
}
