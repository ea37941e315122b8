//! Countdown configuration: due-soon threshold and refresh cadence.

use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_DUE_SOON_THRESHOLD_SECS: u64 = 24 * 60 * 60;
const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

/// Countdown configuration.
///
/// Missing fields fall back to the defaults (24h threshold, 60s refresh).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountdownConfig {
    /// Upper bound (exclusive) of the DueSoon bucket.
    pub due_soon_threshold_secs: u64,

    /// Interval between render passes after the initial one.
    pub refresh_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            due_soon_threshold_secs: DEFAULT_DUE_SOON_THRESHOLD_SECS,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl CountdownConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.due_soon_threshold_secs == 0 {
            return Err(ConfigError::InvalidField {
                field: "due_soon_threshold_secs",
                reason: "must be greater than zero",
            });
        }
        // TimeDelta caps at i64::MAX milliseconds
        if self.due_soon_threshold_secs > (i64::MAX / 1000) as u64 {
            return Err(ConfigError::InvalidField {
                field: "due_soon_threshold_secs",
                reason: "out of range",
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidField {
                field: "refresh_interval_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    pub fn due_soon_threshold(&self) -> TimeDelta {
        TimeDelta::seconds(self.due_soon_threshold_secs as i64)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
