use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunables for a game session. Every field has a default, so config files
/// only need the values they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub base_time_secs: f64,
    pub min_base_time_secs: f64,
    pub tick_interval_ms: u64,
    pub history_capacity: usize,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_time_secs: DEFAULT_BASE_TIME_SECS,
            min_base_time_secs: DEFAULT_MIN_BASE_TIME_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Seconds of round time consumed per scheduler tick
    pub fn tick_slice_secs(&self) -> f64 {
        self.tick_interval_ms as f64 / 1000.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be positive".into()));
        }
        if !self.min_base_time_secs.is_finite() || self.min_base_time_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_base_time_secs must be positive, got {}",
                self.min_base_time_secs
            )));
        }
        if !self.base_time_secs.is_finite() || self.base_time_secs < self.min_base_time_secs {
            return Err(ConfigError::Invalid(format!(
                "base_time_secs ({}) must be at least min_base_time_secs ({})",
                self.base_time_secs, self.min_base_time_secs
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Loads a `.json` or `.ron` config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config = match extension.as_str() {
            "json" => Self::from_json(&text)?,
            "ron" => Self::from_ron(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        info!(path = %path.display(), "Loaded session config");
        Ok(config)
    }
}
