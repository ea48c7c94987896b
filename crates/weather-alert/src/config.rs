use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scheduler::Schedule;
use crate::source::DEFAULT_ENDPOINT;
use crate::thresholds::normalize;

/// Root configuration for the weather alert node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Weather API URL queried on every cycle
    pub endpoint_url: String,
    /// Seconds between alert checks
    pub alert_interval_secs: u64,
    /// Seconds between status updates
    pub update_interval_secs: u64,
    /// Upper bound on a single weather fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// Read weather JSON from this file instead of the API
    pub mock_data_path: Option<PathBuf>,
    /// Custom thresholds registered at startup
    pub thresholds: HashMap<String, f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            alert_interval_secs: 60,
            update_interval_secs: 60,
            fetch_timeout_secs: 10,
            mock_data_path: None,
            thresholds: HashMap::new(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint_url.trim().is_empty() && self.mock_data_path.is_none() {
            return Err(ConfigError::Invalid(
                "endpoint_url must be set when mock_data_path is absent".to_string(),
            ));
        }
        for (name, value) in [
            ("alert_interval_secs", self.alert_interval_secs),
            ("update_interval_secs", self.update_interval_secs),
            ("fetch_timeout_secs", self.fetch_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0", name)));
            }
        }
        // Names are case-insensitive; two spellings would share one entry
        let mut seen = HashSet::new();
        for (condition, threshold) in &self.thresholds {
            if !threshold.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "threshold for '{}' must be a finite number",
                    condition
                )));
            }
            if !seen.insert(normalize(condition)) {
                return Err(ConfigError::Invalid(format!(
                    "threshold for '{}' is listed more than once",
                    normalize(condition)
                )));
            }
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            alert_period: Duration::from_secs(self.alert_interval_secs),
            update_period: Duration::from_secs(self.update_interval_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
