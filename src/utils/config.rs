//! Configuration for default request options
//!
//! Stored as JSON. Values are in host milliseconds so a file reads the same
//! way the host's options object does.

use crate::api::types::PositionOptions;
use crate::core::constants::MAX_HOST_MILLIS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

/// Default options applied when a request does not supply its own
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Ask the host for its most accurate provider
    pub high_accuracy: bool,
    /// Request timeout (milliseconds); absent means wait indefinitely
    pub timeout_ms: Option<u64>,
    /// Maximum accepted age of a cached fix (milliseconds)
    pub maximum_age_ms: u64,
}

impl GeolocationConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        self.validate()?;
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Reject values the host would misinterpret
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms == 0 {
                return Err(ConfigError::InvalidParameter {
                    parameter: "timeout_ms".to_string(),
                    value: timeout_ms.to_string(),
                    reason: "a zero timeout fails every request; omit it to wait indefinitely"
                        .to_string(),
                });
            }
            check_host_range("timeout_ms", timeout_ms)?;
        }
        check_host_range("maximum_age_ms", self.maximum_age_ms)
    }

    pub fn to_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: self.timeout_ms.map(Duration::from_millis),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }
}

fn check_host_range(parameter: &str, value: u64) -> ConfigResult<()> {
    if value > MAX_HOST_MILLIS {
        return Err(ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: format!("must not exceed {} ms", MAX_HOST_MILLIS),
        });
    }
    Ok(())
}
