// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration, loaded from and saved to JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading, saving or validating a [`RuntimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The JSON could not be parsed or produced.
    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),
    /// A field holds a value the driver cannot run with.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings of the frame driver and the logger.
///
/// Every field is optional in JSON; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Rate of the fixed simulation step, in steps per second.
    pub fixed_timestep_hz: f64,
    /// Upper bound on fixed steps run in a single frame.
    pub max_fixed_steps_per_frame: u32,
    /// Frame deltas longer than this are clamped, in milliseconds.
    pub max_frame_delta_ms: u64,
    /// Stop after this many frames. Runs until stopped when absent.
    pub frame_limit: Option<u64>,
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fixed_timestep_hz: 60.0,
            max_fixed_steps_per_frame: 5,
            max_frame_delta_ms: 250,
            frame_limit: None,
            log_filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Saves the configuration to a pretty-printed JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks that the driver can run with these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fixed_timestep()?;
        if self.max_fixed_steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "max_fixed_steps_per_frame must be at least 1".to_string(),
            ));
        }
        if self.max_frame_delta_ms == 0 {
            return Err(ConfigError::Invalid(
                "max_frame_delta_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Duration of one fixed simulation step.
    ///
    /// Fails when the rate is not positive or when one step does not fit a
    /// [`Duration`] between one nanosecond and its maximum.
    pub fn fixed_timestep(&self) -> Result<Duration, ConfigError> {
        let hz = self.fixed_timestep_hz;
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep_hz must be a positive number, got {hz}"
            )));
        }
        match Duration::try_from_secs_f64(1.0 / hz) {
            Ok(step) if !step.is_zero() => Ok(step),
            _ => Err(ConfigError::Invalid(format!(
                "fixed_timestep_hz {hz} does not give a representable step"
            ))),
        }
    }

    /// Longest frame delta the clock accepts.
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }
}
