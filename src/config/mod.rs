//! Cycle configuration
//!
//! Built-in defaults reproduce the reference timing: a dwell drawn uniformly
//! from `[4000ms, 6000ms)` and a 1ms poll interval, starting on red. A YAML
//! file may override any field; CLI flags are layered on top by the caller.
//!
//! ```yaml
//! min_dwell: 4s
//! max_dwell: 6s
//! poll_interval: 1ms
//! initial_phase: red
//! seed: 42
//! ```

pub mod duration;

use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::phase::Phase;

/// Default lower bound (inclusive) of the dwell draw.
pub const DEFAULT_MIN_DWELL: Duration = Duration::from_millis(4000);

/// Default upper bound (exclusive) of the dwell draw.
pub const DEFAULT_MAX_DWELL: Duration = Duration::from_millis(6000);

/// Default sleep between elapsed-time checks in the cycle loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Timing and start-up parameters for a [`PhaseCycler`](crate::phase::PhaseCycler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Shortest dwell a phase can be held (inclusive).
    #[serde(with = "duration::serde_str")]
    pub min_dwell: Duration,

    /// Dwell upper bound (exclusive).
    #[serde(with = "duration::serde_str")]
    pub max_dwell: Duration,

    /// Sleep between elapsed-time checks.
    #[serde(with = "duration::serde_str")]
    pub poll_interval: Duration,

    /// Phase held before the first transition.
    pub initial_phase: Phase,

    /// Fixed RNG seed for reproducible dwell draws; OS entropy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_dwell: DEFAULT_MIN_DWELL,
            max_dwell: DEFAULT_MAX_DWELL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_phase: Phase::Red,
            seed: None,
        }
    }
}

impl CycleConfig {
    /// Loads and validates a configuration file.
    ///
    /// Fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingFile` if `path` does not exist
    /// - `ConfigError::ParseError` if the file cannot be read or is not valid YAML
    /// - `ConfigError::InvalidValue` if the loaded values fail [`validate`](Self::validate)
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::MissingFile {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::ParseError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;

        let config = Self::from_yaml(&text).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        tracing::debug!(path = %path.display(), "loaded cycle configuration");
        Ok(config)
    }

    /// Parses and validates a configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed YAML or unknown fields,
    /// and `ConfigError::InvalidValue` for values that fail validation.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| ConfigError::ParseError {
                path: "<inline>".into(),
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the timing invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `min_dwell` is zero, either
    /// dwell bound is not a whole number of milliseconds,
    /// `max_dwell <= min_dwell`, `poll_interval` is zero, or
    /// `poll_interval > min_dwell`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        use duration::format_duration;

        if self.min_dwell.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "min_dwell".to_string(),
                value: format_duration(self.min_dwell),
                expected: "a non-zero duration".to_string(),
            });
        }
        // Dwells are drawn in whole milliseconds.
        for (field, value) in [("min_dwell", self.min_dwell), ("max_dwell", self.max_dwell)] {
            if value.subsec_nanos() % 1_000_000 != 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: format_duration(value),
                    expected: "a whole number of milliseconds".to_string(),
                });
            }
        }
        if self.max_dwell <= self.min_dwell {
            return Err(ConfigError::InvalidValue {
                field: "max_dwell".to_string(),
                value: format_duration(self.max_dwell),
                expected: format!(
                    "a duration greater than min_dwell ({})",
                    format_duration(self.min_dwell)
                ),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval".to_string(),
                value: format_duration(self.poll_interval),
                expected: "a non-zero duration".to_string(),
            });
        }
        if self.poll_interval > self.min_dwell {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval".to_string(),
                value: format_duration(self.poll_interval),
                expected: format!(
                    "a duration no longer than min_dwell ({})",
                    format_duration(self.min_dwell)
                ),
            });
        }
        Ok(())
    }

    /// The dwell draw range in whole milliseconds, `[min, max)`.
    #[must_use]
    pub fn dwell_range_ms(&self) -> Range<u64> {
        let to_ms = |d: Duration| u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        to_ms(self.min_dwell)..to_ms(self.max_dwell)
    }
}
