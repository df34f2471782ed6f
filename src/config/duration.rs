//! Human-readable duration strings (`"4s"`, `"1500ms"`, `"2m"`, `"1h"`).
//!
//! Sub-millisecond values use `us` or `ns` so that formatting a parsed value
//! and parsing it again yields the same `Duration`.
//!
//! Used by both the YAML loader (via [`serde_str`]) and the CLI value parser.

use std::time::Duration;

use crate::error::ConfigError;

/// Parses a duration string with one of the suffixes `ns`, `us`, `ms`, `s`,
/// `m`, `h`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the string has no known suffix or
/// the numeric part is not a non-negative integer.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidValue {
        field: "duration".to_string(),
        value: s.to_string(),
        expected: "an integer with suffix ns, us, ms, s, m or h".to_string(),
    };

    // Two-letter suffixes must be checked before `m` and `s`.
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_millis(n));
    }

    if let Some(us) = s.strip_suffix("us") {
        let n: u64 = us.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_micros(n));
    }

    if let Some(ns) = s.strip_suffix("ns") {
        let n: u64 = ns.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_nanos(n));
    }

    if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.trim().parse().map_err(|_| invalid())?;
        return n.checked_mul(3600).map(Duration::from_secs).ok_or_else(invalid);
    }

    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.trim().parse().map_err(|_| invalid())?;
        return n.checked_mul(60).map(Duration::from_secs).ok_or_else(invalid);
    }

    if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_secs(n));
    }

    Err(invalid())
}

/// Formats a duration in the largest unit that represents it exactly.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0ms".to_string();
    }
    let nanos = d.as_nanos();
    if nanos % 1_000_000 != 0 {
        return if nanos % 1000 == 0 {
            format!("{}us", nanos / 1000)
        } else {
            format!("{nanos}ns")
        };
    }
    let ms = d.as_millis();
    if ms % 3_600_000 == 0 {
        format!("{}h", ms / 3_600_000)
    } else if ms % 60_000 == 0 {
        format!("{}m", ms / 60_000)
    } else if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{ms}ms")
    }
}

/// Clap value parser wrapper around [`parse_duration`].
///
/// # Errors
///
/// Returns the `ConfigError` message as a string for clap to display.
pub fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

/// Serde adapter for `Duration` fields written as duration strings.
pub mod serde_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as e.g. `"4s"`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_duration(*d))
    }

    /// Deserializes from a duration string.
    ///
    /// # Errors
    ///
    /// Returns a custom error if the string is not a valid duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
