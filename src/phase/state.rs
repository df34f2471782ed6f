//! Phase values and the shared current-phase register.
//!
//! The register has a single writer (the cycle loop) and any number of
//! readers. It is an `AtomicU8`, so readers always see a whole value; they
//! may see the previous phase for an instant after a flip.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// One of the two simulated signal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    /// Stop.
    #[default]
    Red = 0,
    /// Go.
    Green = 1,
}

impl Phase {
    /// Returns the other phase.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    /// Lowercase name, also used as the metrics label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        if raw == Self::Green as u8 {
            Self::Green
        } else {
            Self::Red
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown phase name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phase '{0}' (expected red or green)")]
pub struct ParsePhaseError(String);

impl FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            _ => Err(ParsePhaseError(s.to_string())),
        }
    }
}

/// Lock-free current-phase register.
pub struct PhaseRegister {
    raw: AtomicU8,
}

impl PhaseRegister {
    /// Creates a register holding `initial`.
    #[must_use]
    pub const fn new(initial: Phase) -> Self {
        Self {
            raw: AtomicU8::new(initial as u8),
        }
    }

    /// Returns a snapshot of the current phase.
    #[must_use]
    pub fn load(&self) -> Phase {
        Phase::from_u8(self.raw.load(Ordering::SeqCst))
    }

    /// Overwrites the current phase.
    pub fn store(&self, phase: Phase) {
        self.raw.store(phase as u8, Ordering::SeqCst);
    }

    /// Flips the phase and returns the new value.
    ///
    /// Only the cycle loop writes, so load-then-store cannot lose an update.
    pub fn toggle(&self) -> Phase {
        let next = self.load().toggled();
        self.store(next);
        next
    }
}

impl Default for PhaseRegister {
    fn default() -> Self {
        Self::new(Phase::default())
    }
}

impl fmt::Debug for PhaseRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PhaseRegister").field(&self.load()).finish()
    }
}
