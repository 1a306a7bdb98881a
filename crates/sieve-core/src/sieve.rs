//! # Sieve Sizes
//!
//! Newtype wrapper for sieve openings in millimetres. A bare `f64` is never
//! used for a sieve: construction goes through [`SieveSize::new`], which
//! rejects zero, negative, and non-finite openings.
//!
//! Sieve identity is compared with a small absolute tolerance so that a
//! caller-supplied `0.6` matches the tabulated `0.6` even after a round trip
//! through JSON or YAML.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SieveError;

/// Absolute tolerance (mm) used when matching two sieve openings.
pub const SIEVE_MATCH_TOLERANCE: f64 = 1e-9;

/// A sieve opening in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SieveSize(f64);

impl SieveSize {
    /// Create a sieve size, rejecting non-positive or non-finite openings.
    pub fn new(mm: f64) -> Result<Self, SieveError> {
        if mm.is_finite() && mm > 0.0 {
            Ok(Self(mm))
        } else {
            Err(SieveError::InvalidSieveSize(mm))
        }
    }

    /// Constructor for the built-in tables. Callers outside this crate go
    /// through [`SieveSize::new`].
    pub(crate) const fn from_table(mm: f64) -> Self {
        Self(mm)
    }

    /// Opening in millimetres.
    pub fn mm(self) -> f64 {
        self.0
    }

    /// Whether two openings denote the same sieve.
    pub fn matches(self, other: SieveSize) -> bool {
        (self.0 - other.0).abs() < SIEVE_MATCH_TOLERANCE
    }

    /// Build a sieve list from raw millimetre values.
    pub fn list(values: &[f64]) -> Result<Vec<SieveSize>, SieveError> {
        values.iter().copied().map(SieveSize::new).collect()
    }
}

impl TryFrom<f64> for SieveSize {
    type Error = SieveError;

    fn try_from(mm: f64) -> Result<Self, Self::Error> {
        Self::new(mm)
    }
}

impl From<SieveSize> for f64 {
    fn from(sieve: SieveSize) -> f64 {
        sieve.0
    }
}

impl fmt::Display for SieveSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.0)
    }
}

/// Position of `target` in `sieves`, if present.
pub fn position_of(sieves: &[SieveSize], target: SieveSize) -> Option<usize> {
    sieves.iter().position(|s| s.matches(target))
}
