//! # Blend Errors
//!
//! Errors for caller mistakes in blend inputs. "No compliant blend" and
//! "fewer than two materials" are not errors; they surface as `None` in
//! the search report.

use sieve_core::{SieveError, SieveSize};
use thiserror::Error;

/// Error type for `sieve-blend`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlendError {
    /// The search step must be at least 1 and divide 100 evenly.
    #[error("invalid search step {0}: must be >= 1 and divide 100")]
    InvalidStep(u32),

    /// A proportion vector has the wrong number of entries.
    #[error("expected {expected} proportions (one per material), got {actual}")]
    ProportionCount {
        /// Number of materials.
        expected: usize,
        /// Number of proportions supplied.
        actual: usize,
    },

    /// A proportion vector does not sum to 100.
    #[error("proportions sum to {0}, expected 100")]
    ProportionSum(u32),

    /// A material's passing value is not a percentage.
    #[error("material {material:?}: passing at {sieve} must be within [0, 100], got {value}")]
    InvalidPassing {
        /// Material name.
        material: String,
        /// Sieve carrying the bad value.
        sieve: SieveSize,
        /// The rejected value.
        value: f64,
    },

    /// Error from the core engine.
    #[error(transparent)]
    Core(#[from] SieveError),
}
