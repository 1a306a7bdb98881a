//! # Error Types
//!
//! Errors raised by the gradation engine. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! Expected domain outcomes are never errors: a zero-weight sample, a
//! missing 0.6 mm sieve, or a grading with no table in the library all
//! produce ordinary values. `SieveError` covers only precondition
//! violations (mismatched sequence lengths) and input validation that a
//! caller performs before handing data to the calculator.

use thiserror::Error;

/// Top-level error type for `sieve-core`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SieveError {
    /// Two sequences that must be aligned 1:1 (or 1:1 plus a pan) differ in length.
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Which input was misaligned (e.g. "weights").
        what: &'static str,
        /// Length implied by the sieve list.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A weight entry was negative.
    #[error("weight at index {index} is negative: {value}")]
    NegativeWeight {
        /// Position in the series (the pan is the last index).
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// A weight entry was NaN or infinite.
    #[error("weight at index {index} is not a finite number")]
    NonFiniteWeight {
        /// Position in the series.
        index: usize,
    },

    /// Every weight is finite but their sum is not.
    #[error("total sample weight is not a finite number")]
    NonFiniteTotal,

    /// A weight series must hold at least the pan entry.
    #[error("weight series is empty; at least the pan entry is required")]
    EmptyWeights,

    /// Sieve openings must be finite and strictly positive.
    #[error("invalid sieve size: {0} mm")]
    InvalidSieveSize(f64),

    /// A passing band must satisfy `0 <= min <= max <= 100`.
    #[error("invalid passing limit [{min}, {max}]")]
    InvalidLimit {
        /// Lower bound (percent passing).
        min: f64,
        /// Upper bound (percent passing).
        max: f64,
    },

    /// A string did not name a known aggregate type or grading.
    #[error("unknown aggregate type: {0:?}")]
    UnknownAggregateType(String),

    /// A string did not name one of Zone I..IV.
    #[error("unknown grading zone: {0:?}")]
    UnknownZone(String),
}
