//! # Fineness Modulus
//!
//! `FM = Σ cumulative_retained(s) / 100` over the fixed standard sieves
//! 4.75, 2.36, 1.18, 0.6, 0.3, and 0.15 mm. Sieves outside that set are
//! ignored even when the sample was tested on them.
//!
//! The index is only meaningful for fine aggregate; whether to report it
//! is the caller's decision (see [`crate::summary::GradationSummary`]).

use crate::error::SieveError;
use crate::sieve::SieveSize;

/// Sieves contributing to the fineness modulus.
pub const FINENESS_SIEVES: [SieveSize; 6] = [
    SieveSize::from_table(4.75),
    SieveSize::from_table(2.36),
    SieveSize::from_table(1.18),
    SieveSize::from_table(0.6),
    SieveSize::from_table(0.3),
    SieveSize::from_table(0.15),
];

/// Fineness modulus of a sample from its cumulative-retained curve.
pub fn fineness_modulus(
    cumulative_retained: &[f64],
    sieves: &[SieveSize],
) -> Result<f64, SieveError> {
    if cumulative_retained.len() != sieves.len() {
        return Err(SieveError::LengthMismatch {
            what: "cumulative retained",
            expected: sieves.len(),
            actual: cumulative_retained.len(),
        });
    }

    let sum: f64 = sieves
        .iter()
        .zip(cumulative_retained)
        .filter(|(s, _)| FINENESS_SIEVES.iter().any(|f| f.matches(**s)))
        .map(|(_, c)| c)
        .sum();

    Ok(sum / 100.0)
}
