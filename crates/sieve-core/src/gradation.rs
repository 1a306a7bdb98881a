//! # Gradation Calculator
//!
//! Converts retained weights from a sieve stack into percent retained,
//! cumulative percent retained, and percent passing.
//!
//! ## Input contract
//!
//! A [`WeightSeries`] holds one weight per sieve (largest sieve first) plus a
//! trailing pan entry. Validation (no negative or non-finite entries, and a
//! finite total) happens once, in [`WeightSeries::new`]; [`calculate`] trusts
//! the series it is given and only checks that its length lines up with the
//! sieve list.
//!
//! ## Numerics
//!
//! Cumulative retained is computed from the running weight rather than by
//! summing rounded percentages, so it is non-decreasing and never exceeds
//! 100 even in floating point. Percent passing is `100 - cumulative`.

use serde::{Deserialize, Serialize};

use crate::error::SieveError;
use crate::sieve::SieveSize;

/// Validated retained weights: one per sieve, then the pan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct WeightSeries(Vec<f64>);

impl WeightSeries {
    /// Validate raw weights (grams). The last entry is the pan.
    pub fn new(weights: Vec<f64>) -> Result<Self, SieveError> {
        if weights.is_empty() {
            return Err(SieveError::EmptyWeights);
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() {
                return Err(SieveError::NonFiniteWeight { index });
            }
            if value < 0.0 {
                return Err(SieveError::NegativeWeight { index, value });
            }
        }
        if !weights.iter().sum::<f64>().is_finite() {
            return Err(SieveError::NonFiniteTotal);
        }
        Ok(Self(weights))
    }

    /// Weights retained on each sieve, excluding the pan.
    pub fn on_sieves(&self) -> &[f64] {
        &self.0[..self.0.len() - 1]
    }

    /// Weight collected in the pan.
    pub fn pan(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Total sample weight, pan included.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Number of entries including the pan.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<f64>> for WeightSeries {
    type Error = SieveError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<WeightSeries> for Vec<f64> {
    fn from(series: WeightSeries) -> Self {
        series.0
    }
}

/// Per-sieve gradation curves, aligned 1:1 with the sieve list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradationResult {
    /// Share of total weight caught on each sieve.
    pub percent_retained: Vec<f64>,
    /// Running total of `percent_retained`, largest sieve first.
    pub cumulative_retained: Vec<f64>,
    /// `100 - cumulative_retained`.
    pub percent_passing: Vec<f64>,
    /// Share of total weight in the pan.
    pub pan_percent: f64,
    /// Sum of all weights, pan included.
    pub total_weight: f64,
}

impl GradationResult {
    fn zeroed(len: usize) -> Self {
        Self {
            percent_retained: vec![0.0; len],
            cumulative_retained: vec![0.0; len],
            percent_passing: vec![0.0; len],
            pan_percent: 0.0,
            total_weight: 0.0,
        }
    }

    /// Number of sieves covered.
    pub fn len(&self) -> usize {
        self.percent_passing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percent_passing.is_empty()
    }
}

/// Compute the gradation curves for `weights` over `sieves`.
///
/// `weights` must hold exactly `sieves.len() + 1` entries. A sample whose
/// total weight is zero yields all-zero curves rather than an error.
pub fn calculate(
    weights: &WeightSeries,
    sieves: &[SieveSize],
) -> Result<GradationResult, SieveError> {
    if weights.len() != sieves.len() + 1 {
        return Err(SieveError::LengthMismatch {
            what: "weights (sieves + pan)",
            expected: sieves.len() + 1,
            actual: weights.len(),
        });
    }

    let total = weights.total();
    if total == 0.0 {
        return Ok(GradationResult::zeroed(sieves.len()));
    }

    let on_sieves = weights.on_sieves();
    let percent_retained: Vec<f64> = on_sieves.iter().map(|w| 100.0 * w / total).collect();

    let cumulative_retained: Vec<f64> = on_sieves
        .iter()
        .scan(0.0, |running, w| {
            *running += w;
            Some(100.0 * *running / total)
        })
        .collect();

    let percent_passing = cumulative_retained.iter().map(|c| 100.0 - c).collect();

    Ok(GradationResult {
        percent_retained,
        cumulative_retained,
        percent_passing,
        pan_percent: 100.0 * weights.pan() / total,
        total_weight: total,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> impl Strategy<Value = (Vec<f64>, Vec<SieveSize>)> {
        (1usize..10).prop_flat_map(|n| {
            let weights = prop::collection::vec(0.0f64..5000.0, n + 1);
            let sieves = Just(
                (0..n)
                    .map(|i| SieveSize::new(80.0 / (i as f64 + 1.0)).unwrap())
                    .collect::<Vec<_>>(),
            );
            (weights, sieves)
        })
    }

    proptest! {
        /// Percent retained sums to the last cumulative value, and the
        /// last passing value is its complement.
        #[test]
        fn sum_invariant((w, sieves) in sample()) {
            prop_assume!(w.iter().sum::<f64>() > 0.0);
            let r = calculate(&WeightSeries::new(w).unwrap(), &sieves).unwrap();
            let sum: f64 = r.percent_retained.iter().sum();
            let last = r.len() - 1;
            prop_assert!((sum - r.cumulative_retained[last]).abs() < 1e-9);
            let complement = 100.0 - r.cumulative_retained[last];
            prop_assert!((r.percent_passing[last] - complement).abs() < 1e-9);
        }

        /// Cumulative retained never decreases; passing never increases.
        #[test]
        fn curves_are_monotone((w, sieves) in sample()) {
            let r = calculate(&WeightSeries::new(w).unwrap(), &sieves).unwrap();
            for i in 1..r.len() {
                prop_assert!(r.cumulative_retained[i] >= r.cumulative_retained[i - 1]);
                prop_assert!(r.percent_passing[i] <= r.percent_passing[i - 1]);
            }
        }

        /// Every output value lies in [0, 100].
        #[test]
        fn values_are_percentages((w, sieves) in sample()) {
            let r = calculate(&WeightSeries::new(w).unwrap(), &sieves).unwrap();
            let all = r
                .percent_retained
                .iter()
                .chain(&r.cumulative_retained)
                .chain(&r.percent_passing);
            for v in all {
                prop_assert!((0.0..=100.0).contains(v));
            }
        }
    }
}
