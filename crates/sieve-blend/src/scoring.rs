//! # Blend Scoring
//!
//! Scores one proportion vector against a target envelope.
//!
//! For each sieve of the target table the combined passing value is the
//! proportion-weighted sum of the materials' passing values. Each sieve
//! then contributes:
//!
//! ```text
//! within [min, max]:   (combined - midpoint)^2
//! outside the band:    1000 + deviation^2     (deviation = distance to nearest bound)
//! ```
//!
//! The constant 1000 ranks every compliant vector ahead of every
//! non-compliant one. Lower scores are better.

use serde::Serialize;

use sieve_core::{SieveSize, SpecLimit, SpecTable};

use crate::error::BlendError;
use crate::material::Material;

/// Penalty added for each sieve whose combined passing is out of band.
pub const NONCOMPLIANCE_PENALTY: f64 = 1000.0;

/// Contribution of one target sieve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SieveScore {
    pub sieve: SieveSize,
    pub combined_passing: f64,
    pub limit: SpecLimit,
    /// Band midpoint the blend aims for.
    pub target: f64,
    pub within: bool,
    pub penalty: f64,
}

/// Total score of a proportion vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendScore {
    pub score: f64,
    /// No sieve was out of band.
    pub compliant: bool,
    pub per_sieve: Vec<SieveScore>,
}

/// Score a caller-chosen proportion vector (percent per material, in
/// material order, summing to 100).
pub fn score_blend(
    proportions: &[u32],
    materials: &[Material],
    target: &SpecTable,
) -> Result<BlendScore, BlendError> {
    if proportions.len() != materials.len() {
        return Err(BlendError::ProportionCount {
            expected: materials.len(),
            actual: proportions.len(),
        });
    }
    let sum: u32 = proportions.iter().sum();
    if sum != 100 {
        return Err(BlendError::ProportionSum(sum));
    }
    Ok(TargetGrid::new(materials, target).detailed(proportions))
}

/// Material passing values sampled once at every target sieve, so the
/// search does not re-resolve curves per candidate.
#[derive(Debug, Clone)]
pub(crate) struct TargetGrid {
    sieves: Vec<SieveSize>,
    limits: Vec<SpecLimit>,
    /// `passing[material][sieve]`
    passing: Vec<Vec<f64>>,
}

impl TargetGrid {
    pub(crate) fn new(materials: &[Material], target: &SpecTable) -> Self {
        let sieves = target.sieves();
        let limits = target.entries().iter().map(|e| e.limit).collect();
        let passing = materials
            .iter()
            .map(|m| sieves.iter().map(|&s| m.passing_at(s)).collect())
            .collect();
        Self {
            sieves,
            limits,
            passing,
        }
    }

    pub(crate) fn material_count(&self) -> usize {
        self.passing.len()
    }

    fn combined(&self, proportions: &[u32], sieve_idx: usize) -> f64 {
        proportions
            .iter()
            .zip(&self.passing)
            .map(|(&pct, curve)| f64::from(pct) * curve[sieve_idx])
            .sum::<f64>()
            / 100.0
    }

    fn sieve_penalty(limit: &SpecLimit, combined: f64) -> (bool, f64) {
        if limit.contains(combined) {
            let d = combined - limit.midpoint();
            (true, d * d)
        } else {
            let d = limit.deviation(combined);
            (false, NONCOMPLIANCE_PENALTY + d * d)
        }
    }

    /// `(score, compliant)` without per-sieve detail; the search hot path.
    pub(crate) fn score(&self, proportions: &[u32]) -> (f64, bool) {
        self.limits
            .iter()
            .enumerate()
            .fold((0.0, true), |(score, compliant), (idx, limit)| {
                let (within, penalty) = Self::sieve_penalty(limit, self.combined(proportions, idx));
                (score + penalty, compliant && within)
            })
    }

    pub(crate) fn detailed(&self, proportions: &[u32]) -> BlendScore {
        let per_sieve: Vec<SieveScore> = self
            .limits
            .iter()
            .enumerate()
            .map(|(idx, limit)| {
                let combined = self.combined(proportions, idx);
                let (within, penalty) = Self::sieve_penalty(limit, combined);
                SieveScore {
                    sieve: self.sieves[idx],
                    combined_passing: combined,
                    limit: *limit,
                    target: limit.midpoint(),
                    within,
                    penalty,
                }
            })
            .collect();
        BlendScore {
            score: per_sieve.iter().map(|s| s.penalty).sum(),
            compliant: per_sieve.iter().all(|s| s.within),
            per_sieve,
        }
    }
}
