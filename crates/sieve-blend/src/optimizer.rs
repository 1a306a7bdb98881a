//! # Blend Optimizer
//!
//! Exhaustive search over discretized blend proportions.
//!
//! ## Search space
//!
//! Every vector of `N` non-negative multiples of `step` that sums to 100.
//! Enumeration is depth-first: the first `N - 1` materials each take
//! `0, step, 2*step, ...` up to the remaining budget, and the last material
//! takes whatever remains, so every candidate sums to 100 by construction.
//!
//! ## Selection
//!
//! Each candidate is scored with [`crate::scoring`]. Among fully compliant
//! candidates the strictly lowest score wins; on a tie the earlier
//! candidate in enumeration order is kept. The lowest-scoring candidate of
//! all, compliant or not, is reported separately as `closest`.
//!
//! ## Cost
//!
//! The search visits `C(100/step + N - 1, N - 1)` vectors: 51 for two
//! materials at the default step of 2, 1 326 for three, 23 426 for four.
//! Larger blends should raise `step` or set a `max_candidates` budget;
//! when the budget runs out the report is flagged incomplete.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sieve_core::SpecTable;

use crate::error::BlendError;
use crate::material::Material;
use crate::scoring::{BlendScore, TargetGrid};

/// Default proportion step, in percent.
pub const DEFAULT_STEP: u32 = 2;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One material's share of a blend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proportion {
    pub material: String,
    pub percent: u32,
}

/// A scored blend, proportions in material order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendResult {
    pub proportions: Vec<Proportion>,
    #[serde(flatten)]
    pub score: BlendScore,
}

impl BlendResult {
    /// Share assigned to the named material.
    pub fn percent_of(&self, material: &str) -> Option<u32> {
        self.proportions
            .iter()
            .find(|p| p.material == material)
            .map(|p| p.percent)
    }

    /// Material name → percent. A repeated name keeps its last share.
    pub fn as_map(&self) -> BTreeMap<&str, u32> {
        self.proportions
            .iter()
            .map(|p| (p.material.as_str(), p.percent))
            .collect()
    }

    pub fn percents(&self) -> Vec<u32> {
        self.proportions.iter().map(|p| p.percent).collect()
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    /// Best fully compliant blend, or `None` when no compliant blend exists
    /// on the search grid (or fewer than two materials were given).
    pub best: Option<BlendResult>,
    /// Lowest-scoring blend regardless of compliance.
    pub closest: Option<BlendResult>,
    /// Candidates scored.
    pub evaluated: u64,
    /// `false` when `max_candidates` stopped the enumeration early.
    pub search_complete: bool,
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

/// Search configuration. Stateless between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlendOptimizerDef")]
pub struct BlendOptimizer {
    step: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_candidates: Option<u64>,
}

#[derive(Deserialize)]
struct BlendOptimizerDef {
    #[serde(default = "default_step")]
    step: u32,
    #[serde(default)]
    max_candidates: Option<u64>,
}

fn default_step() -> u32 {
    DEFAULT_STEP
}

impl TryFrom<BlendOptimizerDef> for BlendOptimizer {
    type Error = BlendError;

    fn try_from(def: BlendOptimizerDef) -> Result<Self, Self::Error> {
        let opt = BlendOptimizer::new().with_step(def.step)?;
        Ok(match def.max_candidates {
            Some(max) => opt.with_max_candidates(max),
            None => opt,
        })
    }
}

impl Default for BlendOptimizer {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            max_candidates: None,
        }
    }
}

impl BlendOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different proportion step. Must be >= 1 and divide 100.
    pub fn with_step(mut self, step: u32) -> Result<Self, BlendError> {
        if step == 0 || 100 % step != 0 {
            return Err(BlendError::InvalidStep(step));
        }
        self.step = step;
        Ok(self)
    }

    /// Stop after scoring this many candidates.
    pub fn with_max_candidates(mut self, max_candidates: u64) -> Self {
        self.max_candidates = Some(max_candidates);
        self
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn max_candidates(&self) -> Option<u64> {
        self.max_candidates
    }

    /// Size of the search space for `materials` materials, saturating at
    /// `u64::MAX`.
    pub fn candidate_count(&self, materials: usize) -> u64 {
        if materials == 0 {
            return 0;
        }
        let slots = u128::from(100 / self.step);
        let k = (materials - 1) as u128;
        // C(slots + k, k), built incrementally so every division is exact.
        let mut count: u128 = 1;
        for i in 1..=k {
            count = count * (slots + i) / i;
            if count > u128::from(u64::MAX) {
                return u64::MAX;
            }
        }
        count as u64
    }

    /// Best compliant blend, or `None`.
    pub fn optimal_blend(&self, materials: &[Material], target: &SpecTable) -> Option<BlendResult> {
        self.search(materials, target).best
    }

    /// Run the full search and report both the compliant winner and the
    /// closest candidate overall.
    pub fn search(&self, materials: &[Material], target: &SpecTable) -> SearchReport {
        if materials.len() < 2 {
            tracing::debug!(materials = materials.len(), "blend needs at least two materials");
            return SearchReport {
                best: None,
                closest: None,
                evaluated: 0,
                search_complete: true,
            };
        }

        tracing::debug!(
            envelope = target.name(),
            materials = materials.len(),
            step = self.step,
            candidates = self.candidate_count(materials.len()),
            "starting blend search"
        );

        let grid = TargetGrid::new(materials, target);
        let prefix = Vec::with_capacity(materials.len());
        let state = self.descend(&grid, prefix, 100, SearchState::default());

        if state.halted {
            tracing::warn!(
                evaluated = state.evaluated,
                max_candidates = ?self.max_candidates,
                "blend search budget exhausted before enumeration finished"
            );
        }

        let to_result = |c: Candidate| {
            let score = grid.detailed(&c.proportions);
            BlendResult {
                proportions: materials
                    .iter()
                    .zip(c.proportions)
                    .map(|(m, percent)| Proportion {
                        material: m.name().to_string(),
                        percent,
                    })
                    .collect(),
                score,
            }
        };

        let report = SearchReport {
            best: state.best.map(to_result),
            closest: state.closest.map(to_result),
            evaluated: state.evaluated,
            search_complete: !state.halted,
        };

        match &report.best {
            Some(best) => tracing::debug!(
                evaluated = report.evaluated,
                score = best.score.score,
                proportions = ?best.percents(),
                "blend search finished"
            ),
            None => tracing::debug!(evaluated = report.evaluated, "no compliant blend found"),
        }
        report
    }

    /// Depth-first enumeration. The accumulator is threaded through each
    /// branch and returned; no state lives outside the call.
    fn descend(
        &self,
        grid: &TargetGrid,
        prefix: Vec<u32>,
        remaining: u32,
        state: SearchState,
    ) -> SearchState {
        if prefix.len() + 1 == grid.material_count() {
            let mut proportions = prefix;
            proportions.push(remaining);
            return state.visit(grid, proportions, self.max_candidates);
        }

        (0..=remaining)
            .step_by(self.step as usize)
            .fold(state, |state, pct| {
                if state.halted {
                    return state;
                }
                let mut next = prefix.clone();
                next.push(pct);
                self.descend(grid, next, remaining - pct, state)
            })
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    proportions: Vec<u32>,
    score: f64,
}

#[derive(Debug, Default)]
struct SearchState {
    best: Option<Candidate>,
    closest: Option<Candidate>,
    evaluated: u64,
    halted: bool,
}

impl SearchState {
    fn visit(mut self, grid: &TargetGrid, proportions: Vec<u32>, budget: Option<u64>) -> Self {
        if budget.is_some_and(|max| self.evaluated >= max) {
            self.halted = true;
            return self;
        }
        let (score, compliant) = grid.score(&proportions);
        self.evaluated += 1;
        tracing::trace!(?proportions, score, compliant, "scored candidate");

        let beats =
            |current: &Option<Candidate>| current.as_ref().map_or(true, |c| score < c.score);

        if compliant && beats(&self.best) {
            self.best = Some(Candidate {
                proportions: proportions.clone(),
                score,
            });
        }
        if beats(&self.closest) {
            self.closest = Some(Candidate { proportions, score });
        }
        self
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::material::PassingPoint;
    use proptest::prelude::*;
    use sieve_core::{CoarseGrading, SieveSize, SpecLibrary};

    fn curve() -> impl Strategy<Value = Vec<f64>> {
        // Passing at 40, 20, 10, 4.75 mm, non-increasing.
        prop::collection::vec(0.0f64..=100.0, 4).prop_map(|mut v| {
            v.sort_by(|a, b| b.total_cmp(a));
            v
        })
    }

    fn material(name: &str, values: &[f64]) -> Material {
        let points = [40.0, 20.0, 10.0, 4.75]
            .iter()
            .zip(values)
            .map(|(&mm, &passing)| PassingPoint {
                sieve: SieveSize::new(mm).unwrap(),
                passing,
            })
            .collect();
        Material::new(name, points).unwrap()
    }

    proptest! {
        /// Repeated searches over identical inputs agree exactly.
        #[test]
        fn search_is_deterministic(
            a in curve(),
            b in curve(),
            step in prop::sample::select(vec![1u32, 2, 4, 5, 10]),
        ) {
            let table = SpecLibrary::is383().coarse_table(CoarseGrading::Graded20).unwrap().clone();
            let mats = [material("a", &a), material("b", &b)];
            let opt = BlendOptimizer::new().with_step(step).unwrap();
            prop_assert_eq!(opt.search(&mats, &table), opt.search(&mats, &table));
        }

        /// Every reported blend sums to 100 in multiples of the step, and
        /// `best` is compliant whenever it exists.
        #[test]
        fn reported_blends_are_on_the_grid(a in curve(), b in curve(), c in curve()) {
            let table = SpecLibrary::is383().coarse_table(CoarseGrading::Graded20).unwrap().clone();
            let mats = [material("a", &a), material("b", &b), material("c", &c)];
            let opt = BlendOptimizer::new().with_step(5).unwrap();
            let report = opt.search(&mats, &table);
            prop_assert_eq!(report.evaluated, opt.candidate_count(3));
            for r in report.best.iter().chain(report.closest.iter()) {
                prop_assert_eq!(r.percents().iter().sum::<u32>(), 100);
                prop_assert!(r.percents().iter().all(|p| p % 5 == 0));
            }
            if let Some(best) = &report.best {
                prop_assert!(best.score.compliant);
                let closest = report.closest.as_ref().unwrap();
                prop_assert!(closest.score.score <= best.score.score);
            }
        }
    }
}
