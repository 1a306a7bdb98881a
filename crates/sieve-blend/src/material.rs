//! # Blend Materials
//!
//! A [`Material`] is a named passing curve. Curves need not cover every
//! sieve of the target envelope; off-curve sieves are filled in by the
//! usual stockpile assumption:
//!
//! - above the largest tabulated sieve the material passes 100%;
//! - anywhere else it is treated as fully retained (0%).

use serde::{Deserialize, Serialize};

use sieve_core::{GradationResult, SieveError, SieveSize};

use crate::error::BlendError;

/// One tabulated point of a material's passing curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassingPoint {
    pub sieve: SieveSize,
    pub passing: f64,
}

/// A named aggregate with its percent-passing curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaterialDef")]
pub struct Material {
    name: String,
    curve: Vec<PassingPoint>,
}

#[derive(Deserialize)]
struct MaterialDef {
    name: String,
    curve: Vec<PassingPoint>,
}

impl TryFrom<MaterialDef> for Material {
    type Error = BlendError;

    fn try_from(def: MaterialDef) -> Result<Self, Self::Error> {
        Material::new(def.name, def.curve)
    }
}

impl Material {
    /// Build a material; the curve is reordered largest sieve first.
    pub fn new(name: impl Into<String>, mut curve: Vec<PassingPoint>) -> Result<Self, BlendError> {
        let name = name.into();
        if let Some(bad) = curve
            .iter()
            .find(|p| !(p.passing.is_finite() && (0.0..=100.0).contains(&p.passing)))
        {
            return Err(BlendError::InvalidPassing {
                material: name,
                sieve: bad.sieve,
                value: bad.passing,
            });
        }
        curve.sort_by(|a, b| b.sieve.mm().total_cmp(&a.sieve.mm()));
        Ok(Self { name, curve })
    }

    /// Build a material from a sieve analysis of the stockpile.
    pub fn from_gradation(
        name: impl Into<String>,
        sieves: &[SieveSize],
        gradation: &GradationResult,
    ) -> Result<Self, BlendError> {
        if sieves.len() != gradation.percent_passing.len() {
            return Err(SieveError::LengthMismatch {
                what: "percent passing",
                expected: sieves.len(),
                actual: gradation.percent_passing.len(),
            }
            .into());
        }
        let curve = sieves
            .iter()
            .zip(&gradation.percent_passing)
            .map(|(&sieve, &passing)| PassingPoint { sieve, passing })
            .collect();
        Self::new(name, curve)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn curve(&self) -> &[PassingPoint] {
        &self.curve
    }

    /// Percent passing at `sieve`, applying the off-curve rule.
    pub fn passing_at(&self, sieve: SieveSize) -> f64 {
        if let Some(point) = self.curve.iter().find(|p| p.sieve.matches(sieve)) {
            return point.passing;
        }
        match self.curve.first() {
            Some(largest) if sieve.mm() > largest.sieve.mm() => 100.0,
            _ => 0.0,
        }
    }
}
