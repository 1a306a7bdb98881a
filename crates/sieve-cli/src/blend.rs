//! # Blend CLI — Proportion several materials against an envelope.
//!
//! ```yaml
//! # mix-20mm.yaml
//! target: graded_20          # aggregate type; fine targets also need `zone`
//! materials:
//!   - name: 20mm             # a passing curve...
//!     curve:
//!       - { sieve: 20, passing: 85 }
//!       - { sieve: 10, passing: 5 }
//!   - name: 10mm             # ...or a raw sieve analysis
//!     weights: [0, 0, 0, 0, 0, 0, 200, 3000, 1500, 300]
//! ```
//!
//! Exit code 0 when a compliant blend was found, 2 when none exists on the
//! search grid. The report is printed either way so the closest blend can
//! be inspected.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use sieve_blend::{BlendOptimizer, Material, PassingPoint, SearchReport};
use sieve_core::{calculate, AggregateType, SieveSize, SpecLibrary, WeightSeries, Zone};

/// Exit code when no compliant blend exists.
pub const EXIT_NO_COMPLIANT_BLEND: u8 = 2;

/// Arguments for `sieve blend`.
#[derive(Args, Debug)]
pub struct BlendArgs {
    /// Blend description (YAML or JSON).
    pub input: PathBuf,

    /// Proportion step in percent; must divide 100.
    #[arg(long)]
    pub step: Option<u32>,

    /// Stop after scoring this many candidates.
    #[arg(long)]
    pub max_candidates: Option<u64>,
}

/// A blend problem as read from disk.
#[derive(Debug, Clone, Deserialize)]
pub struct BlendInput {
    pub target: AggregateType,
    #[serde(default)]
    pub zone: Option<Zone>,
    pub materials: Vec<MaterialInput>,
    /// Search settings; command-line flags take precedence.
    #[serde(default)]
    pub optimizer: Option<BlendOptimizer>,
}

/// A material given either as its passing curve or as a sieve analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaterialInput {
    Curve {
        name: String,
        curve: Vec<PassingPoint>,
    },
    Analysis {
        name: String,
        /// Defaults to the target's standard sieve stack.
        #[serde(default)]
        sieves: Option<Vec<SieveSize>>,
        /// Raw grams; validated after the variant is chosen.
        weights: Vec<f64>,
    },
}

impl MaterialInput {
    pub fn name(&self) -> &str {
        match self {
            MaterialInput::Curve { name, .. } | MaterialInput::Analysis { name, .. } => name,
        }
    }

    fn into_material(self, default_sieves: &[SieveSize]) -> Result<Material> {
        match self {
            MaterialInput::Curve { name, curve } => {
                Material::new(name.clone(), curve).with_context(|| format!("material {name:?}"))
            }
            MaterialInput::Analysis { name, sieves, weights } => {
                let sieves = sieves.as_deref().unwrap_or(default_sieves);
                let weights =
                    WeightSeries::new(weights).with_context(|| format!("weights of {name:?}"))?;
                let gradation = calculate(&weights, sieves)
                    .with_context(|| format!("sieve analysis of {name:?}"))?;
                Material::from_gradation(name.clone(), sieves, &gradation)
                    .with_context(|| format!("material {name:?}"))
            }
        }
    }
}

/// Search report labelled with the envelope it was run against.
#[derive(Debug, Clone, Serialize)]
pub struct BlendOutput {
    pub target: String,
    pub step: u32,
    #[serde(flatten)]
    pub report: SearchReport,
}

/// Execute `sieve blend`.
pub fn run_blend(args: &BlendArgs, library: &Arc<SpecLibrary>) -> Result<u8> {
    let input: BlendInput = crate::load_document(&args.input)?;
    let output = optimize(input, args.step, args.max_candidates, library)
        .with_context(|| format!("blending {}", args.input.display()))?;
    crate::print_json(&output)?;

    if output.report.best.is_some() {
        Ok(0)
    } else {
        tracing::warn!(envelope = %output.target, "no compliant blend on the search grid");
        Ok(EXIT_NO_COMPLIANT_BLEND)
    }
}

/// Resolve the target, build materials, and run the search.
pub fn optimize(
    input: BlendInput,
    step: Option<u32>,
    max_candidates: Option<u64>,
    library: &Arc<SpecLibrary>,
) -> Result<BlendOutput> {
    if input.target.is_fine() && input.zone.is_none() {
        bail!("fine-aggregate target {} needs a `zone`", input.target);
    }
    let table = library
        .target_table(input.target, input.zone)
        .with_context(|| format!("no specification table for target {}", input.target))?;

    let mut optimizer = input.optimizer.unwrap_or_default();
    if let Some(step) = step {
        optimizer = optimizer.with_step(step)?;
    }
    if let Some(max) = max_candidates {
        optimizer = optimizer.with_max_candidates(max);
    }

    let mut seen = HashSet::new();
    for material in &input.materials {
        if !seen.insert(material.name()) {
            bail!("duplicate material name {:?}", material.name());
        }
    }

    let default_sieves = input.target.standard_sieves();
    let materials = input
        .materials
        .into_iter()
        .map(|m| m.into_material(default_sieves))
        .collect::<Result<Vec<_>>>()?;
    if materials.len() < 2 {
        tracing::warn!(materials = materials.len(), "a blend needs at least two materials");
    }

    let report = optimizer.search(&materials, table);
    Ok(BlendOutput {
        target: table.name().to_string(),
        step: optimizer.step(),
        report,
    })
}
