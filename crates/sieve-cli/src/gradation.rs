//! # Gradation CLI — Analyse one sieve test.
//!
//! ```yaml
//! # river-sand.yaml
//! aggregate_type: natural_sand
//! sieves: [4.75, 2.36, 1.18, 0.6, 0.3, 0.15]   # optional; defaults to the IS 383 stack
//! weights: [10, 25, 215, 450, 200, 80, 20]      # retained per sieve, then the pan
//! test_id: lab-2024-117                         # optional
//! ```
//!
//! Prints the gradation summary as JSON, stamped with a test identifier and
//! a UTC timestamp so the record can be filed by the external store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sieve_core::{AggregateType, Classifier, GradationSummary, SieveSize, SpecLibrary, WeightSeries};

/// Arguments for `sieve gradation`.
#[derive(Args, Debug)]
pub struct GradationArgs {
    /// Sample description (YAML or JSON).
    pub input: PathBuf,

    /// Test identifier. Overrides `test_id` in the input; a random UUID is
    /// used when neither is given.
    #[arg(long)]
    pub test_id: Option<String>,
}

/// One sample as read from disk.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleInput {
    pub aggregate_type: AggregateType,
    #[serde(default)]
    pub sieves: Option<Vec<SieveSize>>,
    pub weights: WeightSeries,
    #[serde(default)]
    pub test_id: Option<String>,
}

/// Summary plus the record-keeping fields.
#[derive(Debug, Clone, Serialize)]
pub struct GradationRecord {
    pub test_id: String,
    pub generated_at: String,
    #[serde(flatten)]
    pub summary: GradationSummary,
}

/// Execute `sieve gradation`.
pub fn run_gradation(args: &GradationArgs, library: &Arc<SpecLibrary>) -> Result<u8> {
    let sample: SampleInput = crate::load_document(&args.input)?;
    let record = analyse(sample, args.test_id.clone(), library, Utc::now())
        .with_context(|| format!("analysing {}", args.input.display()))?;
    tracing::info!(
        test_id = %record.test_id,
        classification = %record.summary.classification,
        zone = ?record.summary.classification.zone(),
        "gradation complete"
    );
    crate::print_json(&record)?;
    Ok(0)
}

/// Run the engine over one sample.
pub fn analyse(
    sample: SampleInput,
    test_id: Option<String>,
    library: &Arc<SpecLibrary>,
    now: DateTime<Utc>,
) -> Result<GradationRecord> {
    let sieves = match &sample.sieves {
        Some(sieves) => sieves.as_slice(),
        None => sample.aggregate_type.standard_sieves(),
    };
    let classifier = Classifier::new(library.clone());
    let summary =
        GradationSummary::compute(&sample.weights, sieves, sample.aggregate_type, &classifier)?;

    let test_id = test_id
        .or(sample.test_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(GradationRecord {
        test_id,
        generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        summary,
    })
}

/// Read and analyse without printing; used by tests and embedding hosts.
pub fn analyse_file(path: &Path, library: &Arc<SpecLibrary>) -> Result<GradationRecord> {
    let sample: SampleInput = crate::load_document(path)?;
    analyse(sample, None, library, Utc::now())
}
