//! # Gradation Summary
//!
//! The complete, stable record of one sieve analysis: the curves, the
//! fineness modulus, and the classification. This is the shape handed to
//! presentation, narrative-text, and persistence collaborators. Values are
//! raw numbers; rounding and units are the consumer's concern.

use serde::Serialize;

use crate::aggregate::AggregateType;
use crate::classify::{Classification, Classifier};
use crate::error::SieveError;
use crate::fineness::fineness_modulus;
use crate::gradation::{calculate, WeightSeries};
use crate::sieve::SieveSize;

/// One sample, fully analysed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradationSummary {
    pub aggregate_type: AggregateType,
    pub sieves: Vec<SieveSize>,
    pub percent_retained: Vec<f64>,
    pub cumulative_retained: Vec<f64>,
    pub percent_passing: Vec<f64>,
    pub pan_percent: f64,
    pub total_weight: f64,
    /// `None` for coarse aggregate, where the index is not applicable.
    pub fineness_modulus: Option<f64>,
    pub classification: Classification,
    /// Fine aggregate only: no zone envelope holds the whole curve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_graded: Option<bool>,
}

impl GradationSummary {
    /// Run the calculator, fineness modulus, and classifier over one sample.
    pub fn compute(
        weights: &WeightSeries,
        sieves: &[SieveSize],
        aggregate_type: AggregateType,
        classifier: &Classifier,
    ) -> Result<Self, SieveError> {
        let result = calculate(weights, sieves)?;
        let classification = classifier.classify(&result.percent_passing, sieves, aggregate_type)?;

        let (fineness, gap_graded) = match aggregate_type {
            AggregateType::Fine(kind) => (
                Some(fineness_modulus(&result.cumulative_retained, sieves)?),
                Some(classifier.is_gap_graded(&result.percent_passing, sieves, kind)?),
            ),
            AggregateType::Coarse(_) => (None, None),
        };

        Ok(Self {
            aggregate_type,
            sieves: sieves.to_vec(),
            percent_retained: result.percent_retained,
            cumulative_retained: result.cumulative_retained,
            percent_passing: result.percent_passing,
            pan_percent: result.pan_percent,
            total_weight: result.total_weight,
            fineness_modulus: fineness,
            classification,
            gap_graded,
        })
    }
}
