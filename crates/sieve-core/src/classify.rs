//! # Classification
//!
//! Maps a percent-passing curve to a [`Classification`] using the tables of
//! a shared [`SpecLibrary`].
//!
//! ## Fine aggregate: single-sieve zone rule
//!
//! [`Classifier::classify_fine`] looks only at the 0.6 mm sieve. Zones are
//! tried in declared order (I, II, III, IV) and the first zone whose 0.6 mm
//! band contains the sample wins. Every other sieve is ignored, so a zone
//! verdict does not imply the sample sits inside that zone's envelope at
//! every sieve. Use [`Classifier::full_curve_zone`] or
//! [`Classifier::is_gap_graded`] when full-curve conformance matters.
//!
//! ## Coarse aggregate: full-curve conformance
//!
//! [`Classifier::classify_coarse`] checks every sieve present in both the
//! sample and the grading's table and stops at the first violation.
//!
//! ## Outcomes are data
//!
//! A missing 0.6 mm sieve or a grading absent from the library produce a
//! [`Classification`] variant, never an error; downstream rendering still
//! needs a row. Only misaligned inputs return [`SieveError`].

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::aggregate::{AggregateType, CoarseGrading, FineAggregateKind, Zone};
use crate::error::SieveError;
use crate::limits::{SpecLimit, SpecTable};
use crate::sieve::SieveSize;
use crate::tables::SpecLibrary;

/// The sieve that discriminates fine-aggregate zones.
pub const ZONE_DISCRIMINATOR_SIEVE: SieveSize = SieveSize::from_table(0.6);

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Verdict for one sample. Serializes as its display string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// Fine aggregate falls in the named zone.
    Zone(Zone),
    /// Coarse aggregate is within its envelope at every tabulated sieve.
    Conforms,
    /// No zone matched, or a tabulated sieve is out of band.
    DoesNotConform,
    /// The library has no table for the requested grading.
    NonStandard,
    /// The sample was not tested on a sieve the rule requires.
    SieveNotFound(SieveSize),
}

impl Classification {
    /// Zone verdicts and full conformance pass; everything else does not.
    pub fn is_passing(&self) -> bool {
        matches!(self, Self::Zone(_) | Self::Conforms)
    }

    /// The matched zone, for fine-aggregate zone verdicts only.
    pub fn zone(&self) -> Option<Zone> {
        match self {
            Self::Zone(z) => Some(*z),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(zone) => f.write_str(zone.label()),
            Self::Conforms => f.write_str("Conforms to IS 383"),
            Self::DoesNotConform => f.write_str("Does not conform"),
            Self::NonStandard => f.write_str("Non-Standard"),
            Self::SieveNotFound(sieve) => write!(f, "{sieve} not found"),
        }
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Per-sieve report
// ---------------------------------------------------------------------------

/// Outcome of checking one tabulated sieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Within,
    Outside,
    /// The table lists the sieve but the sample was not tested on it.
    NotTested,
}

/// One row of a conformance report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SieveCheck {
    pub sieve: SieveSize,
    pub limit: SpecLimit,
    /// Sample passing at this sieve, if tested.
    pub passing: Option<f64>,
    /// Distance outside the band (zero when within).
    pub deviation: Option<f64>,
    pub status: CheckStatus,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classifies passing curves against an injected specification library.
#[derive(Debug, Clone)]
pub struct Classifier {
    library: Arc<SpecLibrary>,
}

impl Classifier {
    pub fn new(library: Arc<SpecLibrary>) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &SpecLibrary {
        &self.library
    }

    /// Dispatch on the aggregate type.
    pub fn classify(
        &self,
        percent_passing: &[f64],
        sieves: &[SieveSize],
        aggregate: AggregateType,
    ) -> Result<Classification, SieveError> {
        match aggregate {
            AggregateType::Fine(kind) => self.classify_fine(percent_passing, sieves, kind),
            AggregateType::Coarse(grading) => {
                self.classify_coarse(percent_passing, sieves, grading)
            }
        }
    }

    /// Zone of a fine aggregate from its 0.6 mm passing value alone.
    pub fn classify_fine(
        &self,
        percent_passing: &[f64],
        sieves: &[SieveSize],
        kind: FineAggregateKind,
    ) -> Result<Classification, SieveError> {
        check_aligned(percent_passing, sieves)?;

        let zones = self.library.zone_tables(kind);
        if zones.is_empty() {
            tracing::debug!(kind = kind.as_str(), "no zone tables in library");
            return Ok(Classification::NonStandard);
        }

        let Some(idx) = crate::sieve::position_of(sieves, ZONE_DISCRIMINATOR_SIEVE) else {
            return Ok(Classification::SieveNotFound(ZONE_DISCRIMINATOR_SIEVE));
        };
        let passing = percent_passing[idx];

        let matched = zones.into_iter().find(|(_, table)| {
            table
                .limit_for(ZONE_DISCRIMINATOR_SIEVE)
                .is_some_and(|limit| limit.contains(passing))
        });

        let verdict = match matched {
            Some((zone, _)) => Classification::Zone(zone),
            None => Classification::DoesNotConform,
        };
        tracing::debug!(
            kind = kind.as_str(),
            passing_600um = passing,
            %verdict,
            "classified fine aggregate"
        );
        Ok(verdict)
    }

    /// Full-curve conformance of a coarse aggregate.
    pub fn classify_coarse(
        &self,
        percent_passing: &[f64],
        sieves: &[SieveSize],
        grading: CoarseGrading,
    ) -> Result<Classification, SieveError> {
        check_aligned(percent_passing, sieves)?;

        let Some(table) = self.library.coarse_table(grading) else {
            tracing::debug!(grading = grading.as_str(), "no coarse table in library");
            return Ok(Classification::NonStandard);
        };

        if let Some((sieve, passing, limit)) = first_violation(table, percent_passing, sieves) {
            tracing::debug!(
                grading = grading.as_str(),
                %sieve,
                passing,
                min = limit.min(),
                max = limit.max(),
                "coarse aggregate out of band"
            );
            return Ok(Classification::DoesNotConform);
        }
        Ok(Classification::Conforms)
    }

    /// Row-by-row comparison of a sample against `table`, in table order.
    pub fn conformance_report(
        &self,
        percent_passing: &[f64],
        sieves: &[SieveSize],
        table: &SpecTable,
    ) -> Result<Vec<SieveCheck>, SieveError> {
        check_aligned(percent_passing, sieves)?;

        Ok(table
            .entries()
            .iter()
            .map(|entry| {
                match crate::sieve::position_of(sieves, entry.sieve) {
                    Some(idx) => {
                        let passing = percent_passing[idx];
                        let status = if entry.limit.contains(passing) {
                            CheckStatus::Within
                        } else {
                            CheckStatus::Outside
                        };
                        SieveCheck {
                            sieve: entry.sieve,
                            limit: entry.limit,
                            passing: Some(passing),
                            deviation: Some(entry.limit.deviation(passing)),
                            status,
                        }
                    }
                    None => SieveCheck {
                        sieve: entry.sieve,
                        limit: entry.limit,
                        passing: None,
                        deviation: None,
                        status: CheckStatus::NotTested,
                    },
                }
            })
            .collect())
    }

    /// First zone (in declared order) whose envelope contains the sample at
    /// every tabulated sieve the sample was tested on.
    ///
    /// Returns `None` when no zone does, or when the sample shares no sieve
    /// with the zone tables.
    pub fn full_curve_zone(
        &self,
        percent_passing: &[f64],
        sieves: &[SieveSize],
        kind: FineAggregateKind,
    ) -> Result<Option<Zone>, SieveError> {
        check_aligned(percent_passing, sieves)?;

        Ok(self
            .library
            .zone_tables(kind)
            .into_iter()
            .find(|(_, table)| {
                shares_a_sieve(table, sieves)
                    && first_violation(table, percent_passing, sieves).is_none()
            })
            .map(|(zone, _)| zone))
    }

    /// A fine aggregate is gap-graded when no single zone envelope contains
    /// its whole curve.
    pub fn is_gap_graded(
        &self,
        percent_passing: &[f64],
        sieves: &[SieveSize],
        kind: FineAggregateKind,
    ) -> Result<bool, SieveError> {
        Ok(self.full_curve_zone(percent_passing, sieves, kind)?.is_none())
    }
}

fn check_aligned(percent_passing: &[f64], sieves: &[SieveSize]) -> Result<(), SieveError> {
    if percent_passing.len() == sieves.len() {
        Ok(())
    } else {
        Err(SieveError::LengthMismatch {
            what: "percent passing",
            expected: sieves.len(),
            actual: percent_passing.len(),
        })
    }
}

fn shares_a_sieve(table: &SpecTable, sieves: &[SieveSize]) -> bool {
    sieves.iter().any(|&s| table.limit_for(s).is_some())
}

/// First sample sieve, in sample order, whose passing value falls outside
/// the table's band.
fn first_violation(
    table: &SpecTable,
    percent_passing: &[f64],
    sieves: &[SieveSize],
) -> Option<(SieveSize, f64, SpecLimit)> {
    sieves
        .iter()
        .zip(percent_passing)
        .find_map(|(&sieve, &passing)| {
            table
                .limit_for(sieve)
                .filter(|limit| !limit.contains(passing))
                .map(|limit| (sieve, passing, limit))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::FINE_SIEVES;
    use std::collections::BTreeMap;

    fn classifier() -> Classifier {
        Classifier::new(Arc::new(SpecLibrary::is383()))
    }

    fn sieves(mm: &[f64]) -> Vec<SieveSize> {
        SieveSize::list(mm).unwrap()
    }

    // ── Fine aggregate ───────────────────────────────────────────────

    #[test]
    fn zone_iii_from_600_micron_only() {
        // 62% at 0.6 mm, every other sieve wildly outside Zone III.
        let passing = [100.0, 50.0, 40.0, 30.0, 62.0, 90.0, 80.0];
        let c = classifier()
            .classify_fine(&passing, &FINE_SIEVES, FineAggregateKind::NaturalSand)
            .unwrap();
        assert_eq!(c, Classification::Zone(Zone::ZoneIII));
        assert_eq!(c.to_string(), "Zone III");
        assert_eq!(c.zone(), Some(Zone::ZoneIII));
        assert!(c.is_passing());
    }

    #[test]
    fn single_sieve_rule_differs_from_full_curve() {
        let passing = [100.0, 50.0, 40.0, 30.0, 62.0, 90.0, 80.0];
        let cl = classifier();
        let kind = FineAggregateKind::NaturalSand;
        assert_eq!(cl.full_curve_zone(&passing, &FINE_SIEVES, kind).unwrap(), None);
        assert!(cl.is_gap_graded(&passing, &FINE_SIEVES, kind).unwrap());
    }

    #[test]
    fn zone_bands_are_inclusive() {
        let s = sieves(&[0.6]);
        let cl = classifier();
        let kind = FineAggregateKind::CrushedSand;
        let zone_of = |passing: f64| cl.classify_fine(&[passing], &s, kind).unwrap().zone();
        assert_eq!(zone_of(15.0), Some(Zone::ZoneI));
        assert_eq!(zone_of(34.0), Some(Zone::ZoneI));
        assert_eq!(zone_of(59.0), Some(Zone::ZoneII));
        assert_eq!(zone_of(100.0), Some(Zone::ZoneIV));
    }

    #[test]
    fn values_between_bands_do_not_conform() {
        let s = sieves(&[0.6]);
        let cl = classifier();
        let kind = FineAggregateKind::NaturalSand;
        assert_eq!(cl.classify_fine(&[10.0], &s, kind).unwrap(), Classification::DoesNotConform);
        assert_eq!(cl.classify_fine(&[34.5], &s, kind).unwrap(), Classification::DoesNotConform);
        assert_eq!(
            Classification::DoesNotConform.to_string(),
            "Does not conform"
        );
    }

    #[test]
    fn missing_600_micron_sieve_is_a_diagnostic() {
        let s = sieves(&[4.75, 2.36, 1.18]);
        let c = classifier()
            .classify_fine(&[99.0, 90.0, 70.0], &s, FineAggregateKind::NaturalSand)
            .unwrap();
        assert_eq!(c, Classification::SieveNotFound(ZONE_DISCRIMINATOR_SIEVE));
        assert_eq!(c.to_string(), "0.6 mm not found");
        assert!(!c.is_passing());
        assert_eq!(c.zone(), None);
    }

    #[test]
    fn full_curve_zone_for_well_graded_sand() {
        let passing = [100.0, 99.0, 96.5, 75.0, 62.0, 20.0, 5.0];
        let cl = classifier();
        assert_eq!(
            cl.full_curve_zone(&passing, &FINE_SIEVES, FineAggregateKind::NaturalSand).unwrap(),
            Some(Zone::ZoneIII)
        );
    }

    // ── Coarse aggregate ─────────────────────────────────────────────

    fn graded_20_sample() -> (Vec<SieveSize>, Vec<f64>) {
        (sieves(&[40.0, 20.0, 10.0, 4.75]), vec![100.0, 95.0, 40.0, 5.0])
    }

    #[test]
    fn coarse_sample_within_bounds_conforms() {
        let (s, passing) = graded_20_sample();
        let c = classifier().classify_coarse(&passing, &s, CoarseGrading::Graded20).unwrap();
        assert_eq!(c, Classification::Conforms);
        assert_eq!(c.to_string(), "Conforms to IS 383");
    }

    #[test]
    fn one_sieve_out_of_band_does_not_conform() {
        let (s, mut passing) = graded_20_sample();
        passing[2] = 60.0;
        let c = classifier().classify_coarse(&passing, &s, CoarseGrading::Graded20).unwrap();
        assert_eq!(c, Classification::DoesNotConform);
    }

    #[test]
    fn untabulated_sieves_are_ignored() {
        let s = sieves(&[40.0, 20.0, 12.5, 10.0, 4.75]);
        let passing = [100.0, 95.0, 3.0, 40.0, 5.0];
        let c = classifier().classify_coarse(&passing, &s, CoarseGrading::Graded20).unwrap();
        assert_eq!(c, Classification::Conforms);
    }

    #[test]
    fn grading_missing_from_library_is_non_standard() {
        let lib = SpecLibrary::new("empty", BTreeMap::new(), BTreeMap::new());
        let cl = Classifier::new(Arc::new(lib));
        let (s, passing) = graded_20_sample();
        let c = cl.classify_coarse(&passing, &s, CoarseGrading::Graded20).unwrap();
        assert_eq!(c, Classification::NonStandard);
        assert_eq!(c.to_string(), "Non-Standard");
        let f = cl
            .classify_fine(&[62.0], &sieves(&[0.6]), FineAggregateKind::NaturalSand)
            .unwrap();
        assert_eq!(f, Classification::NonStandard);
    }

    #[test]
    fn misaligned_inputs_are_errors() {
        let s = sieves(&[0.6, 0.3]);
        assert!(classifier()
            .classify_fine(&[62.0], &s, FineAggregateKind::NaturalSand)
            .is_err());
        assert!(classifier()
            .classify_coarse(&[62.0], &s, CoarseGrading::Graded20)
            .is_err());
    }

    #[test]
    fn dispatch_by_aggregate_type() {
        let (s, passing) = graded_20_sample();
        let c = classifier()
            .classify(&passing, &s, AggregateType::Coarse(CoarseGrading::Graded20))
            .unwrap();
        assert_eq!(c, Classification::Conforms);
    }

    // ── Report ───────────────────────────────────────────────────────

    #[test]
    fn conformance_report_marks_each_row() {
        let s = sieves(&[20.0, 10.0, 4.75]);
        let passing = [95.0, 60.0, 5.0];
        let cl = classifier();
        let table = cl.library().coarse_table(CoarseGrading::Graded20).unwrap();
        let report = cl.conformance_report(&passing, &s, table).unwrap();
        let statuses: Vec<CheckStatus> = report.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                CheckStatus::NotTested,
                CheckStatus::Within,
                CheckStatus::Outside,
                CheckStatus::Within
            ]
        );
        assert_eq!(report[2].deviation, Some(5.0));
        assert_eq!(report[0].passing, None);
    }

    #[test]
    fn classification_serializes_as_display_string() {
        let json = serde_json::to_string(&Classification::Zone(Zone::ZoneII)).unwrap();
        assert_eq!(json, "\"Zone II\"");
        let missing = Classification::SieveNotFound(ZONE_DISCRIMINATOR_SIEVE);
        let json = serde_json::to_string(&missing).unwrap();
        assert_eq!(json, "\"0.6 mm not found\"");
    }
}
