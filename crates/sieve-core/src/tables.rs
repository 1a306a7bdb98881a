//! # Specification Library
//!
//! [`SpecLibrary`] is the read-only set of grading envelopes the classifier
//! and blend optimizer consult. It is built once at process start
//! ([`SpecLibrary::is383`] for the built-in data, or deserialized from a
//! host-supplied file) and shared by reference or `Arc`; nothing mutates it
//! afterwards.
//!
//! A library need not be complete. A grading with no table resolves to
//! `None`, which the classifier reports as "Non-Standard".
//!
//! ## IS 383:2016 data
//!
//! Fine aggregate, percent passing (Table 9):
//!
//! | Sieve (mm) | Zone I | Zone II | Zone III | Zone IV |
//! |-----------:|:------:|:-------:|:--------:|:-------:|
//! | 10   | 100    | 100    | 100    | 100    |
//! | 4.75 | 90–100 | 90–100 | 90–100 | 95–100 |
//! | 2.36 | 60–95  | 75–100 | 85–100 | 95–100 |
//! | 1.18 | 30–70  | 55–90  | 75–100 | 90–100 |
//! | 0.6  | 15–34  | 35–59  | 60–79  | 80–100 |
//! | 0.3  | 5–20   | 8–30   | 12–40  | 15–50  |
//! | 0.15 | 0–10   | 0–10   | 0–10   | 0–15   |
//!
//! For crushed sand the 0.15 mm limit is 0–20 in every zone.
//!
//! Coarse aggregate (Table 7) is tabulated per nominal size in
//! [`coarse_rows`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateType, CoarseGrading, FineAggregateKind, Zone};
use crate::limits::SpecTable;

/// Immutable collection of specification tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecLibrary {
    /// Standard the data is drawn from (e.g. "IS 383:2016").
    standard: String,
    /// Zone envelopes per fine-aggregate kind.
    #[serde(default)]
    fine: BTreeMap<FineAggregateKind, BTreeMap<Zone, SpecTable>>,
    /// Envelopes per coarse grading.
    #[serde(default)]
    coarse: BTreeMap<CoarseGrading, SpecTable>,
}

impl SpecLibrary {
    /// Assemble a library from explicit tables.
    pub fn new(
        standard: impl Into<String>,
        fine: BTreeMap<FineAggregateKind, BTreeMap<Zone, SpecTable>>,
        coarse: BTreeMap<CoarseGrading, SpecTable>,
    ) -> Self {
        Self {
            standard: standard.into(),
            fine,
            coarse,
        }
    }

    /// The built-in IS 383:2016 tables.
    pub fn is383() -> Self {
        let fine = FineAggregateKind::all()
            .iter()
            .map(|&kind| {
                let zones = Zone::all()
                    .iter()
                    .map(|&zone| {
                        let kind_label = kind.as_str().replace('_', " ");
                        let name = format!("{} ({kind_label})", zone.label());
                        (zone, SpecTable::from_rows(&name, &zone_rows(zone, kind)))
                    })
                    .collect();
                (kind, zones)
            })
            .collect();

        let coarse = CoarseGrading::all()
            .iter()
            .map(|&grading| (grading, SpecTable::from_rows(grading.as_str(), coarse_rows(grading))))
            .collect();

        Self::new("IS 383:2016", fine, coarse)
    }

    pub fn standard(&self) -> &str {
        &self.standard
    }

    /// Envelope for one fine-aggregate zone.
    pub fn zone_table(&self, kind: FineAggregateKind, zone: Zone) -> Option<&SpecTable> {
        self.fine.get(&kind).and_then(|zones| zones.get(&zone))
    }

    /// Zone envelopes for `kind` in declared order (Zone I first). Zones
    /// absent from the library are skipped.
    pub fn zone_tables(&self, kind: FineAggregateKind) -> Vec<(Zone, &SpecTable)> {
        Zone::all()
            .iter()
            .filter_map(|&zone| self.zone_table(kind, zone).map(|t| (zone, t)))
            .collect()
    }

    /// Envelope for a coarse grading.
    pub fn coarse_table(&self, grading: CoarseGrading) -> Option<&SpecTable> {
        self.coarse.get(&grading)
    }

    /// Envelope a blend of `aggregate` should target. Fine aggregate needs
    /// a zone; coarse aggregate ignores it.
    pub fn target_table(&self, aggregate: AggregateType, zone: Option<Zone>) -> Option<&SpecTable> {
        match aggregate {
            AggregateType::Fine(kind) => zone.and_then(|z| self.zone_table(kind, z)),
            AggregateType::Coarse(grading) => self.coarse_table(grading),
        }
    }
}

impl Default for SpecLibrary {
    fn default() -> Self {
        Self::is383()
    }
}

/// Fine-aggregate rows `(sieve mm, min, max)` for one zone and sand kind.
fn zone_rows(zone: Zone, kind: FineAggregateKind) -> [(f64, f64, f64); 7] {
    let (r475, r236, r118, r060, r030) = match zone {
        Zone::ZoneI => ((90.0, 100.0), (60.0, 95.0), (30.0, 70.0), (15.0, 34.0), (5.0, 20.0)),
        Zone::ZoneII => ((90.0, 100.0), (75.0, 100.0), (55.0, 90.0), (35.0, 59.0), (8.0, 30.0)),
        Zone::ZoneIII => ((90.0, 100.0), (85.0, 100.0), (75.0, 100.0), (60.0, 79.0), (12.0, 40.0)),
        Zone::ZoneIV => ((95.0, 100.0), (95.0, 100.0), (90.0, 100.0), (80.0, 100.0), (15.0, 50.0)),
    };
    let r015_natural = match zone {
        Zone::ZoneIV => 15.0,
        Zone::ZoneI | Zone::ZoneII | Zone::ZoneIII => 10.0,
    };
    let r015_max = match kind {
        FineAggregateKind::NaturalSand => r015_natural,
        FineAggregateKind::CrushedSand => 20.0,
    };
    [
        (10.0, 100.0, 100.0),
        (4.75, r475.0, r475.1),
        (2.36, r236.0, r236.1),
        (1.18, r118.0, r118.1),
        (0.6, r060.0, r060.1),
        (0.3, r030.0, r030.1),
        (0.15, 0.0, r015_max),
    ]
}

/// Coarse-aggregate rows `(sieve mm, min, max)`; only tabulated sieves appear.
fn coarse_rows(grading: CoarseGrading) -> &'static [(f64, f64, f64)] {
    match grading {
        CoarseGrading::Graded40 => &[
            (80.0, 100.0, 100.0),
            (40.0, 90.0, 100.0),
            (20.0, 30.0, 70.0),
            (10.0, 10.0, 35.0),
            (4.75, 0.0, 5.0),
        ],
        CoarseGrading::Graded20 => &[
            (40.0, 100.0, 100.0),
            (20.0, 90.0, 100.0),
            (10.0, 25.0, 55.0),
            (4.75, 0.0, 10.0),
        ],
        CoarseGrading::Graded16 => &[
            (20.0, 100.0, 100.0),
            (16.0, 90.0, 100.0),
            (10.0, 30.0, 70.0),
            (4.75, 0.0, 10.0),
        ],
        CoarseGrading::Graded12_5 => &[
            (20.0, 100.0, 100.0),
            (12.5, 90.0, 100.0),
            (10.0, 40.0, 85.0),
            (4.75, 0.0, 10.0),
        ],
        CoarseGrading::SingleSize63 => &[
            (80.0, 100.0, 100.0),
            (63.0, 85.0, 100.0),
            (40.0, 0.0, 30.0),
            (20.0, 0.0, 5.0),
            (10.0, 0.0, 5.0),
        ],
        CoarseGrading::SingleSize40 => &[
            (63.0, 100.0, 100.0),
            (40.0, 85.0, 100.0),
            (20.0, 0.0, 20.0),
            (10.0, 0.0, 5.0),
        ],
        CoarseGrading::SingleSize20 => &[
            (40.0, 100.0, 100.0),
            (20.0, 85.0, 100.0),
            (10.0, 0.0, 20.0),
            (4.75, 0.0, 5.0),
        ],
        CoarseGrading::SingleSize16 => &[
            (20.0, 100.0, 100.0),
            (16.0, 85.0, 100.0),
            (10.0, 0.0, 30.0),
            (4.75, 0.0, 5.0),
        ],
        CoarseGrading::SingleSize12_5 => &[
            (16.0, 100.0, 100.0),
            (12.5, 85.0, 100.0),
            (10.0, 0.0, 45.0),
            (4.75, 0.0, 10.0),
        ],
        CoarseGrading::SingleSize10 => &[
            (12.5, 100.0, 100.0),
            (10.0, 85.0, 100.0),
            (4.75, 0.0, 20.0),
            (2.36, 0.0, 5.0),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{COARSE_SIEVES, FINE_SIEVES};
    use crate::sieve::SieveSize;

    fn sieve(mm: f64) -> SieveSize {
        SieveSize::new(mm).unwrap()
    }

    #[test]
    fn is383_has_every_table() {
        let lib = SpecLibrary::is383();
        for &kind in FineAggregateKind::all() {
            assert_eq!(lib.zone_tables(kind).len(), 4);
        }
        for &grading in CoarseGrading::all() {
            assert!(lib.coarse_table(grading).is_some(), "missing {}", grading.as_str());
        }
        assert_eq!(lib.standard(), "IS 383:2016");
    }

    #[test]
    fn zone_variants_differ_only_at_150_micron() {
        let lib = SpecLibrary::is383();
        for &zone in Zone::all() {
            let natural = lib.zone_table(FineAggregateKind::NaturalSand, zone).unwrap();
            let crushed = lib.zone_table(FineAggregateKind::CrushedSand, zone).unwrap();
            for s in FINE_SIEVES {
                let (n, c) = (natural.limit_for(s).unwrap(), crushed.limit_for(s).unwrap());
                if s.matches(sieve(0.15)) {
                    assert_eq!(c.max(), 20.0);
                    assert!(n.max() < c.max());
                } else {
                    assert_eq!(n, c, "{zone} differs at {s}");
                }
            }
        }
    }

    #[test]
    fn zone_iii_600_micron_band() {
        let lib = SpecLibrary::is383();
        let t = lib.zone_table(FineAggregateKind::NaturalSand, Zone::ZoneIII).unwrap();
        let band = t.limit_for(sieve(0.6)).unwrap();
        assert_eq!((band.min(), band.max()), (60.0, 79.0));
        assert_eq!(t.name(), "Zone III (natural sand)");
    }

    #[test]
    fn coarse_tables_use_only_standard_sieves() {
        let lib = SpecLibrary::is383();
        for &grading in CoarseGrading::all() {
            for entry in lib.coarse_table(grading).unwrap().entries() {
                assert!(
                    COARSE_SIEVES.iter().any(|s| s.matches(entry.sieve)),
                    "{} uses non-standard sieve {}",
                    grading.as_str(),
                    entry.sieve
                );
            }
        }
    }

    #[test]
    fn target_table_needs_zone_for_fine() {
        let lib = SpecLibrary::is383();
        let fine = AggregateType::Fine(FineAggregateKind::NaturalSand);
        assert!(lib.target_table(fine, None).is_none());
        assert!(lib.target_table(fine, Some(Zone::ZoneII)).is_some());
        let coarse = AggregateType::Coarse(CoarseGrading::Graded20);
        assert_eq!(lib.target_table(coarse, None).unwrap().name(), "graded_20");
    }

    #[test]
    fn partial_library_from_yaml_like_json() {
        let json = r#"{
            "standard": "site spec",
            "coarse": {
                "graded_20": {"name": "site 20mm", "entries": [
                    {"sieve": 20, "limit": [85, 100]},
                    {"sieve": 4.75, "limit": [0, 8]}
                ]}
            }
        }"#;
        let lib: SpecLibrary = serde_json::from_str(json).unwrap();
        assert!(lib.coarse_table(CoarseGrading::Graded20).is_some());
        assert!(lib.coarse_table(CoarseGrading::Graded40).is_none());
        assert!(lib.zone_tables(FineAggregateKind::NaturalSand).is_empty());
    }

    #[test]
    fn library_serde_roundtrip() {
        let lib = SpecLibrary::is383();
        let json = serde_json::to_string(&lib).unwrap();
        let back: SpecLibrary = serde_json::from_str(&json).unwrap();
        assert_eq!(lib, back);
    }
}
