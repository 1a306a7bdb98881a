//! # Aggregate Types — Closed Tagged Unions
//!
//! Defines the aggregate classifications recognised by IS 383:
//!
//! - [`FineAggregateKind`]: natural sand or crushed (manufactured) sand. The
//!   two share every zone boundary except the 0.15 mm limit.
//! - [`Zone`]: fine-aggregate grading zones I–IV.
//! - [`CoarseGrading`]: graded and single-size coarse aggregate by nominal size.
//! - [`AggregateType`]: `Fine(kind) | Coarse(grading)`.
//!
//! Every `match` on these enums is exhaustive. Adding a grading forces the
//! specification tables and the CLI parser to handle it at compile time.
//!
//! All identifiers round-trip through stable snake_case strings
//! ([`AggregateType::as_str`] / [`FromStr`]), which is also the serde format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SieveError;
use crate::sieve::SieveSize;

/// IS 383 fine-aggregate sieve set, largest first.
pub const FINE_SIEVES: [SieveSize; 7] = [
    SieveSize::from_table(10.0),
    SieveSize::from_table(4.75),
    SieveSize::from_table(2.36),
    SieveSize::from_table(1.18),
    SieveSize::from_table(0.6),
    SieveSize::from_table(0.3),
    SieveSize::from_table(0.15),
];

/// IS 383 coarse-aggregate sieve set, largest first.
pub const COARSE_SIEVES: [SieveSize; 9] = [
    SieveSize::from_table(80.0),
    SieveSize::from_table(63.0),
    SieveSize::from_table(40.0),
    SieveSize::from_table(20.0),
    SieveSize::from_table(16.0),
    SieveSize::from_table(12.5),
    SieveSize::from_table(10.0),
    SieveSize::from_table(4.75),
    SieveSize::from_table(2.36),
];

/// Origin of a fine aggregate; selects the zone-table variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineAggregateKind {
    /// Natural sand (river or pit sand). Tighter 0.15 mm limit.
    NaturalSand,
    /// Crushed stone or manufactured sand. Looser 0.15 mm limit.
    CrushedSand,
}

impl FineAggregateKind {
    pub fn all() -> &'static [FineAggregateKind] {
        &[Self::NaturalSand, Self::CrushedSand]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaturalSand => "natural_sand",
            Self::CrushedSand => "crushed_sand",
        }
    }
}

/// Fine-aggregate grading zone, coarsest (I) to finest (IV).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "zone_i")]
    ZoneI,
    #[serde(rename = "zone_ii")]
    ZoneII,
    #[serde(rename = "zone_iii")]
    ZoneIII,
    #[serde(rename = "zone_iv")]
    ZoneIV,
}

impl Zone {
    /// Zones in the declared search order used by the classifier.
    pub fn all() -> &'static [Zone] {
        &[Self::ZoneI, Self::ZoneII, Self::ZoneIII, Self::ZoneIV]
    }

    /// Snake_case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZoneI => "zone_i",
            Self::ZoneII => "zone_ii",
            Self::ZoneIII => "zone_iii",
            Self::ZoneIV => "zone_iv",
        }
    }

    /// Display name as printed in IS 383 ("Zone III").
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZoneI => "Zone I",
            Self::ZoneII => "Zone II",
            Self::ZoneIII => "Zone III",
            Self::ZoneIV => "Zone IV",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Zone {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::all()
            .iter()
            .copied()
            .find(|z| z.as_str() == s)
            .ok_or_else(|| SieveError::UnknownZone(s.to_string()))
    }
}

/// Coarse-aggregate grading by nominal size (IS 383 Table 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoarseGrading {
    #[serde(rename = "graded_40")]
    Graded40,
    #[serde(rename = "graded_20")]
    Graded20,
    #[serde(rename = "graded_16")]
    Graded16,
    #[serde(rename = "graded_12_5")]
    Graded12_5,
    #[serde(rename = "single_size_63")]
    SingleSize63,
    #[serde(rename = "single_size_40")]
    SingleSize40,
    #[serde(rename = "single_size_20")]
    SingleSize20,
    #[serde(rename = "single_size_16")]
    SingleSize16,
    #[serde(rename = "single_size_12_5")]
    SingleSize12_5,
    #[serde(rename = "single_size_10")]
    SingleSize10,
}

impl CoarseGrading {
    pub fn all() -> &'static [CoarseGrading] {
        &[
            Self::Graded40,
            Self::Graded20,
            Self::Graded16,
            Self::Graded12_5,
            Self::SingleSize63,
            Self::SingleSize40,
            Self::SingleSize20,
            Self::SingleSize16,
            Self::SingleSize12_5,
            Self::SingleSize10,
        ]
    }

    /// Snake_case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graded40 => "graded_40",
            Self::Graded20 => "graded_20",
            Self::Graded16 => "graded_16",
            Self::Graded12_5 => "graded_12_5",
            Self::SingleSize63 => "single_size_63",
            Self::SingleSize40 => "single_size_40",
            Self::SingleSize20 => "single_size_20",
            Self::SingleSize16 => "single_size_16",
            Self::SingleSize12_5 => "single_size_12_5",
            Self::SingleSize10 => "single_size_10",
        }
    }

    /// Nominal aggregate size in millimetres.
    pub fn nominal_size_mm(&self) -> f64 {
        match self {
            Self::SingleSize63 => 63.0,
            Self::Graded40 | Self::SingleSize40 => 40.0,
            Self::Graded20 | Self::SingleSize20 => 20.0,
            Self::Graded16 | Self::SingleSize16 => 16.0,
            Self::Graded12_5 | Self::SingleSize12_5 => 12.5,
            Self::SingleSize10 => 10.0,
        }
    }

    pub fn is_single_size(&self) -> bool {
        match self {
            Self::Graded40 | Self::Graded20 | Self::Graded16 | Self::Graded12_5 => false,
            Self::SingleSize63
            | Self::SingleSize40
            | Self::SingleSize20
            | Self::SingleSize16
            | Self::SingleSize12_5
            | Self::SingleSize10 => true,
        }
    }
}

/// The aggregate being tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregateType {
    Fine(FineAggregateKind),
    Coarse(CoarseGrading),
}

impl AggregateType {
    /// Every aggregate type, fine kinds first.
    pub fn all() -> Vec<AggregateType> {
        FineAggregateKind::all()
            .iter()
            .map(|&k| Self::Fine(k))
            .chain(CoarseGrading::all().iter().map(|&g| Self::Coarse(g)))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fine(kind) => kind.as_str(),
            Self::Coarse(grading) => grading.as_str(),
        }
    }

    /// The IS 383 sieve stack used to test this aggregate.
    pub fn standard_sieves(&self) -> &'static [SieveSize] {
        match self {
            Self::Fine(_) => &FINE_SIEVES,
            Self::Coarse(_) => &COARSE_SIEVES,
        }
    }

    pub fn is_fine(&self) -> bool {
        matches!(self, Self::Fine(_))
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateType {
    type Err = SieveError;

    /// Parse from the identifiers produced by [`AggregateType::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregateType::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SieveError::UnknownAggregateType(s.to_string()))
    }
}

impl TryFrom<String> for AggregateType {
    type Error = SieveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AggregateType> for String {
    fn from(t: AggregateType) -> String {
        t.as_str().to_string()
    }
}
