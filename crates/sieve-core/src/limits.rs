//! # Passing Limits and Specification Tables
//!
//! A [`SpecLimit`] is a `[min, max]` percent-passing band for one sieve; a
//! [`SpecTable`] maps sieve openings to bands for one aggregate grading.
//! Tables are immutable once built and always hold their entries in
//! descending sieve order, the order in which a sieve stack is read.

use serde::{Deserialize, Serialize};

use crate::error::SieveError;
use crate::sieve::SieveSize;

/// Slack applied to band edges so float noise in a computed passing value
/// does not flip an exact-boundary sample to out of band.
pub const LIMIT_TOLERANCE: f64 = 1e-9;

/// Inclusive percent-passing band for one sieve.
///
/// Serialized compactly as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct SpecLimit {
    min: f64,
    max: f64,
}

impl SpecLimit {
    /// Create a band, enforcing `0 <= min <= max <= 100`.
    pub fn new(min: f64, max: f64) -> Result<Self, SieveError> {
        let valid = min.is_finite() && max.is_finite() && 0.0 <= min && min <= max && max <= 100.0;
        if valid {
            Ok(Self { min, max })
        } else {
            Err(SieveError::InvalidLimit { min, max })
        }
    }

    pub(crate) const fn from_table(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive containment check, within [`LIMIT_TOLERANCE`].
    pub fn contains(&self, passing: f64) -> bool {
        self.min - LIMIT_TOLERANCE <= passing && passing <= self.max + LIMIT_TOLERANCE
    }

    /// Centre of the band, used as the blend target.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Distance outside the nearest bound; zero when within the band.
    pub fn deviation(&self, passing: f64) -> f64 {
        if self.contains(passing) {
            0.0
        } else if passing < self.min {
            self.min - passing
        } else if passing > self.max {
            passing - self.max
        } else {
            0.0
        }
    }
}

impl TryFrom<[f64; 2]> for SpecLimit {
    type Error = SieveError;

    fn try_from([min, max]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<SpecLimit> for [f64; 2] {
    fn from(limit: SpecLimit) -> Self {
        [limit.min, limit.max]
    }
}

/// One row of a specification table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecEntry {
    /// Sieve opening.
    pub sieve: SieveSize,
    /// Permitted passing band at that sieve.
    pub limit: SpecLimit,
}

/// Sieve → passing band mapping for one aggregate grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpecTableDef")]
pub struct SpecTable {
    name: String,
    entries: Vec<SpecEntry>,
}

#[derive(Deserialize)]
struct SpecTableDef {
    name: String,
    entries: Vec<SpecEntry>,
}

impl From<SpecTableDef> for SpecTable {
    fn from(def: SpecTableDef) -> Self {
        SpecTable::new(def.name, def.entries)
    }
}

impl SpecTable {
    /// Build a table; entries are reordered largest sieve first.
    pub fn new(name: impl Into<String>, mut entries: Vec<SpecEntry>) -> Self {
        entries.sort_by(|a, b| b.sieve.mm().total_cmp(&a.sieve.mm()));
        Self {
            name: name.into(),
            entries,
        }
    }

    pub(crate) fn from_rows(name: &str, rows: &[(f64, f64, f64)]) -> Self {
        let entries = rows
            .iter()
            .map(|&(sieve, min, max)| SpecEntry {
                sieve: SieveSize::from_table(sieve),
                limit: SpecLimit::from_table(min, max),
            })
            .collect();
        Self::new(name, entries)
    }

    /// Human-readable table name (e.g. "Zone II (natural sand)").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Band at `sieve`, if tabulated.
    pub fn limit_for(&self, sieve: SieveSize) -> Option<SpecLimit> {
        self.entries
            .iter()
            .find(|e| e.sieve.matches(sieve))
            .map(|e| e.limit)
    }

    /// Rows in descending sieve order.
    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    /// Tabulated sieves in descending order.
    pub fn sieves(&self) -> Vec<SieveSize> {
        self.entries.iter().map(|e| e.sieve).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_rejects_inverted_or_out_of_range_bands() {
        assert!(SpecLimit::new(60.0, 40.0).is_err());
        assert!(SpecLimit::new(-1.0, 10.0).is_err());
        assert!(SpecLimit::new(90.0, 100.5).is_err());
        assert!(SpecLimit::new(f64::NAN, 10.0).is_err());
        assert!(SpecLimit::new(100.0, 100.0).is_ok());
    }

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let limit = SpecLimit::new(60.0, 79.0).unwrap();
        assert!(limit.contains(60.0));
        assert!(limit.contains(79.0));
        assert!(!limit.contains(59.999));
        assert!(!limit.contains(79.001));
    }

    #[test]
    fn float_noise_at_band_edges_is_contained() {
        let limit = SpecLimit::new(60.0, 79.0).unwrap();
        assert!(limit.contains(79.0 + 1e-12));
        assert!(limit.contains(60.0 - 1e-12));
        assert_eq!(limit.deviation(79.0 + 1e-12), 0.0);
        assert!(!limit.contains(79.0 + 1e-6));
        assert!(!limit.contains(60.0 - 1e-6));
        // 0.1 + 0.2 lands just above 0.3 in binary floating point.
        let tight = SpecLimit::new(0.0, 0.3).unwrap();
        assert!(tight.contains(0.1 + 0.2));
    }

    #[test]
    fn deviation_measures_distance_to_nearest_bound() {
        let limit = SpecLimit::new(25.0, 55.0).unwrap();
        assert_eq!(limit.deviation(40.0), 0.0);
        assert_eq!(limit.deviation(20.0), 5.0);
        assert_eq!(limit.deviation(58.0), 3.0);
        assert_eq!(limit.midpoint(), 40.0);
    }

    #[test]
    fn table_orders_entries_largest_sieve_first() {
        let rows = [(4.75, 0.0, 10.0), (20.0, 90.0, 100.0), (10.0, 25.0, 55.0)];
        let table = SpecTable::from_rows("t", &rows);
        let mm: Vec<f64> = table.sieves().iter().map(|s| s.mm()).collect();
        assert_eq!(mm, vec![20.0, 10.0, 4.75]);
    }

    #[test]
    fn limit_for_missing_sieve_is_none() {
        let table = SpecTable::from_rows("t", &[(20.0, 90.0, 100.0)]);
        assert!(table.limit_for(SieveSize::new(10.0).unwrap()).is_none());
        assert_eq!(
            table.limit_for(SieveSize::new(20.0).unwrap()),
            Some(SpecLimit::new(90.0, 100.0).unwrap())
        );
    }

    #[test]
    fn deserialized_table_is_sorted_and_validated() {
        let json = r#"{"name":"custom","entries":[
            {"sieve":4.75,"limit":[0,10]},
            {"sieve":20,"limit":[90,100]}
        ]}"#;
        let table: SpecTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.entries()[0].sieve.mm(), 20.0);

        let bad = r#"{"name":"bad","entries":[{"sieve":20,"limit":[100,90]}]}"#;
        assert!(serde_json::from_str::<SpecTable>(bad).is_err());
    }
}
