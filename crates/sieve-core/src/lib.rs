//! # sieve-core — Gradation Engine Foundations
//!
//! This crate holds everything about a single aggregate sample: the IS 383
//! specification tables, the sieve-analysis calculator, the fineness
//! modulus, and the zone/conformance classifier. `sieve-blend` builds on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for domain primitives.** `SieveSize`, `SpecLimit`, and
//!    `WeightSeries` validate on construction. A calculator that receives a
//!    `WeightSeries` never re-checks for negative weights.
//!
//! 2. **Closed tagged unions.** `AggregateType = Fine(FineAggregateKind) |
//!    Coarse(CoarseGrading)`; every dispatch is an exhaustive `match`.
//!
//! 3. **Tables are injected, not global.** `SpecLibrary` is built once and
//!    shared via `Arc` into the `Classifier` (and into the blend optimizer's
//!    callers). Nothing mutates it.
//!
//! 4. **Domain outcomes are values.** Zero-weight samples, missing sieves,
//!    and unknown gradings produce results, not errors. `SieveError` is
//!    reserved for misaligned inputs and input validation.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Pure functions only: no I/O, no process-wide mutable state.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod fineness;
pub mod gradation;
pub mod limits;
pub mod sieve;
pub mod summary;
pub mod tables;

// Re-export primary types for ergonomic imports.
pub use aggregate::{
    AggregateType, CoarseGrading, FineAggregateKind, Zone, COARSE_SIEVES, FINE_SIEVES,
};
pub use classify::{CheckStatus, Classification, Classifier, SieveCheck, ZONE_DISCRIMINATOR_SIEVE};
pub use error::SieveError;
pub use fineness::{fineness_modulus, FINENESS_SIEVES};
pub use gradation::{calculate, GradationResult, WeightSeries};
pub use limits::{SpecEntry, SpecLimit, SpecTable, LIMIT_TOLERANCE};
pub use sieve::SieveSize;
pub use summary::GradationSummary;
pub use tables::SpecLibrary;
