//! # sieve-blend — Multi-Material Blending
//!
//! Combines the passing curves of several aggregates and searches for the
//! proportion vector whose combined curve best fits a target envelope.
//!
//! - **Material** (`material.rs`): a named passing curve, with the
//!   off-curve rule used to align it to any target sieve set.
//!
//! - **Scoring** (`scoring.rs`): combined gradation and the envelope
//!   score. In-band sieves cost the squared distance to the band midpoint;
//!   out-of-band sieves cost a fixed penalty plus the squared deviation.
//!
//! - **Optimizer** (`optimizer.rs`): exhaustive search over proportions in
//!   fixed integer steps summing to 100.
//!
//! ## Determinism
//!
//! Enumeration order is fixed and ties keep the first candidate found, so
//! identical inputs always produce identical reports.

pub mod error;
pub mod material;
pub mod optimizer;
pub mod scoring;

pub use error::BlendError;
pub use material::{Material, PassingPoint};
pub use optimizer::{BlendOptimizer, BlendResult, Proportion, SearchReport, DEFAULT_STEP};
pub use scoring::{score_blend, BlendScore, SieveScore, NONCOMPLIANCE_PENALTY};
