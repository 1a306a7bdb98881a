//! # sieve-cli — Command-Line Host
//!
//! Thin host over `sieve-core` and `sieve-blend`. Reads sample and blend
//! descriptions from YAML or JSON files, runs the engine, and prints JSON
//! for the downstream store and report tooling.
//!
//! ## Subcommands
//!
//! - `sieve gradation` — curves, fineness modulus, and classification for
//!   one sieve analysis.
//! - `sieve blend` — optimal proportions of several materials against an
//!   IS 383 envelope.
//! - `sieve tables` — list the specification tables in use.
//!
//! ```bash
//! sieve gradation samples/river-sand.yaml
//! sieve blend plant/mix-20mm.yaml --step 1
//! sieve --spec-library site-spec.yaml tables natural_sand
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take parsed args.
//! - Handlers return an exit code; engine logic stays in the library crates.

pub mod blend;
pub mod gradation;
pub mod tables;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use sieve_core::SpecLibrary;

/// Read a YAML or JSON document. `.json` files are parsed as JSON; anything
/// else as YAML, which also accepts JSON.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).with_context(|| format!("parsing JSON: {}", path.display()))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("parsing YAML: {}", path.display()))
    }
}

/// The built-in IS 383 library, or the one at `path`.
pub fn load_library(path: Option<&Path>) -> Result<Arc<SpecLibrary>> {
    let library = match path {
        Some(path) => {
            let library: SpecLibrary = load_document(path)?;
            tracing::info!(
                path = %path.display(),
                standard = library.standard(),
                "loaded spec library"
            );
            library
        }
        None => SpecLibrary::is383(),
    };
    Ok(Arc::new(library))
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{out}");
    Ok(())
}
