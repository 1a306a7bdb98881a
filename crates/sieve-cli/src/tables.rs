//! # Tables CLI — List the specification envelopes in use.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use sieve_core::{AggregateType, SpecLibrary, SpecTable};

/// Arguments for `sieve tables`.
#[derive(Args, Debug)]
pub struct TablesArgs {
    /// Only list tables for this aggregate type (e.g. natural_sand, graded_20).
    pub aggregate_type: Option<AggregateType>,

    /// Print the tables as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute `sieve tables`.
pub fn run_tables(args: &TablesArgs, library: &Arc<SpecLibrary>) -> Result<u8> {
    let tables = select(library, args.aggregate_type);
    if args.json {
        crate::print_json(&tables)?;
        return Ok(0);
    }

    println!("Standard: {}", library.standard());
    println!();
    for aggregate in types(args.aggregate_type) {
        let group = tables_for(library, aggregate);
        if group.is_empty() {
            continue;
        }
        println!("== {} ==", heading(aggregate));
        for table in group {
            print!("{}", render(table));
            println!();
        }
    }
    println!("Total: {} tables", tables.len());
    Ok(0)
}

fn types(aggregate: Option<AggregateType>) -> Vec<AggregateType> {
    match aggregate {
        Some(t) => vec![t],
        None => AggregateType::all(),
    }
}

/// Tables of the library for one aggregate type, or all of them.
pub fn select(library: &SpecLibrary, aggregate: Option<AggregateType>) -> Vec<&SpecTable> {
    types(aggregate)
        .into_iter()
        .flat_map(|t| tables_for(library, t))
        .collect()
}

fn tables_for(library: &SpecLibrary, aggregate: AggregateType) -> Vec<&SpecTable> {
    match aggregate {
        AggregateType::Fine(kind) => library
            .zone_tables(kind)
            .into_iter()
            .map(|(_, table)| table)
            .collect(),
        AggregateType::Coarse(grading) => library.coarse_table(grading).into_iter().collect(),
    }
}

/// Group title for one aggregate type, e.g. `graded_20: graded, 20 mm nominal`.
pub fn heading(aggregate: AggregateType) -> String {
    match aggregate {
        AggregateType::Fine(_) => format!("{aggregate}: fine aggregate, Zones I to IV"),
        AggregateType::Coarse(grading) => {
            let form = if grading.is_single_size() {
                "single-size"
            } else {
                "graded"
            };
            format!("{aggregate}: {form}, {} mm nominal", grading.nominal_size_mm())
        }
    }
}

/// Text block for one table: a title line, then one row per sieve.
pub fn render(table: &SpecTable) -> String {
    let mut out = format!("{}\n", table.name());
    for entry in table.entries() {
        out.push_str(&format!(
            "  {:>9}  {:>5} .. {:<5}\n",
            entry.sieve.to_string(),
            entry.limit.min(),
            entry.limit.max()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_core::{CoarseGrading, FineAggregateKind};

    #[test]
    fn all_tables_by_default() {
        let lib = SpecLibrary::is383();
        // 4 zones x 2 sand kinds + 10 coarse gradings.
        assert_eq!(select(&lib, None).len(), 18);
    }

    #[test]
    fn fine_type_lists_its_four_zones() {
        let lib = SpecLibrary::is383();
        let tables = select(&lib, Some(AggregateType::Fine(FineAggregateKind::CrushedSand)));
        assert_eq!(tables.len(), 4);
        assert!(tables[0].name().starts_with("Zone I "));
    }

    #[test]
    fn coarse_type_lists_one_table() {
        let lib = SpecLibrary::is383();
        let tables = select(&lib, Some(AggregateType::Coarse(CoarseGrading::Graded20)));
        assert_eq!(tables.len(), 1);
        let text = render(tables[0]);
        assert!(text.starts_with("graded_20\n"));
        assert!(text.contains("20 mm"));
        assert_eq!(text.lines().count(), 1 + tables[0].len());
    }

    #[test]
    fn headings_describe_the_grading() {
        assert_eq!(
            heading(AggregateType::Coarse(CoarseGrading::Graded20)),
            "graded_20: graded, 20 mm nominal"
        );
        assert_eq!(
            heading(AggregateType::Coarse(CoarseGrading::SingleSize12_5)),
            "single_size_12_5: single-size, 12.5 mm nominal"
        );
        assert_eq!(
            heading(AggregateType::Fine(FineAggregateKind::NaturalSand)),
            "natural_sand: fine aggregate, Zones I to IV"
        );
    }

    #[test]
    fn missing_tables_are_skipped() {
        let lib: SpecLibrary = serde_json::from_str(r#"{"standard":"empty"}"#).unwrap();
        assert!(select(&lib, None).is_empty());
        let args = TablesArgs {
            aggregate_type: None,
            json: true,
        };
        assert_eq!(run_tables(&args, &Arc::new(lib)).unwrap(), 0);
    }
}
