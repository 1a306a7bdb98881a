//! # sieve CLI entry point
//!
//! Parses command-line arguments, loads the specification library, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sieve_cli::blend::{run_blend, BlendArgs};
use sieve_cli::gradation::{run_gradation, GradationArgs};
use sieve_cli::tables::{run_tables, TablesArgs};

/// Aggregate gradation toolkit (IS 383).
///
/// Computes sieve-analysis curves, fineness modulus, and zone/grading
/// classification, and finds optimal blend proportions of several
/// materials against a specification envelope.
#[derive(Parser, Debug)]
#[command(name = "sieve", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    /// Specification library to use instead of the built-in IS 383 tables.
    #[arg(long, global = true)]
    spec_library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse one sieve test: curves, fineness modulus, classification.
    Gradation(GradationArgs),

    /// Find optimal blend proportions against a specification envelope.
    Blend(BlendArgs),

    /// List the specification tables in use.
    Tables(TablesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "sieve CLI starting");

    let library = match sieve_cli::load_library(cli.spec_library.as_deref()) {
        Ok(library) => library,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Gradation(args) => run_gradation(&args, &library),
        Commands::Blend(args) => run_blend(&args, &library),
        Commands::Tables(args) => run_tables(&args, &library),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
