//! Screens a cleaned trip export for outliers and prints the most frequent trip attributes.

#[macro_use]
extern crate log;

mod cli;

use std::io;
use std::process;

use tracing_subscriber::EnvFilter;
use trip_stats::{csv_input, log_error, Result};

use crate::cli::{Args, OutputFormat};

fn init_logging(args: &Args) {
    let default = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let analysis = args.analysis()?;
    let loaded = csv_input::load_trips(&args.input)?;
    if loaded.trips.is_empty() {
        warn!("No trips found in {:?}", args.input);
    }

    let report = analysis.run(&loaded.trips);

    let stdout = io::stdout();
    let handle = stdout.lock();
    match args.output_format {
        OutputFormat::Text => report.write_text(handle),
        OutputFormat::Json => report.write_json(handle),
    }
}

fn main() {
    let args = cli::parse_args();
    init_logging(&args);

    if let Err(e) = run(&args) {
        log_error(&e);
        process::exit(1);
    }
}
