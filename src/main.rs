//! Tap Fares CLI
//!
//! Reads a CSV of card taps, matches them into trips, prices each trip and
//! writes the trips to a CSV file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- taps.csv trips.csv
//! cargo run -- --fares fares.csv data/taps.csv data/trips.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info`, `debug` or `warn` to control logging verbosity
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, path outside working directory, missing fare, etc.)

use clap::Parser;
use log::info;
use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::process;
use tap_fares::cli::CliArgs;
use tap_fares::paths::confine;
use tap_fares::{read_taps, write_trips, FareTable, Result, TripProcessor, TripSummary};

fn main() {
    env_logger::init();

    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let paths = resolve_paths(&args)?;
    info!("Processing taps from: {}", paths.taps.display());
    info!("Outputting trips to: {}", paths.trips.display());

    let fares = match &paths.fares {
        Some(path) => {
            info!("Loading fares from: {}", path.display());
            FareTable::from_csv(BufReader::new(File::open(path)?))?
        }
        None => FareTable::default_schedule(),
    };
    info!("Using fare table with {} routes", fares.len());

    let taps = read_taps(BufReader::new(File::open(&paths.taps)?))?;
    let tap_count = taps.len();

    let trips = TripProcessor::new(fares).generate_trips(taps)?;

    // Trips are fully generated before the output file is touched.
    let mut output = Vec::new();
    write_trips(&trips, &mut output)?;
    fs::write(&paths.trips, output)?;

    let summary = TripSummary::new(tap_count, &trips);
    info!(
        "Processed {} taps into {} trips ({} completed, {} cancelled, {} incomplete)",
        summary.taps,
        summary.trips(),
        summary.completed,
        summary.cancelled,
        summary.incomplete
    );

    Ok(())
}

/// Every file the run reads or writes.
struct RunPaths {
    taps: PathBuf,
    trips: PathBuf,
    fares: Option<PathBuf>,
}

fn resolve_paths(args: &CliArgs) -> Result<RunPaths> {
    if args.allow_outside_cwd {
        return Ok(RunPaths {
            taps: args.taps.clone(),
            trips: args.trips.clone(),
            fares: args.fares.clone(),
        });
    }

    let base = env::current_dir()?;
    Ok(RunPaths {
        taps: confine(&base, &args.taps)?,
        trips: confine(&base, &args.trips)?,
        fares: args.fares.as_deref().map(|path| confine(&base, path)).transpose()?,
    })
}
