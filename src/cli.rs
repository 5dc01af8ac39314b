//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Turn transit card taps into priced trips
#[derive(Parser, Debug)]
#[command(name = "tap-fares")]
#[command(about = "Turn transit card taps into priced trips", long_about = None)]
pub struct CliArgs {
    /// Input CSV file of taps
    #[arg(value_name = "TAPS", default_value = "taps.csv")]
    pub taps: PathBuf,

    /// Output CSV file for trips
    #[arg(value_name = "TRIPS", default_value = "trips.csv")]
    pub trips: PathBuf,

    /// Fare schedule CSV (`from,to,amount`); the built-in schedule is used if omitted
    #[arg(long = "fares", value_name = "PATH")]
    pub fares: Option<PathBuf>,

    /// Allow input and output paths outside the current directory
    #[arg(long = "allow-outside-cwd")]
    pub allow_outside_cwd: bool,
}
