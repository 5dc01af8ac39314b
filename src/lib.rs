//! # Tap Fares
//!
//! Turns a stream of transit card taps into billed trips.
//!
//! ## Design Principles
//!
//! - **Per-card state machine**: each card is matched independently, holding at most one open ON tap
//! - **Symmetric fares**: fare lookups go through an order-independent route key
//! - **Fixed-point arithmetic**: charges use 2 decimal places via `rust_decimal`
//! - **All or nothing**: a completed trip with no fare fails the whole run
//! - **Deterministic output**: trips sorted by start time, then card
//!
//! ## Example
//!
//! ```no_run
//! use tap_fares::{read_taps, write_trips, TripProcessor};
//! use std::io::Cursor;
//!
//! let csv = "ID,DateTimeUTC,TapType,StopId,CompanyId,BusID,PAN\n\
//!            1,22-01-2023 13:00:00,ON,Stop1,Company1,Bus37,5500005555555559\n";
//! let taps = read_taps(Cursor::new(csv)).unwrap();
//! let trips = TripProcessor::default().generate_trips(taps).unwrap();
//! write_trips(&trips, std::io::stdout()).unwrap();
//! ```

pub mod cli;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod fare;
pub mod io;
pub mod matcher;
pub mod paths;
pub mod tap;
pub mod trip;

pub use decimal::Decimal2;
pub use engine::{TripProcessor, TripSummary};
pub use error::{EngineError, Result};
pub use fare::{FareTable, RouteKey};
pub use io::{read_taps, write_trips};
pub use matcher::CardTripMatcher;
pub use tap::{Stop, TapEvent, TapRecord, TapType};
pub use trip::{assemble, Trip, TripStatus};
