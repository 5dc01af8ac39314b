//! Trip records and their assembly from matched taps.

use crate::decimal::Decimal2;
use crate::tap::{Stop, TapEvent};
use chrono::{DateTime, Utc};
use std::fmt;

/// Outcome of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripStatus {
    /// ON and OFF at different stops.
    Completed,
    /// ON and OFF at the same stop. Never charged.
    Cancelled,
    /// ON with no closing OFF. Charged the maximum fare from the ON stop.
    Incomplete,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
            TripStatus::Incomplete => "INCOMPLETE",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A billed (or zero-charge) journey for one card.
///
/// # Invariants
///
/// - `duration_secs == finished - started` when `finished` is present, else `0`
/// - `Cancelled` trips carry a zero charge
/// - `Incomplete` trips have neither `finished` nor `to_stop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub duration_secs: i64,
    pub from_stop: Option<Stop>,
    pub to_stop: Option<Stop>,
    pub charge: Decimal2,
    pub company_id: String,
    pub bus_id: String,
    pub pan: String,
    pub status: TripStatus,
}

/// Builds a trip from its ON tap, optional OFF tap and an already-resolved charge.
///
/// Company, bus and card are always taken from the ON tap: a trip belongs to
/// the vehicle it started on.
pub fn assemble(on: &TapEvent, off: Option<&TapEvent>, charge: Decimal2, status: TripStatus) -> Trip {
    let finished = off.map(|tap| tap.timestamp);
    let duration_secs = finished
        .map(|end| (end - on.timestamp).num_seconds())
        .unwrap_or(0);

    Trip {
        started: on.timestamp,
        finished,
        duration_secs,
        from_stop: Some(on.stop),
        to_stop: off.map(|tap| tap.stop),
        charge,
        company_id: on.company_id.clone(),
        bus_id: on.bus_id.clone(),
        pan: on.pan.clone(),
        status,
    }
}
