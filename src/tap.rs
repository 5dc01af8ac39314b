//! Tap models for CSV parsing and internal representation.

use crate::error::{EngineError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Timestamp layout used by both the taps input and the trips output.
pub const DATE_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A named stop in the transit network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stop {
    Stop1,
    Stop2,
    Stop3,
}

impl Stop {
    /// Every stop in the network, in declaration order.
    pub const ALL: [Stop; 3] = [Stop::Stop1, Stop::Stop2, Stop::Stop3];

    /// Canonical upper-case name, e.g. `STOP1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stop::Stop1 => "STOP1",
            Stop::Stop2 => "STOP2",
            Stop::Stop3 => "STOP3",
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stop {
    type Err = String;

    /// Accepts any casing of the stop name, so `STOP1`, `Stop1` and `stop1`
    /// are all the same stop.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Stop::ALL
            .into_iter()
            .find(|stop| stop.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown stop '{}'", trimmed))
    }
}

/// Direction of a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapType {
    On,
    Off,
}

impl FromStr for TapType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(TapType::On),
            "OFF" => Ok(TapType::Off),
            other => Err(format!("unknown tap type '{}'", other)),
        }
    }
}

/// Raw tap row as read from CSV.
///
/// Fields are read by position: `ID, DateTimeUTC, TapType, StopId, CompanyId, BusID, PAN`.
#[derive(Debug, Deserialize)]
pub struct TapRecord {
    pub id: String,
    pub date_time_utc: String,
    pub tap_type: String,
    pub stop_id: String,
    pub company_id: String,
    pub bus_id: String,
    pub pan: String,
}

impl TapRecord {
    /// Number of columns a usable row must carry.
    pub const COLUMNS: usize = 7;

    /// Validates the raw row into a typed tap.
    ///
    /// `row` is only used to label the error.
    pub fn parse(&self, row: usize) -> Result<TapEvent> {
        let invalid = |message: String| EngineError::InvalidRecord { row, message };

        let timestamp = NaiveDateTime::parse_from_str(self.date_time_utc.trim(), DATE_TIME_FORMAT)
            .map_err(|e| invalid(format!("bad timestamp '{}': {}", self.date_time_utc, e)))?
            .and_utc();
        let tap_type = TapType::from_str(&self.tap_type).map_err(invalid)?;
        let stop = Stop::from_str(&self.stop_id).map_err(invalid)?;

        Ok(TapEvent {
            id: self.id.trim().to_string(),
            timestamp,
            tap_type,
            stop,
            company_id: self.company_id.trim().to_string(),
            bus_id: self.bus_id.trim().to_string(),
            pan: self.pan.trim().to_string(),
        })
    }
}

/// A validated tap ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub tap_type: TapType,
    pub stop: Stop,
    pub company_id: String,
    pub bus_id: String,
    /// Card identifier the tap belongs to.
    pub pan: String,
}
