//! CSV input and output for taps and trips.

use crate::error::{EngineError, Result};
use crate::tap::{TapEvent, TapRecord, DATE_TIME_FORMAT};
use crate::trip::Trip;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

/// Column names written at the top of every trips file.
pub const TRIPS_HEADER: [&str; 10] = [
    "Started",
    "Finished",
    "DurationSecs",
    "FromStopId",
    "ToStopId",
    "ChargeAmount",
    "CompanyId",
    "BusID",
    "PAN",
    "Status",
];

/// Reads every usable tap from a CSV reader.
///
/// Rows that are too short, carry a bad timestamp, or name an unknown tap type
/// or stop are logged at warn level and skipped. Only failures of the reader
/// itself are returned as errors. Columns past the seventh are ignored.
pub fn read_taps<R: Read>(reader: R) -> Result<Vec<TapEvent>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut taps = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        if record.len() < TapRecord::COLUMNS {
            warn!(
                "Row {}: Expected {} columns, got {}, skipping",
                row_num,
                TapRecord::COLUMNS,
                record.len()
            );
            continue;
        }

        let parsed = record
            .deserialize::<TapRecord>(None)
            .map_err(EngineError::from)
            .and_then(|raw| raw.parse(row_num));
        match parsed {
            Ok(tap) => taps.push(tap),
            Err(e) => warn!("Row {}: {}, skipping", row_num, e),
        }
    }

    debug!("Read {} taps", taps.len());
    Ok(taps)
}

/// Writes trips as CSV.
///
/// Absent timestamps and stops become empty fields. An empty slice still
/// produces the header row.
pub fn write_trips<W: Write>(trips: &[Trip], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(TRIPS_HEADER)?;

    for trip in trips {
        csv_writer.write_record([
            format_time(Some(trip.started)),
            format_time(trip.finished),
            trip.duration_secs.to_string(),
            trip.from_stop.map(|s| s.to_string()).unwrap_or_default(),
            trip.to_stop.map(|s| s.to_string()).unwrap_or_default(),
            trip.charge.currency(),
            trip.company_id.clone(),
            trip.bus_id.clone(),
            trip.pan.clone(),
            trip.status.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}
