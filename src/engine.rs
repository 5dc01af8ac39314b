//! Trip generation across all cards.
//!
//! Taps are grouped by card, each card's taps are sorted by time and run
//! through their own [`CardTripMatcher`], and the resulting trips are merged
//! into one list ordered by start time and then card.

use crate::error::Result;
use crate::fare::FareTable;
use crate::matcher::CardTripMatcher;
use crate::tap::TapEvent;
use crate::trip::{Trip, TripStatus};
use log::debug;
use std::collections::HashMap;

/// Converts taps into trips using a fixed fare table.
///
/// # Output Ordering
///
/// Trips are sorted by start time, then by PAN. Sorting is stable, so two
/// trips of the same card with the same start keep the order they were
/// emitted in.
pub struct TripProcessor {
    fares: FareTable,
}

impl TripProcessor {
    pub fn new(fares: FareTable) -> Self {
        TripProcessor { fares }
    }

    /// Generates every trip for the given taps.
    ///
    /// Fails as a whole if any completed trip has no fare; no partial list is
    /// returned.
    pub fn generate_trips(&self, taps: Vec<TapEvent>) -> Result<Vec<Trip>> {
        let mut trips = Vec::new();

        for (pan, card_taps) in group_by_card(taps) {
            debug!("Matching {} taps for card {}", card_taps.len(), pan);
            self.match_card(card_taps, &mut trips)?;
        }

        trips.sort_by(|a, b| a.started.cmp(&b.started).then_with(|| a.pan.cmp(&b.pan)));
        Ok(trips)
    }

    /// Runs one card's taps through a fresh matcher.
    fn match_card(&self, mut taps: Vec<TapEvent>, trips: &mut Vec<Trip>) -> Result<()> {
        // Stable: taps sharing a timestamp stay in input order
        taps.sort_by_key(|tap| tap.timestamp);

        let mut matcher = CardTripMatcher::new(&self.fares);
        for tap in taps {
            if let Some(trip) = matcher.feed(tap)? {
                debug!("Card {}: {} trip from {:?}", trip.pan, trip.status, trip.from_stop);
                trips.push(trip);
            }
        }
        trips.extend(matcher.finish());

        Ok(())
    }
}

impl Default for TripProcessor {
    fn default() -> Self {
        Self::new(FareTable::default_schedule())
    }
}

/// Splits taps into one list per card, keeping input order within each list.
fn group_by_card(taps: Vec<TapEvent>) -> HashMap<String, Vec<TapEvent>> {
    let mut groups: HashMap<String, Vec<TapEvent>> = HashMap::new();
    for tap in taps {
        groups.entry(tap.pan.clone()).or_default().push(tap);
    }
    groups
}

/// Counts of a finished run, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripSummary {
    pub taps: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub incomplete: usize,
}

impl TripSummary {
    pub fn new(taps: usize, trips: &[Trip]) -> Self {
        let count = |status: TripStatus| trips.iter().filter(|t| t.status == status).count();
        TripSummary {
            taps,
            completed: count(TripStatus::Completed),
            cancelled: count(TripStatus::Cancelled),
            incomplete: count(TripStatus::Incomplete),
        }
    }

    pub fn trips(&self) -> usize {
        self.completed + self.cancelled + self.incomplete
    }
}
