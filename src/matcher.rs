//! Per-card tap matching.
//!
//! A card is either idle or holds exactly one open ON tap. Every way out of
//! the open state (a new ON, an OFF, or the end of the card's taps) emits one
//! trip.

use crate::decimal::Decimal2;
use crate::error::Result;
use crate::fare::FareTable;
use crate::tap::{TapEvent, TapType};
use crate::trip::{assemble, Trip, TripStatus};
use log::debug;

#[derive(Debug)]
enum MatcherState {
    Idle,
    Open(TapEvent),
}

/// Turns one card's chronologically sorted taps into trips.
///
/// A matcher lives for a single pass over a single card and is consumed by
/// [`CardTripMatcher::finish`].
#[derive(Debug)]
pub struct CardTripMatcher<'a> {
    fares: &'a FareTable,
    state: MatcherState,
}

impl<'a> CardTripMatcher<'a> {
    pub fn new(fares: &'a FareTable) -> Self {
        CardTripMatcher {
            fares,
            state: MatcherState::Idle,
        }
    }

    /// Returns `true` while an ON tap is waiting for its OFF.
    pub fn is_open(&self) -> bool {
        matches!(self.state, MatcherState::Open(_))
    }

    /// Feeds the next tap for this card.
    ///
    /// Returns the trip closed by this tap, if any. An OFF with no open ON
    /// closes nothing and is dropped.
    pub fn feed(&mut self, tap: TapEvent) -> Result<Option<Trip>> {
        let previous = std::mem::replace(&mut self.state, MatcherState::Idle);

        match (previous, tap.tap_type) {
            (MatcherState::Idle, TapType::On) => {
                self.state = MatcherState::Open(tap);
                Ok(None)
            }
            (MatcherState::Open(pending), TapType::On) => {
                self.state = MatcherState::Open(tap);
                Ok(Some(self.incomplete(&pending)))
            }
            (MatcherState::Idle, TapType::Off) => {
                debug!(
                    "Tap {}: OFF at {} for card {} has no open ON, ignoring",
                    tap.id, tap.stop, tap.pan
                );
                Ok(None)
            }
            (MatcherState::Open(pending), TapType::Off) => {
                let trip = if pending.stop == tap.stop {
                    assemble(&pending, Some(&tap), Decimal2::ZERO, TripStatus::Cancelled)
                } else {
                    let charge = self.fares.cost(pending.stop, tap.stop)?;
                    assemble(&pending, Some(&tap), charge, TripStatus::Completed)
                };
                Ok(Some(trip))
            }
        }
    }

    /// Ends the pass, emitting an incomplete trip for any ON still open.
    pub fn finish(self) -> Option<Trip> {
        match &self.state {
            MatcherState::Open(pending) => Some(self.incomplete(pending)),
            MatcherState::Idle => None,
        }
    }

    fn incomplete(&self, on: &TapEvent) -> Trip {
        assemble(on, None, self.fares.max_fare(on.stop), TripStatus::Incomplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::tap::Stop;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn tap(tap_type: TapType, stop: Stop, h: u32, m: u32) -> TapEvent {
        TapEvent {
            id: format!("{}{}", h, m),
            timestamp: Utc.with_ymd_and_hms(2023, 1, 22, h, m, 0).unwrap(),
            tap_type,
            stop,
            company_id: "Company1".to_string(),
            bus_id: "Bus37".to_string(),
            pan: "5500005555555559".to_string(),
        }
    }

    fn run(fares: &FareTable, taps: Vec<TapEvent>) -> Result<Vec<Trip>> {
        let mut matcher = CardTripMatcher::new(fares);
        let mut trips = Vec::new();
        for tap in taps {
            trips.extend(matcher.feed(tap)?);
        }
        trips.extend(matcher.finish());
        Ok(trips)
    }

    #[test]
    fn test_on_then_off_at_other_stop_completes() {
        let fares = FareTable::default_schedule();
        let trips = run(
            &fares,
            vec![
                tap(TapType::On, Stop::Stop2, 9, 5),
                tap(TapType::Off, Stop::Stop3, 9, 10),
            ],
        )
        .unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].status, TripStatus::Completed);
        assert_eq!(trips[0].charge, Decimal2::from_str("5.50").unwrap());
        assert_eq!(trips[0].duration_secs, 300);
    }

    #[test]
    fn test_on_then_off_at_same_stop_cancels() {
        let fares = FareTable::new(vec![(Stop::Stop3, Stop::Stop3, Decimal2::from_str("2.00").unwrap())])
            .unwrap();
        let trips = run(
            &fares,
            vec![
                tap(TapType::On, Stop::Stop3, 11, 0),
                tap(TapType::Off, Stop::Stop3, 11, 5),
            ],
        )
        .unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].status, TripStatus::Cancelled);
        assert!(trips[0].charge.is_zero());
    }

    #[test]
    fn test_second_on_supersedes_first() {
        let fares = FareTable::default_schedule();
        let trips = run(
            &fares,
            vec![
                tap(TapType::On, Stop::Stop1, 9, 0),
                tap(TapType::On, Stop::Stop2, 9, 5),
                tap(TapType::Off, Stop::Stop3, 9, 10),
            ],
        )
        .unwrap();

        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].status, TripStatus::Incomplete);
        assert_eq!(trips[0].from_stop, Some(Stop::Stop1));
        assert_eq!(trips[0].charge, Decimal2::from_str("7.30").unwrap());
        assert_eq!(trips[1].status, TripStatus::Completed);
        assert_eq!(trips[1].from_stop, Some(Stop::Stop2));
    }

    #[test]
    fn test_off_without_on_is_dropped() {
        let fares = FareTable::default_schedule();
        let mut matcher = CardTripMatcher::new(&fares);

        assert!(matcher.feed(tap(TapType::Off, Stop::Stop1, 9, 0)).unwrap().is_none());
        assert!(!matcher.is_open());
        assert!(matcher.finish().is_none());
    }

    #[test]
    fn test_dropped_off_does_not_disturb_later_trips() {
        let fares = FareTable::default_schedule();
        let trips = run(
            &fares,
            vec![
                tap(TapType::Off, Stop::Stop3, 8, 0),
                tap(TapType::On, Stop::Stop1, 9, 0),
                tap(TapType::Off, Stop::Stop2, 9, 15),
                tap(TapType::Off, Stop::Stop1, 9, 30),
            ],
        )
        .unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].status, TripStatus::Completed);
        assert_eq!(trips[0].from_stop, Some(Stop::Stop1));
        assert_eq!(trips[0].to_stop, Some(Stop::Stop2));
        assert_eq!(trips[0].charge, Decimal2::from_str("3.25").unwrap());
    }

    #[test]
    fn test_unclosed_on_is_flushed_at_finish() {
        let fares = FareTable::default_schedule();
        let mut matcher = CardTripMatcher::new(&fares);

        assert!(matcher.feed(tap(TapType::On, Stop::Stop2, 12, 0)).unwrap().is_none());
        assert!(matcher.is_open());

        let trip = matcher.finish().unwrap();
        assert_eq!(trip.status, TripStatus::Incomplete);
        assert_eq!(trip.charge, Decimal2::from_str("5.50").unwrap());
        assert_eq!(trip.finished, None);
    }

    #[test]
    fn test_missing_route_aborts() {
        let fares = FareTable::new(vec![(Stop::Stop1, Stop::Stop2, Decimal2::from_str("3.25").unwrap())])
            .unwrap();
        let result = run(
            &fares,
            vec![
                tap(TapType::On, Stop::Stop1, 9, 0),
                tap(TapType::Off, Stop::Stop3, 9, 30),
            ],
        );

        assert!(matches!(result, Err(EngineError::RouteNotFound { .. })));
    }
}
