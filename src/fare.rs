//! Fare table: the price of travel between two stops.
//!
//! The table is undirected. Every lookup goes through [`RouteKey`], which
//! orders its two stops, so `cost(a, b)` and `cost(b, a)` always hit the same
//! entry.

use crate::decimal::Decimal2;
use crate::error::{EngineError, Result};
use crate::tap::Stop;
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

/// Unordered pair of stops, stored with the lower stop first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    low: Stop,
    high: Stop,
}

impl RouteKey {
    pub fn new(a: Stop, b: Stop) -> Self {
        if a <= b {
            RouteKey { low: a, high: b }
        } else {
            RouteKey { low: b, high: a }
        }
    }

    /// Returns `true` if either end of the route is `stop`.
    pub fn touches(&self, stop: Stop) -> bool {
        self.low == stop || self.high == stop
    }
}

/// One configured fare between two stops.
#[derive(Debug, Clone, Deserialize)]
pub struct FareEntry {
    pub from: String,
    pub to: String,
    pub amount: Decimal2,
}

impl FareEntry {
    /// Validates the raw row into `(stop, stop, amount)`.
    fn parse(&self, row: usize) -> Result<(Stop, Stop, Decimal2)> {
        let invalid = |message: String| EngineError::InvalidFare { row, message };

        let from = Stop::from_str(&self.from).map_err(invalid)?;
        let to = Stop::from_str(&self.to).map_err(invalid)?;
        if self.amount.is_negative() {
            return Err(invalid(format!("negative amount {}", self.amount)));
        }

        Ok((from, to, self.amount))
    }
}

/// Read-only fare lookup built once at startup.
#[derive(Debug, Clone)]
pub struct FareTable {
    fares: HashMap<RouteKey, Decimal2>,
}

impl FareTable {
    /// Builds a table from `(stop, stop, amount)` triples.
    ///
    /// Fails with [`EngineError::ConfigurationConflict`] if the same unordered
    /// pair appears twice, whether or not the amounts agree.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Stop, Stop, Decimal2)>,
    {
        let mut fares = HashMap::new();

        for (a, b, amount) in entries {
            if fares.insert(RouteKey::new(a, b), amount).is_some() {
                return Err(EngineError::ConfigurationConflict { a, b });
            }
        }

        Ok(FareTable { fares })
    }

    /// The network's standard schedule, used when no fare file is supplied.
    pub fn default_schedule() -> Self {
        let fares = [
            (Stop::Stop1, Stop::Stop2, Decimal2::new(rust_decimal::Decimal::new(325, 2))),
            (Stop::Stop2, Stop::Stop3, Decimal2::new(rust_decimal::Decimal::new(550, 2))),
            (Stop::Stop1, Stop::Stop3, Decimal2::new(rust_decimal::Decimal::new(730, 2))),
        ]
        .into_iter()
        .map(|(a, b, amount)| (RouteKey::new(a, b), amount))
        .collect();

        FareTable { fares }
    }

    /// Loads a fare schedule from CSV with a `from,to,amount` header.
    ///
    /// Unlike tap input, any bad row here is fatal.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut entries = Vec::new();
        for (row_idx, result) in csv_reader.deserialize::<FareEntry>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row
            let entry = result.map_err(|e| EngineError::InvalidFare {
                row: row_num,
                message: e.to_string(),
            })?;
            entries.push(entry.parse(row_num)?);
        }

        debug!("Loaded {} fare entries", entries.len());
        Self::new(entries)
    }

    /// Fare between two stops, in either direction.
    ///
    /// Travel from a stop to itself costs zero without consulting the table.
    pub fn cost(&self, a: Stop, b: Stop) -> Result<Decimal2> {
        if a == b {
            return Ok(Decimal2::ZERO);
        }

        self.fares
            .get(&RouteKey::new(a, b))
            .copied()
            .ok_or(EngineError::RouteNotFound { from: a, to: b })
    }

    /// Highest fare on any route touching `from`, or zero if none does.
    pub fn max_fare(&self, from: Stop) -> Decimal2 {
        self.fares
            .iter()
            .filter(|(key, _)| key.touches(from))
            .map(|(_, amount)| *amount)
            .max()
            .unwrap_or(Decimal2::ZERO)
    }

    /// Number of configured routes.
    pub fn len(&self) -> usize {
        self.fares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fares.is_empty()
    }
}

impl Default for FareTable {
    fn default() -> Self {
        Self::default_schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn dec(s: &str) -> Decimal2 {
        Decimal2::from_str(s).unwrap()
    }

    #[rstest]
    #[case(Stop::Stop1, Stop::Stop2, "3.25")]
    #[case(Stop::Stop2, Stop::Stop3, "5.50")]
    #[case(Stop::Stop1, Stop::Stop3, "7.30")]
    fn test_cost_is_symmetric(#[case] a: Stop, #[case] b: Stop, #[case] expected: &str) {
        let table = FareTable::default_schedule();
        assert_eq!(table.cost(a, b).unwrap(), dec(expected));
        assert_eq!(table.cost(b, a).unwrap(), dec(expected));
    }

    #[rstest]
    #[case(Stop::Stop1)]
    #[case(Stop::Stop2)]
    #[case(Stop::Stop3)]
    fn test_same_stop_cost_is_zero(#[case] stop: Stop) {
        let empty = FareTable::new(Vec::new()).unwrap();
        assert_eq!(empty.cost(stop, stop).unwrap(), Decimal2::ZERO);
    }

    #[test]
    fn test_same_stop_cost_ignores_self_entry() {
        let table = FareTable::new(vec![(Stop::Stop1, Stop::Stop1, dec("9.99"))]).unwrap();
        assert_eq!(table.cost(Stop::Stop1, Stop::Stop1).unwrap(), Decimal2::ZERO);
    }

    #[rstest]
    #[case(Stop::Stop1, "7.30")]
    #[case(Stop::Stop2, "5.50")]
    #[case(Stop::Stop3, "7.30")]
    fn test_max_fare(#[case] stop: Stop, #[case] expected: &str) {
        let table = FareTable::default_schedule();
        assert_eq!(table.max_fare(stop), dec(expected));
    }

    #[test]
    fn test_max_fare_for_unreferenced_stop_is_zero() {
        let table = FareTable::new(vec![(Stop::Stop1, Stop::Stop2, dec("3.25"))]).unwrap();
        assert_eq!(table.max_fare(Stop::Stop3), Decimal2::ZERO);
    }

    #[test]
    fn test_missing_route_is_an_error() {
        let table = FareTable::new(vec![(Stop::Stop1, Stop::Stop2, dec("3.25"))]).unwrap();
        let err = table.cost(Stop::Stop3, Stop::Stop1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::RouteNotFound {
                from: Stop::Stop3,
                to: Stop::Stop1
            }
        ));
    }

    #[test]
    fn test_reversed_duplicate_is_a_conflict() {
        let result = FareTable::new(vec![
            (Stop::Stop1, Stop::Stop2, dec("3.25")),
            (Stop::Stop2, Stop::Stop1, dec("4.00")),
        ]);
        assert!(matches!(
            result,
            Err(EngineError::ConfigurationConflict { .. })
        ));
    }

    #[test]
    fn test_from_csv() {
        let csv = "from,to,amount\nStop1,Stop2,3.25\nSTOP3, stop2 ,5.5\n";
        let table = FareTable::from_csv(Cursor::new(csv)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.cost(Stop::Stop2, Stop::Stop1).unwrap(), dec("3.25"));
        assert_eq!(table.cost(Stop::Stop2, Stop::Stop3).unwrap(), dec("5.50"));
        assert!(table.cost(Stop::Stop1, Stop::Stop3).is_err());
    }

    #[test]
    fn test_from_csv_rejects_negative_amount() {
        let csv = "from,to,amount\nStop1,Stop2,-1.00\n";
        let err = FareTable::from_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFare { row: 2, .. }));
    }

    #[test]
    fn test_from_csv_rejects_unparsable_amount() {
        let csv = "from,to,amount\nStop1,Stop2,3.25\nStop2,Stop3,five\n";
        let err = FareTable::from_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFare { row: 3, .. }));
    }

    #[test]
    fn test_from_csv_accepts_currency_amounts() {
        let csv = "from,to,amount\nStop1,Stop2,$3.25\n";
        let table = FareTable::from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(table.cost(Stop::Stop1, Stop::Stop2).unwrap(), dec("3.25"));
    }

    #[test]
    fn test_from_csv_rejects_unknown_stop() {
        let csv = "from,to,amount\nStop1,Stop2,3.25\nStop1,Stop9,1.00\n";
        let err = FareTable::from_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFare { row: 3, .. }));
    }
}
