use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::KimchiError;
use crate::timeseries::table::{AlignedTable, Column};
use crate::timeseries::util::{floor_hour, hourly_range, is_hour_aligned};

/// A single hourly observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Hour-aligned instant; the join key across all series.
    pub ts: DateTime<Utc>,
    /// Observed value.
    pub value: f64,
}

impl TimePoint {
    /// Build a point.
    #[must_use]
    pub const fn new(ts: DateTime<Utc>, value: f64) -> Self {
        Self { ts, value }
    }
}

/// An identified, time-ordered sequence of observations.
///
/// Invariants:
/// - points are strictly ascending by timestamp (no duplicates);
/// - every value is finite. Gaps are represented by absence, never by zero.
///
/// A `NamedSeries` is never mutated in place; transforms return new values.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    name: String,
    points: Vec<TimePoint>,
}

impl NamedSeries {
    /// Build a series from points in any order.
    ///
    /// Non-finite values are treated as gaps and dropped.
    ///
    /// # Errors
    /// - `InvalidArg` if a timestamp is not on an hour boundary.
    /// - `DuplicateTimestamp` if two points share a timestamp.
    pub fn new(
        name: impl Into<String>,
        points: impl IntoIterator<Item = TimePoint>,
    ) -> Result<Self, KimchiError> {
        let name = name.into();
        let mut map: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for p in points {
            if !is_hour_aligned(p.ts) {
                return Err(KimchiError::InvalidArg(format!(
                    "series {name}: timestamp {} is not hour-aligned",
                    p.ts.to_rfc3339()
                )));
            }
            if !p.value.is_finite() {
                continue;
            }
            match map.entry(p.ts) {
                Entry::Vacant(v) => {
                    v.insert(p.value);
                }
                Entry::Occupied(_) => {
                    return Err(KimchiError::duplicate_timestamp(name, p.ts));
                }
            }
        }
        Ok(Self::from_sorted_map(name, map))
    }

    /// Build a series where the first occurrence of an hour wins.
    ///
    /// Timestamps are floored to their hour first, so upstream pages that
    /// overlap at their boundaries or stamp rows mid-hour still line up.
    /// Non-finite values are dropped before de-duplication.
    pub fn first_wins(name: impl Into<String>, points: impl IntoIterator<Item = TimePoint>) -> Self {
        let mut map: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for p in points.into_iter().filter(|p| p.value.is_finite()) {
            map.entry(floor_hour(p.ts)).or_insert(p.value);
        }
        Self::from_sorted_map(name.into(), map)
    }

    /// A series with no observations.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Hourly series holding `value` at every hour from `floor_hour(start)` to `end`.
    ///
    /// Used to stand in for a historical FX series when only a spot rate is known.
    pub fn hourly_constant(
        name: impl Into<String>,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let points = if value.is_finite() {
            hourly_range(start, end)
                .into_iter()
                .map(|ts| TimePoint::new(ts, value))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            name: name.into(),
            points,
        }
    }

    fn from_sorted_map(name: String, map: BTreeMap<DateTime<Utc>, f64>) -> Self {
        Self {
            name,
            points: map
                .into_iter()
                .map(|(ts, value)| TimePoint { ts, value })
                .collect(),
        }
    }

    /// Series identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ascending observations.
    #[must_use]
    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ascending timestamps.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.ts)
    }

    /// Values in timestamp order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Value observed at `ts`, if any.
    #[must_use]
    pub fn get(&self, ts: DateTime<Utc>) -> Option<f64> {
        self.points
            .binary_search_by_key(&ts, |p| p.ts)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// First and last timestamps, if the series is non-empty.
    #[must_use]
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.points.first()?.ts, self.points.last()?.ts))
    }

    /// Copy of the series restricted to `[start, end]`.
    #[must_use]
    pub fn clip(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .filter(|p| start <= p.ts && p.ts <= end)
                .copied()
                .collect(),
        }
    }

    /// The same observations under a different identifier.
    #[must_use]
    pub fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: self.points,
        }
    }

    /// Single-column table keyed by this series' timestamps.
    #[must_use]
    pub fn to_table(&self) -> AlignedTable {
        AlignedTable::from_parts_unchecked(
            self.timestamps().collect(),
            vec![Column::new(
                self.name.clone(),
                self.values().map(Some).collect(),
            )],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(h * 3_600, 0).unwrap()
    }

    #[test]
    fn new_sorts_and_rejects_duplicates() {
        let s = NamedSeries::new(
            "rate",
            [TimePoint::new(t(2), 2.0), TimePoint::new(t(0), 0.5)],
        )
        .unwrap();
        assert_eq!(s.timestamps().collect::<Vec<_>>(), vec![t(0), t(2)]);

        let err = NamedSeries::new(
            "rate",
            [TimePoint::new(t(1), 1.0), TimePoint::new(t(1), 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, KimchiError::DuplicateTimestamp { .. }));
    }

    #[test]
    fn non_finite_values_are_gaps() {
        let s = NamedSeries::new(
            "x",
            [
                TimePoint::new(t(0), f64::NAN),
                TimePoint::new(t(1), 1.0),
                TimePoint::new(t(2), f64::INFINITY),
            ],
        )
        .unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(t(1)), Some(1.0));
        assert_eq!(s.get(t(0)), None);
    }

    #[test]
    fn first_wins_keeps_earliest_occurrence() {
        let s = NamedSeries::first_wins(
            "close",
            [
                TimePoint::new(t(1), 10.0),
                TimePoint::new(t(0), 5.0),
                TimePoint::new(t(1), 99.0),
            ],
        );
        assert_eq!(s.values().collect::<Vec<_>>(), vec![5.0, 10.0]);
    }

    #[test]
    fn misaligned_timestamps_are_rejected_or_floored() {
        let half_past = t(1) + chrono::Duration::minutes(30);
        let err = NamedSeries::new("rate", [TimePoint::new(half_past, 1.0)]).unwrap_err();
        assert!(matches!(err, KimchiError::InvalidArg(_)));

        let s = NamedSeries::first_wins(
            "close",
            [TimePoint::new(half_past, 7.0), TimePoint::new(t(1), 8.0)],
        );
        assert_eq!(s.points(), &[TimePoint::new(t(1), 7.0)]);
    }

    #[test]
    fn hourly_constant_and_clip() {
        let s = NamedSeries::hourly_constant("rate", 1_300.0, t(0), t(5));
        assert_eq!(s.len(), 6);
        let c = s.clip(t(2), t(3));
        assert_eq!(c.span(), Some((t(2), t(3))));
        assert_eq!(c.name(), "rate");
    }
}
