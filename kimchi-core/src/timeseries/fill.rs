use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::timeseries::series::{NamedSeries, TimePoint};

/// Carry the last observed value forward over missing cells.
///
/// Leading gaps (before the first observation) are left untouched.
pub fn forward_fill(values: &mut [Option<f64>]) {
    let mut last: Option<f64> = None;
    for v in values.iter_mut() {
        if let Some(x) = *v {
            last = Some(x);
        } else {
            *v = last;
        }
    }
}

/// Carry the next observed value backward over missing cells.
///
/// Trailing gaps (after the last observation) are left untouched.
pub fn backward_fill(values: &mut [Option<f64>]) {
    let mut next: Option<f64> = None;
    for v in values.iter_mut().rev() {
        if let Some(x) = *v {
            next = Some(x);
        } else {
            *v = next;
        }
    }
}

/// Forward-fill, then back-fill whatever leading gap remains.
///
/// After this call every cell is `Some` unless the input had no observation at all.
pub fn fill_forward_backward(values: &mut [Option<f64>]) {
    forward_fill(values);
    backward_fill(values);
}

/// Reindex `series` onto the union of its own timestamps and `index`, filling
/// the new cells forward then backward.
///
/// An empty series stays empty: there is nothing to fill from.
#[must_use]
pub fn reindex_filled(series: &NamedSeries, index: &[DateTime<Utc>]) -> NamedSeries {
    if series.is_empty() {
        return series.clone();
    }
    let keys: BTreeSet<DateTime<Utc>> = series
        .timestamps()
        .chain(index.iter().copied())
        .collect();
    let keys: Vec<DateTime<Utc>> = keys.into_iter().collect();
    let mut values: Vec<Option<f64>> = keys.iter().map(|ts| series.get(*ts)).collect();
    fill_forward_backward(&mut values);
    NamedSeries::first_wins(
        series.name(),
        keys.into_iter()
            .zip(values)
            .filter_map(|(ts, v)| v.map(|v| TimePoint::new(ts, v))),
    )
}
