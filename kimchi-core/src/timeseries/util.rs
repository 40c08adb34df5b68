//! Shared helpers for hourly timestamp arithmetic.

use chrono::{DateTime, Utc};

/// Seconds in one hour, the native cadence of every series in this crate.
pub const HOUR: i64 = 3_600;

/// Floor a timestamp to the start of its UTC hour.
///
/// Sub-second precision is discarded along with minutes and seconds.
#[must_use]
pub fn floor_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let bucket = secs - secs.rem_euclid(HOUR);
    DateTime::from_timestamp(bucket, 0).unwrap_or(ts)
}

/// Whether `ts` sits exactly on an hour boundary.
#[must_use]
pub fn is_hour_aligned(ts: DateTime<Utc>) -> bool {
    ts.timestamp().rem_euclid(HOUR) == 0 && ts.timestamp_subsec_nanos() == 0
}

/// Hour-aligned timestamps from `floor_hour(start)` through `end`, inclusive.
///
/// Returns an empty vector when `end` precedes the floored start.
#[must_use]
pub fn hourly_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let first = floor_hour(start).timestamp();
    let last = end.timestamp();
    if last < first {
        return Vec::new();
    }
    (first..=last)
        .step_by(usize::try_from(HOUR).unwrap_or(3_600))
        .filter_map(|s| DateTime::from_timestamp(s, 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(sec: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(sec, 0).unwrap()
    }

    #[test]
    fn floor_hour_handles_pre_epoch_instants() {
        assert_eq!(floor_hour(t(7_199)), t(3_600));
        assert_eq!(floor_hour(t(-1)), t(-3_600));
        assert!(is_hour_aligned(floor_hour(t(123_456))));
    }

    #[test]
    fn hourly_range_is_inclusive_of_end() {
        let r = hourly_range(t(1_800), t(3 * 3_600));
        assert_eq!(r, vec![t(0), t(3_600), t(7_200), t(10_800)]);
        assert!(hourly_range(t(7_200), t(0)).is_empty());
    }
}
