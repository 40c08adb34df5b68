//! Upstream hourly candles and their reduction to close-price series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timeseries::series::{NamedSeries, TimePoint};

/// One hourly OHLCV row as delivered by a venue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Start of the candle's hour.
    #[serde(rename = "timestamp", with = "crate::tabular::timestamp_format")]
    pub ts: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price; the value used for premium calculation.
    pub close: f64,
    /// Traded volume in base units.
    pub volume: f64,
}

/// Reduce candles to a close-price series.
///
/// Venues page backwards in time and may repeat the boundary candle; the first
/// candle seen for a timestamp wins. Output is ascending by timestamp.
pub fn close_series<I>(name: impl Into<String>, candles: I) -> NamedSeries
where
    I: IntoIterator<Item = Candle>,
{
    NamedSeries::first_wins(
        name,
        candles.into_iter().map(|c| TimePoint::new(c.ts, c.close)),
    )
}
