//! kimchi-core
//!
//! Time-series alignment, premium derivation, and lag-correlation engine.
//!
//! - `timeseries`: named hourly series, aligned tables, joins, gap filling and
//!   moving averages.
//! - `candle` / `flow`: reduction of upstream price candles and wallet
//!   transfers to hourly series.
//! - `premium`: per-asset kimchi premium with skip-on-missing-input semantics.
//! - `correlation`: Pearson correlation, lag sweeps and best-lag selection.
//! - `summary`: descriptive statistics of aligned tables.
//! - `tabular`: CSV exchange format.
//!
//! Everything here is synchronous and pure: each operation takes immutable
//! inputs and returns a new owned value. The only parallelism is inside
//! [`correlation::sweep_pairs`], which fans the independent pairs out over
//! `rayon`'s pool.
//!
//! Enable the `tracing` feature to instrument the public operations.
#![warn(missing_docs)]

/// Hourly OHLCV candles.
pub mod candle;
/// Correlation and lag sweeps.
pub mod correlation;
/// Hot-wallet flow aggregation.
pub mod flow;
/// Kimchi premium calculation.
pub mod premium;
/// Descriptive statistics.
pub mod summary;
/// CSV reading and writing.
pub mod tabular;
/// Time-series primitives.
pub mod timeseries;
pub mod types;

pub use candle::{Candle, close_series};
pub use correlation::{
    Correlation, LagCorrelationProfile, PairProfile, correlation_summary, lag_sweep,
    merge_flows_and_premiums, pearson, premium_columns, select_best_lag, sweep_pairs,
};
pub use flow::{
    FlowRecord, FlowSeries, SignedTransfer, WalletTransfer, aggregate_hourly,
    aggregate_wallet_transfers, scale_raw_units,
};
pub use premium::{AssetPremium, PremiumCalculator, PremiumInputs, PremiumReport};
pub use summary::describe;
pub use timeseries::fill::fill_forward_backward;
pub use timeseries::join::{JoinMode, join, join_tables};
pub use timeseries::rolling::add_moving_averages;
pub use timeseries::series::{NamedSeries, TimePoint};
pub use timeseries::table::{AlignedTable, Column};
pub use timeseries::util::floor_hour;
pub use types::*;
