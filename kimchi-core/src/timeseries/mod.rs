//! In-memory hourly time-series store.
//!
//! Modules include:
//! - `series`: a named, strictly ascending sequence of observations
//! - `table`: several columns aligned on one timestamp index
//! - `join`: inner/outer joins of series and tables on the timestamp key
//! - `fill`: forward/backward filling of gaps (FX rates only)
//! - `rolling`: trailing moving averages
//! - `util`: hour flooring and hourly ranges
/// Gap filling primitives.
pub mod fill;
/// Inner and outer joins on the timestamp key.
pub mod join;
/// Trailing moving-average augmentation.
pub mod rolling;
/// Named series of time points.
pub mod series;
/// Aligned multi-column tables.
pub mod table;
/// Hourly timestamp helpers.
pub mod util;
