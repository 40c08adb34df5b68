//! Kimchi premium vs. hot-wallet flow lag-correlation analysis.
//!
//! Overview
//! - Derives an hourly premium per configured asset from domestic (KRW) and
//!   reference (USD) prices and an FX-rate series.
//! - Inner-joins the premium table with the hourly flows of a monitored
//!   hot wallet.
//! - Computes the zero-lag Pearson correlation and a lag sweep for every
//!   (flow metric, asset) pair, and picks the best lag per pair.
//!
//! Key behaviors and trade-offs
//! - Missing inputs for one asset skip that asset with a warning; the run only
//!   fails when no asset produces a premium.
//! - Degenerate data (constant series, too few overlapping hours) yields the
//!   neutral correlation `(0.0, 1.0)` rather than an error, so a sweep always
//!   completes.
//! - Lags shift rows of the merged table, not wall-clock hours. Gaps in the
//!   merged index therefore stretch a "one-row" lag over more than an hour.
//! - FX gaps are not filled by default; `FxFill::ForwardBackward` trades
//!   strict inner-join semantics for coverage.
//!
//! Examples
//! ```rust,ignore
//! use kimchi::{Analyzer, FxFill};
//!
//! let analyzer = Analyzer::builder()
//!     .max_lag(24)
//!     .fx_fill(FxFill::ForwardBackward)
//!     .build()?;
//! let report = analyzer.run(&inputs, &flows)?;
//! for line in report.correlation.interpretations() {
//!     println!("{line}");
//! }
//! ```
//!
//! See `demos/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod report;

pub use core::{Analyzer, AnalyzerBuilder};
pub use report::{AnalysisReport, CorrelationReport};

// Re-export core types for convenience
pub use kimchi_core::{
    AlignedTable, AnalysisConfig, AnalysisWindow, AssetConfig, AssetPremium, AssetSkip, BestLag,
    Candle, Column, ColumnStats, Correlation, CorrelationRow, ErrorKind, FlowMetric, FlowRecord,
    FlowSeries, FxFill, KimchiError, LagCorrelationProfile, MAX_LAG_LIMIT, LagRow, LeadLag, NamedSeries,
    PairProfile, PremiumFormula, PremiumInputs, PremiumReport, RunStatus, Significance, TimePoint,
    WalletTransfer, Warning, aggregate_wallet_transfers, close_series,
};
pub use kimchi_core::tabular;
