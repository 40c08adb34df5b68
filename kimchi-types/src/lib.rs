//! Kimchi-specific data transfer objects, configuration primitives, and the
//! shared error type.
#![warn(missing_docs)]

mod config;
mod error;
mod reports;

pub use config::{
    AnalysisConfig, AnalysisWindow, AssetConfig, DEFAULT_MA_WINDOWS, DEFAULT_MAX_LAG, FlowMetric,
    FxFill, MAX_LAG_LIMIT, PremiumFormula, SIGNIFICANCE_LEVEL, premium_column,
};
pub use error::{ErrorKind, KimchiError};
pub use reports::{
    AssetSkip, BestLag, ColumnStats, CorrelationRow, LagRow, LeadLag, RunStatus, Significance,
    Warning,
};
