//! Re-export of configuration values and report rows from `kimchi-types`.
// Consolidated re-exports so downstream crates can depend on `kimchi-core` only

pub use kimchi_types::{
    AnalysisConfig, AnalysisWindow, AssetConfig, DEFAULT_MA_WINDOWS, DEFAULT_MAX_LAG, FlowMetric,
    FxFill, MAX_LAG_LIMIT, PremiumFormula, SIGNIFICANCE_LEVEL, premium_column,
};

pub use kimchi_types::{
    AssetSkip, BestLag, ColumnStats, CorrelationRow, LagRow, LeadLag, RunStatus, Significance,
    Warning,
};

pub use kimchi_types::{ErrorKind, KimchiError};
