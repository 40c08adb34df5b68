//! Report rows produced by the analysis pipeline for external consumers.

use serde::{Deserialize, Serialize};

use crate::config::{FlowMetric, SIGNIFICANCE_LEVEL};

/// Significance band of a two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Significance {
    /// p >= 0.05
    NotSignificant,
    /// p < 0.05
    Weak,
    /// p < 0.01
    Strong,
    /// p < 0.001
    VeryStrong,
}

impl Significance {
    /// Band for `p_value`.
    #[must_use]
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < 0.001 {
            Self::VeryStrong
        } else if p_value < 0.01 {
            Self::Strong
        } else if p_value < SIGNIFICANCE_LEVEL {
            Self::Weak
        } else {
            Self::NotSignificant
        }
    }

    /// Conventional star marker (`***`, `**`, `*`, or empty).
    #[must_use]
    pub const fn stars(self) -> &'static str {
        match self {
            Self::VeryStrong => "***",
            Self::Strong => "**",
            Self::Weak => "*",
            Self::NotSignificant => "",
        }
    }
}

/// One row of the zero-lag correlation summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRow {
    /// Asset symbol, e.g. `BTC`.
    pub asset: String,
    /// Flow metric correlated against the asset's premium.
    pub metric: FlowMetric,
    /// Pearson correlation coefficient.
    pub correlation: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// `p_value < 0.05`.
    pub significant: bool,
}

impl CorrelationRow {
    /// Build a row, deriving `significant` from the fixed threshold.
    pub fn new(asset: impl Into<String>, metric: FlowMetric, correlation: f64, p_value: f64) -> Self {
        Self {
            asset: asset.into(),
            metric,
            correlation,
            p_value,
            significant: p_value < SIGNIFICANCE_LEVEL,
        }
    }

    /// Significance band of this row.
    #[must_use]
    pub fn significance(&self) -> Significance {
        Significance::from_p_value(self.p_value)
    }
}

/// One row of a per-pair lag profile table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagRow {
    /// Offset in hours; positive means the flow metric leads the premium.
    pub lag: i32,
    /// Pearson correlation at this lag.
    pub correlation: f64,
    /// Two-sided p-value at this lag.
    pub p_value: f64,
}

/// Direction of the strongest lead/lag relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadLag {
    /// The driving series leads the target by this many hours.
    DriverLeads(u32),
    /// The target leads the driving series by this many hours.
    TargetLeads(u32),
    /// Strongest co-movement happens in the same hour.
    Simultaneous,
}

impl LeadLag {
    /// Classify a signed lag.
    #[must_use]
    pub const fn from_lag(lag: i32) -> Self {
        if lag > 0 {
            Self::DriverLeads(lag.unsigned_abs())
        } else if lag < 0 {
            Self::TargetLeads(lag.unsigned_abs())
        } else {
            Self::Simultaneous
        }
    }

    /// Human-readable interpretation, e.g. `net_flow leads BTC_premium by 3 hours`.
    #[must_use]
    pub fn describe(self, driver: &str, target: &str) -> String {
        match self {
            Self::DriverLeads(h) => format!("{driver} leads {target} by {h} hours"),
            Self::TargetLeads(h) => format!("{target} leads {driver} by {h} hours"),
            Self::Simultaneous => "simultaneous".to_string(),
        }
    }
}

/// Lag with the strongest absolute correlation for one (metric, asset) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestLag {
    /// Asset symbol.
    pub asset: String,
    /// Flow metric.
    pub metric: FlowMetric,
    /// Selected lag.
    pub lag: i32,
    /// Correlation at the selected lag.
    pub correlation: f64,
    /// p-value at the selected lag.
    pub p_value: f64,
    /// Interpretation of `lag`.
    pub lead_lag: LeadLag,
}

/// Descriptive statistics of one numeric column.
///
/// Quantiles use linear interpolation between closest ranks. Fields that are
/// undefined for the observed count (e.g. `std` with fewer than two values)
/// are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name.
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    /// Minimum.
    pub min: Option<f64>,
    /// First quartile.
    pub q25: Option<f64>,
    /// Median.
    pub median: Option<f64>,
    /// Third quartile.
    pub q75: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
}

/// An asset that produced no premium series, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSkip {
    /// Asset symbol.
    pub asset: String,
    /// Human-readable reason, e.g. "missing reference price series".
    pub reason: String,
}

impl AssetSkip {
    /// Build a skip record.
    pub fn new(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AssetSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} skipped: {}", self.asset, self.reason)
    }
}

/// Non-fatal issue recorded while producing a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// An asset was left out of the premium table.
    AssetSkipped(AssetSkip),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssetSkipped(skip) => skip.fmt(f),
        }
    }
}

/// Overall outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every configured asset contributed.
    Complete,
    /// Some assets were skipped; see the warnings.
    Partial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_bands() {
        assert_eq!(Significance::from_p_value(0.0005).stars(), "***");
        assert_eq!(Significance::from_p_value(0.005).stars(), "**");
        assert_eq!(Significance::from_p_value(0.04).stars(), "*");
        assert_eq!(Significance::from_p_value(0.05).stars(), "");
    }

    #[test]
    fn lead_lag_interpretation() {
        assert_eq!(LeadLag::from_lag(3), LeadLag::DriverLeads(3));
        assert_eq!(LeadLag::from_lag(-5), LeadLag::TargetLeads(5));
        assert_eq!(LeadLag::from_lag(0), LeadLag::Simultaneous);
        assert_eq!(
            LeadLag::from_lag(-5).describe("net_flow", "BTC_premium"),
            "BTC_premium leads net_flow by 5 hours"
        );
    }

    #[test]
    fn correlation_row_flags_significance_strictly_below_threshold() {
        assert!(CorrelationRow::new("BTC", FlowMetric::NetFlow, 0.3, 0.049).significant);
        assert!(!CorrelationRow::new("BTC", FlowMetric::NetFlow, 0.3, 0.05).significant);
    }
}
