//! Configuration values consumed by the analysis pipeline.
//!
//! Nothing here is global: each `Analyzer` owns its own `AnalysisConfig`, so
//! runs with different lag windows or date ranges can execute side by side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Two-sided p-value threshold used to flag a correlation as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default maximum lag, in hours, scanned by the lag sweep.
pub const DEFAULT_MAX_LAG: u32 = 48;

/// Largest accepted maximum lag, in hours (one year).
pub const MAX_LAG_LIMIT: u32 = 24 * 365;

/// Default moving-average windows, in hours (one day and one week).
pub const DEFAULT_MA_WINDOWS: [usize; 2] = [24, 168];

/// Formula used to derive an asset's premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumFormula {
    /// Asset trades on both the domestic KRW venue and a USD-quoted reference venue.
    CrossPriced,
    /// Asset is pegged to one unit of foreign currency; the FX rate is the reference.
    Pegged,
}

/// Per-asset venue identifiers and premium formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Asset symbol used for column naming, e.g. `BTC`.
    pub symbol: String,
    /// Market identifier on the domestic venue, e.g. `KRW-BTC`.
    pub domestic_market: String,
    /// Symbol on the reference venue, e.g. `BTCUSDT`. `None` for pegged assets.
    pub reference_symbol: Option<String>,
    /// Premium formula selector.
    pub formula: PremiumFormula,
}

impl AssetConfig {
    /// Asset quoted on both venues.
    pub fn cross_priced(
        symbol: impl Into<String>,
        domestic_market: impl Into<String>,
        reference_symbol: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            domestic_market: domestic_market.into(),
            reference_symbol: Some(reference_symbol.into()),
            formula: PremiumFormula::CrossPriced,
        }
    }

    /// Asset pegged to one unit of the foreign currency.
    pub fn pegged(symbol: impl Into<String>, domestic_market: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            domestic_market: domestic_market.into(),
            reference_symbol: None,
            formula: PremiumFormula::Pegged,
        }
    }

    /// Name of the premium column produced for this asset (`<SYMBOL>_premium`).
    #[must_use]
    pub fn premium_column(&self) -> String {
        premium_column(&self.symbol)
    }
}

/// Column name for an asset's premium series.
#[must_use]
pub fn premium_column(symbol: &str) -> String {
    format!("{symbol}_premium")
}

/// Wallet flow metric correlated against each premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMetric {
    /// Inflow minus outflow.
    NetFlow,
    /// Sum of incoming transfers.
    Inflow,
    /// Sum of outgoing transfers, as a positive amount.
    Outflow,
}

impl FlowMetric {
    /// All metrics in canonical order.
    pub const ALL: [Self; 3] = [Self::NetFlow, Self::Inflow, Self::Outflow];

    /// Column name of this metric in a flow table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::NetFlow => "net_flow",
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }
}

impl std::fmt::Display for FlowMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.column())
    }
}

/// How gaps in the FX-rate series are treated before premiums are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxFill {
    /// Rows without an FX observation are dropped by the inner join.
    #[default]
    Disabled,
    /// Reindex the FX series onto the price timestamps, forward-fill, then back-fill.
    ForwardBackward,
}

/// Inclusive time range applied to every input series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    /// First timestamp kept.
    pub start: DateTime<Utc>,
    /// Last timestamp kept.
    pub end: DateTime<Utc>,
}

impl AnalysisWindow {
    /// Whether `ts` falls inside the window.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Assets whose premium is calculated, in output order.
    pub assets: Vec<AssetConfig>,
    /// Maximum absolute lag, in hours, scanned by the lag sweep.
    pub max_lag: u32,
    /// Moving-average windows, in hours, added to the premium table.
    pub ma_windows: Vec<usize>,
    /// Flow metrics correlated against each premium.
    pub flow_metrics: Vec<FlowMetric>,
    /// FX-rate gap handling.
    #[serde(default)]
    pub fx_fill: FxFill,
    /// Optional clip applied to all inputs.
    #[serde(default)]
    pub window: Option<AnalysisWindow>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            assets: vec![
                AssetConfig::cross_priced("BTC", "KRW-BTC", "BTCUSDT"),
                AssetConfig::cross_priced("ETH", "KRW-ETH", "ETHUSDT"),
                AssetConfig::pegged("USDT", "KRW-USDT"),
            ],
            max_lag: DEFAULT_MAX_LAG,
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            flow_metrics: FlowMetric::ALL.to_vec(),
            fx_fill: FxFill::Disabled,
            window: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_mirrors_the_three_tracked_assets() {
        let cfg = AnalysisConfig::default();
        let symbols: Vec<&str> = cfg.assets.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["BTC", "ETH", "USDT"]);
        assert_eq!(cfg.assets[2].formula, PremiumFormula::Pegged);
        assert_eq!(cfg.max_lag, 48);
        assert_eq!(cfg.ma_windows, vec![24, 168]);
    }

    #[test]
    fn premium_column_naming() {
        assert_eq!(premium_column("ETH"), "ETH_premium");
        assert_eq!(FlowMetric::Outflow.column(), "outflow");
    }
}
