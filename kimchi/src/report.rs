use kimchi_core::{AlignedTable, PairProfile, PremiumReport};
use kimchi_types::{
    BestLag, ColumnStats, CorrelationRow, FlowMetric, RunStatus, Warning, premium_column,
};

/// Output of [`Analyzer::correlate`](crate::Analyzer::correlate).
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationReport {
    /// Flow columns inner-joined with the premium table.
    pub merged: AlignedTable,
    /// Zero-lag correlation per (asset, metric), asset-major.
    pub summary: Vec<CorrelationRow>,
    /// Lag profile per (asset, metric), same order as `summary`.
    pub profiles: Vec<PairProfile>,
    /// Best lag per (asset, metric), same order as `summary`.
    pub best_lags: Vec<BestLag>,
    /// Descriptive statistics of every merged column.
    pub statistics: Vec<ColumnStats>,
}

impl CorrelationReport {
    /// Lag profile of one pair.
    #[must_use]
    pub fn profile(&self, asset: &str, metric: FlowMetric) -> Option<&PairProfile> {
        self.profiles
            .iter()
            .find(|p| p.asset == asset && p.metric == metric)
    }

    /// Best lag of one pair.
    #[must_use]
    pub fn best_lag(&self, asset: &str, metric: FlowMetric) -> Option<&BestLag> {
        self.best_lags
            .iter()
            .find(|b| b.asset == asset && b.metric == metric)
    }

    /// Rows whose zero-lag correlation is significant at the 5% level.
    pub fn significant(&self) -> impl Iterator<Item = &CorrelationRow> + '_ {
        self.summary.iter().filter(|r| r.significant)
    }

    /// One line per pair, e.g. `BTC / net_flow: net_flow leads BTC_premium by 3 hours (r=0.912)`.
    #[must_use]
    pub fn interpretations(&self) -> Vec<String> {
        self.best_lags
            .iter()
            .map(|b| {
                format!(
                    "{} / {}: {} (r={:.3})",
                    b.asset,
                    b.metric,
                    b.lead_lag
                        .describe(b.metric.column(), &premium_column(&b.asset)),
                    b.correlation
                )
            })
            .collect()
    }
}

/// Output of [`Analyzer::run`](crate::Analyzer::run).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Premium table (with moving averages) and per-asset outcomes.
    pub premiums: PremiumReport,
    /// Correlation results.
    pub correlation: CorrelationReport,
    /// Non-fatal issues, such as skipped assets.
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    /// `Partial` when any warning was recorded.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        if self.warnings.is_empty() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        }
    }

    /// Short human-readable status line.
    #[must_use]
    pub fn status_message(&self) -> String {
        let assets = self.premiums.computed().count();
        match self.status() {
            RunStatus::Complete => format!(
                "complete: {assets} assets, {} pairs",
                self.correlation.summary.len()
            ),
            RunStatus::Partial => format!(
                "partial: {assets} assets, {} pairs; {}",
                self.correlation.summary.len(),
                self.warnings
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
        }
    }
}
