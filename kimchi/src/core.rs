use std::collections::HashSet;

use kimchi_core::correlation::{correlation_summary, premium_columns, sweep_pairs};
use kimchi_core::{
    AlignedTable, FlowSeries, PremiumCalculator, PremiumInputs, PremiumReport,
    add_moving_averages, describe, merge_flows_and_premiums,
};
use kimchi_types::{
    AnalysisConfig, AnalysisWindow, AssetConfig, FlowMetric, FxFill, KimchiError, MAX_LAG_LIMIT,
    PremiumFormula, Warning,
};

use crate::report::{AnalysisReport, CorrelationReport};

/// Runs the premium → merge → correlation pipeline for one configuration.
///
/// An `Analyzer` holds no mutable state; analyzers with different
/// configurations can run concurrently.
#[derive(Debug, Clone)]
pub struct Analyzer {
    pub(crate) cfg: AnalysisConfig,
}

/// Builder for an [`Analyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerBuilder {
    cfg: AnalysisConfig,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    /// Start from [`AnalysisConfig::default`]: BTC, ETH and USDT, 48-hour
    /// sweep, 24/168-hour moving averages, all flow metrics, no FX filling.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cfg: AnalysisConfig::default(),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: AnalysisConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replace the asset list.
    #[must_use]
    pub fn assets(mut self, assets: Vec<AssetConfig>) -> Self {
        self.cfg.assets = assets;
        self
    }

    /// Maximum absolute lag of the sweep, in hours.
    #[must_use]
    pub const fn max_lag(mut self, hours: u32) -> Self {
        self.cfg.max_lag = hours;
        self
    }

    /// Moving-average windows, in hours. An empty list disables the augmentation.
    #[must_use]
    pub fn ma_windows(mut self, windows: &[usize]) -> Self {
        self.cfg.ma_windows = windows.to_vec();
        self
    }

    /// Flow metrics correlated against each premium.
    #[must_use]
    pub fn flow_metrics(mut self, metrics: &[FlowMetric]) -> Self {
        self.cfg.flow_metrics = metrics.to_vec();
        self
    }

    /// FX gap handling.
    #[must_use]
    pub const fn fx_fill(mut self, fx_fill: FxFill) -> Self {
        self.cfg.fx_fill = fx_fill;
        self
    }

    /// Restrict every input to `window`.
    #[must_use]
    pub const fn window(mut self, window: AnalysisWindow) -> Self {
        self.cfg.window = Some(window);
        self
    }

    /// Build the analyzer.
    ///
    /// # Errors
    /// Returns `InvalidArg` if:
    /// - the asset list is empty or repeats a symbol;
    /// - a cross-priced asset has no reference symbol;
    /// - `max_lag` exceeds [`MAX_LAG_LIMIT`];
    /// - a moving-average window is zero;
    /// - no flow metric is selected, or one is listed twice;
    /// - the window ends before it starts.
    pub fn build(self) -> Result<Analyzer, KimchiError> {
        let cfg = self.cfg;
        if cfg.assets.is_empty() {
            return Err(KimchiError::InvalidArg(
                "no assets configured; add at least one via assets(...)".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for asset in &cfg.assets {
            if !seen.insert(asset.symbol.as_str()) {
                return Err(KimchiError::InvalidArg(format!(
                    "duplicate asset symbol '{}'",
                    asset.symbol
                )));
            }
            if asset.formula == PremiumFormula::CrossPriced && asset.reference_symbol.is_none() {
                return Err(KimchiError::InvalidArg(format!(
                    "cross-priced asset '{}' needs a reference symbol",
                    asset.symbol
                )));
            }
        }
        if cfg.max_lag > MAX_LAG_LIMIT {
            return Err(KimchiError::InvalidArg(format!(
                "max_lag {} exceeds the limit of {MAX_LAG_LIMIT} hours",
                cfg.max_lag
            )));
        }
        if cfg.ma_windows.contains(&0) {
            return Err(KimchiError::InvalidArg(
                "moving-average window must be at least one hour".to_string(),
            ));
        }
        if cfg.flow_metrics.is_empty() {
            return Err(KimchiError::InvalidArg(
                "no flow metrics selected".to_string(),
            ));
        }
        let unique: HashSet<FlowMetric> = cfg.flow_metrics.iter().copied().collect();
        if unique.len() != cfg.flow_metrics.len() {
            return Err(KimchiError::InvalidArg(
                "flow metrics must not repeat".to_string(),
            ));
        }
        if let Some(w) = cfg.window.filter(|w| w.start > w.end) {
            return Err(KimchiError::InvalidArg(format!(
                "analysis window ends ({}) before it starts ({})",
                w.end, w.start
            )));
        }
        Ok(Analyzer { cfg })
    }
}

impl Analyzer {
    /// Start building an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Premium table for the configured assets.
    ///
    /// Inputs are clipped to the configured window first. Assets with missing
    /// inputs are skipped and listed in the report.
    ///
    /// # Errors
    /// `NoPremiumData` if no asset produced a series.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kimchi::analyzer::premiums",
            skip(self, inputs),
            fields(assets = self.cfg.assets.len()),
        )
    )]
    pub fn premiums(&self, inputs: &PremiumInputs) -> Result<PremiumReport, KimchiError> {
        let clipped;
        let inputs = match self.cfg.window {
            Some(w) => {
                clipped = inputs.clip(w.start, w.end);
                &clipped
            }
            None => inputs,
        };
        PremiumCalculator::new(self.cfg.assets.clone())
            .fx_fill(self.cfg.fx_fill)
            .calculate(inputs)
    }

    /// `table` with the configured moving-average columns added.
    ///
    /// # Errors
    /// `InvalidArg` on a zero window; the builder already rejects those.
    pub fn with_moving_averages(&self, table: &AlignedTable) -> Result<AlignedTable, KimchiError> {
        add_moving_averages(table, &self.cfg.ma_windows)
    }

    /// Correlate wallet flows with a premium table.
    ///
    /// Flows are clipped to the configured window and inner-joined with the
    /// premium table. Premium columns are found by their `_premium` suffix;
    /// moving-average columns ride along in the merged table but are not
    /// correlated.
    ///
    /// # Errors
    /// - `EmptyInput` if the join leaves no rows or no premium column.
    /// - `MissingColumn` if a configured flow metric is absent.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kimchi::analyzer::correlate",
            skip(self, flows, premiums),
            fields(flow_rows = flows.len(), premium_rows = premiums.len(), max_lag = self.cfg.max_lag),
        )
    )]
    pub fn correlate(
        &self,
        flows: &FlowSeries,
        premiums: &AlignedTable,
    ) -> Result<CorrelationReport, KimchiError> {
        let clipped;
        let flows = match self.cfg.window {
            Some(w) => {
                clipped = flows.clip(&w);
                &clipped
            }
            None => flows,
        };
        let merged = merge_flows_and_premiums(flows, premiums)?;
        if merged.is_empty() {
            return Err(KimchiError::empty_input(
                "merged flow/premium table (no common timestamps)",
            ));
        }
        let columns = premium_columns(&merged);
        if columns.is_empty() {
            return Err(KimchiError::empty_input("premium columns"));
        }

        let metrics = &self.cfg.flow_metrics;
        let summary = correlation_summary(&merged, metrics, &columns)?;
        let profiles = sweep_pairs(&merged, metrics, &columns, self.cfg.max_lag)?;
        let best_lags = profiles.iter().map(|p| p.best_lag()).collect();
        let statistics = describe(&merged);

        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "kimchi::analyzer",
            rows = merged.len(),
            pairs = profiles.len(),
            "correlation analysis complete"
        );

        Ok(CorrelationReport {
            merged,
            summary,
            profiles,
            best_lags,
            statistics,
        })
    }

    /// Premiums, moving averages and correlation in one call.
    ///
    /// The returned premium table carries the moving-average columns; skipped
    /// assets are reported as warnings.
    ///
    /// # Errors
    /// - `NoPremiumData` if no asset produced a series.
    /// - Any error of [`Analyzer::correlate`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "kimchi::analyzer::run", skip(self, inputs, flows))
    )]
    pub fn run(
        &self,
        inputs: &PremiumInputs,
        flows: &FlowSeries,
    ) -> Result<AnalysisReport, KimchiError> {
        let mut premiums = self.premiums(inputs)?;
        let correlation = self.correlate(flows, &premiums.table)?;
        premiums.table = self.with_moving_averages(&premiums.table)?;
        let warnings = premiums
            .skipped()
            .cloned()
            .map(Warning::AssetSkipped)
            .collect();
        Ok(AnalysisReport {
            premiums,
            correlation,
            warnings,
        })
    }
}
