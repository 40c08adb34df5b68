//! Kimchi premium derivation.
//!
//! Each configured asset yields either a premium series or a skip record; the
//! computed series are then outer-joined into one table keyed by timestamp.

use std::collections::BTreeMap;

use kimchi_types::{AssetConfig, AssetSkip, FxFill, PremiumFormula};

use crate::KimchiError;
use crate::timeseries::fill::reindex_filled;
use crate::timeseries::join::{JoinMode, join};
use crate::timeseries::series::{NamedSeries, TimePoint};
use crate::timeseries::table::AlignedTable;

const DOMESTIC: &str = "domestic";
const REFERENCE: &str = "reference";
const FX_RATE: &str = "fx_rate";

/// Price and FX inputs for one premium calculation.
///
/// Domestic series are keyed by the venue's market identifier (`KRW-BTC`),
/// reference series by the reference venue's symbol (`BTCUSDT`).
#[derive(Debug, Clone, Default)]
pub struct PremiumInputs {
    domestic: BTreeMap<String, NamedSeries>,
    reference: BTreeMap<String, NamedSeries>,
    fx_rate: Option<NamedSeries>,
}

impl PremiumInputs {
    /// Empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the KRW close series of a domestic market.
    #[must_use]
    pub fn domestic(mut self, market: impl Into<String>, series: NamedSeries) -> Self {
        self.domestic.insert(market.into(), series);
        self
    }

    /// Register the USD close series of a reference symbol.
    #[must_use]
    pub fn reference(mut self, symbol: impl Into<String>, series: NamedSeries) -> Self {
        self.reference.insert(symbol.into(), series);
        self
    }

    /// Set the KRW-per-USD rate series.
    #[must_use]
    pub fn fx_rate(mut self, series: NamedSeries) -> Self {
        self.fx_rate = Some(series);
        self
    }

    /// Domestic series for `market`, if any.
    #[must_use]
    pub fn domestic_series(&self, market: &str) -> Option<&NamedSeries> {
        self.domestic.get(market)
    }

    /// Reference series for `symbol`, if any.
    #[must_use]
    pub fn reference_series(&self, symbol: &str) -> Option<&NamedSeries> {
        self.reference.get(symbol)
    }

    /// The FX-rate series, if set.
    #[must_use]
    pub const fn fx_rate_series(&self) -> Option<&NamedSeries> {
        self.fx_rate.as_ref()
    }

    /// Inputs restricted to `[start, end]`.
    #[must_use]
    pub fn clip(&self, start: chrono::DateTime<chrono::Utc>, end: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            domestic: self
                .domestic
                .iter()
                .map(|(k, s)| (k.clone(), s.clip(start, end)))
                .collect(),
            reference: self
                .reference
                .iter()
                .map(|(k, s)| (k.clone(), s.clip(start, end)))
                .collect(),
            fx_rate: self.fx_rate.as_ref().map(|s| s.clip(start, end)),
        }
    }
}

/// `(price - base) / base * 100`, or `None` when `base` is not a positive
/// finite number.
#[must_use]
pub fn premium_pct(price: f64, base: f64) -> Option<f64> {
    if !(base.is_finite() && base > 0.0) {
        return None;
    }
    let pct = (price - base) / base * 100.0;
    pct.is_finite().then_some(pct)
}

fn fx_for(fx_rate: &NamedSeries, prices: &[&NamedSeries], fill: FxFill) -> NamedSeries {
    match fill {
        FxFill::Disabled => fx_rate.clone(),
        FxFill::ForwardBackward => {
            let index: Vec<_> = prices.iter().flat_map(|s| s.timestamps()).collect();
            reindex_filled(fx_rate, &index)
        }
    }
}

/// Premium of an asset quoted on both venues.
///
/// `(domestic / fx - reference) / reference * 100` over the inner join of the
/// three inputs. Rows with a non-positive FX rate or reference price are
/// dropped.
///
/// # Errors
/// Propagates join errors; with three distinct inputs none are expected.
pub fn cross_priced_premium(
    name: impl Into<String>,
    domestic: &NamedSeries,
    reference: &NamedSeries,
    fx_rate: &NamedSeries,
    fill: FxFill,
) -> Result<NamedSeries, KimchiError> {
    let fx = fx_for(fx_rate, &[domestic, reference], fill);
    let table = join(
        &[
            domestic.clone().renamed(DOMESTIC),
            reference.clone().renamed(REFERENCE),
            fx.renamed(FX_RATE),
        ],
        JoinMode::Inner,
    )?;
    let (d, r, f) = (
        table.column(DOMESTIC)?,
        table.column(REFERENCE)?,
        table.column(FX_RATE)?,
    );
    let points = table.index().iter().enumerate().filter_map(|(i, ts)| {
        let (d, r, f) = (d[i]?, r[i]?, f[i]?);
        if !(f.is_finite() && f > 0.0) {
            return None;
        }
        premium_pct(d / f, r).map(|v| TimePoint::new(*ts, v))
    });
    Ok(NamedSeries::first_wins(name, points))
}

/// Premium of an asset pegged to one unit of foreign currency.
///
/// `(domestic - fx) / fx * 100` over the inner join of the two inputs.
///
/// # Errors
/// Propagates join errors; with two distinct inputs none are expected.
pub fn pegged_premium(
    name: impl Into<String>,
    domestic: &NamedSeries,
    fx_rate: &NamedSeries,
    fill: FxFill,
) -> Result<NamedSeries, KimchiError> {
    let fx = fx_for(fx_rate, &[domestic], fill);
    let table = join(
        &[domestic.clone().renamed(DOMESTIC), fx.renamed(FX_RATE)],
        JoinMode::Inner,
    )?;
    let (d, f) = (table.column(DOMESTIC)?, table.column(FX_RATE)?);
    let points = table
        .index()
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| premium_pct(d[i]?, f[i]?).map(|v| TimePoint::new(*ts, v)));
    Ok(NamedSeries::first_wins(name, points))
}

/// Result of the premium calculation for one asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPremium {
    /// A non-empty premium series was produced.
    Computed {
        /// Asset symbol.
        asset: String,
        /// Series named `<SYMBOL>_premium`.
        series: NamedSeries,
    },
    /// The asset contributed nothing.
    Skipped(AssetSkip),
}

impl AssetPremium {
    /// Asset symbol.
    #[must_use]
    pub fn asset(&self) -> &str {
        match self {
            Self::Computed { asset, .. } => asset,
            Self::Skipped(skip) => &skip.asset,
        }
    }
}

/// Premium table plus the per-asset outcomes it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumReport {
    /// Outer join of all computed premium series, ascending by timestamp.
    pub table: AlignedTable,
    /// One outcome per configured asset, in configuration order.
    pub outcomes: Vec<AssetPremium>,
}

impl PremiumReport {
    /// Assets that were skipped.
    pub fn skipped(&self) -> impl Iterator<Item = &AssetSkip> + '_ {
        self.outcomes.iter().filter_map(|o| match o {
            AssetPremium::Skipped(skip) => Some(skip),
            AssetPremium::Computed { .. } => None,
        })
    }

    /// Computed premium series.
    pub fn computed(&self) -> impl Iterator<Item = &NamedSeries> + '_ {
        self.outcomes.iter().filter_map(|o| match o {
            AssetPremium::Computed { series, .. } => Some(series),
            AssetPremium::Skipped(_) => None,
        })
    }
}

/// Premium calculation over a fixed asset list.
#[derive(Debug, Clone)]
pub struct PremiumCalculator {
    assets: Vec<AssetConfig>,
    fx_fill: FxFill,
}

impl PremiumCalculator {
    /// Calculator for `assets`, with FX filling disabled.
    #[must_use]
    pub fn new(assets: Vec<AssetConfig>) -> Self {
        Self {
            assets,
            fx_fill: FxFill::Disabled,
        }
    }

    /// Choose how FX gaps are handled.
    #[must_use]
    pub const fn fx_fill(mut self, fx_fill: FxFill) -> Self {
        self.fx_fill = fx_fill;
        self
    }

    /// Outcome for a single asset.
    ///
    /// # Errors
    /// Propagates internal join errors only; missing inputs become a skip.
    pub fn calculate_asset(
        &self,
        asset: &AssetConfig,
        inputs: &PremiumInputs,
    ) -> Result<AssetPremium, KimchiError> {
        let skip = |reason: &str| Ok(AssetPremium::Skipped(AssetSkip::new(&asset.symbol, reason)));

        let Some(domestic) = inputs.domestic_series(&asset.domestic_market) else {
            return skip("missing domestic price series");
        };
        let Some(fx) = inputs.fx_rate_series() else {
            return skip("missing fx rate series");
        };
        let name = asset.premium_column();
        let series = match asset.formula {
            PremiumFormula::CrossPriced => {
                let Some(symbol) = asset.reference_symbol.as_deref() else {
                    return skip("missing reference symbol");
                };
                let Some(reference) = inputs.reference_series(symbol) else {
                    return skip("missing reference price series");
                };
                cross_priced_premium(name, domestic, reference, fx, self.fx_fill)?
            }
            PremiumFormula::Pegged => pegged_premium(name, domestic, fx, self.fx_fill)?,
        };
        if series.is_empty() {
            return skip("no overlapping timestamps");
        }
        Ok(AssetPremium::Computed {
            asset: asset.symbol.clone(),
            series,
        })
    }

    /// Premiums for every configured asset.
    ///
    /// Assets with missing inputs, or whose inputs never overlap, are skipped
    /// and reported in [`PremiumReport::outcomes`].
    ///
    /// # Errors
    /// - `EmptyInput` if no asset is configured.
    /// - `NoPremiumData` if every asset was skipped.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "kimchi::premium",
            skip(self, inputs),
            fields(assets = self.assets.len(), fx_fill = ?self.fx_fill),
        )
    )]
    pub fn calculate(&self, inputs: &PremiumInputs) -> Result<PremiumReport, KimchiError> {
        if self.assets.is_empty() {
            return Err(KimchiError::empty_input("asset list"));
        }
        let outcomes = self
            .assets
            .iter()
            .map(|asset| self.calculate_asset(asset, inputs))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "tracing")]
        for skip in outcomes.iter().filter_map(|o| match o {
            AssetPremium::Skipped(s) => Some(s),
            AssetPremium::Computed { .. } => None,
        }) {
            tracing::warn!(target: "kimchi::premium", asset = %skip.asset, reason = %skip.reason, "asset skipped");
        }

        let computed: Vec<NamedSeries> = outcomes
            .iter()
            .filter_map(|o| match o {
                AssetPremium::Computed { series, .. } => Some(series.clone()),
                AssetPremium::Skipped(_) => None,
            })
            .collect();
        if computed.is_empty() {
            return Err(KimchiError::NoPremiumData);
        }
        let table = join(&computed, JoinMode::Outer)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "kimchi::premium",
            rows = table.len(),
            columns = table.width(),
            "premium table ready"
        );

        Ok(PremiumReport { table, outcomes })
    }
}
