//! Deterministic fixture data for CI-safe tests and demos.
//!
//! Every series is a pure function of the hour offset, so repeated calls and
//! separate processes see identical data. The hot-wallet net flow leads the
//! BTC premium by [`LEAD_HOURS`]; ETH and USDT premiums are unrelated noise.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use kimchi_core::{
    AssetConfig, Candle, FlowSeries, NamedSeries, PremiumInputs, TimePoint, WalletTransfer,
    aggregate_wallet_transfers, close_series,
};

mod fixtures;

pub use fixtures::signal::LEAD_HOURS;
pub use fixtures::wallet::HOT_WALLET;

/// Identifier of the FX fixture, usable with [`MockMarket::omit`].
pub const FX_SERIES: &str = "usd_krw";

/// Domestic and reference market identifiers served by [`MockMarket`].
pub const MARKETS: [&str; 5] = ["KRW-BTC", "KRW-ETH", "KRW-USDT", "BTCUSDT", "ETHUSDT"];

/// Default fixture length: two weeks of hourly data.
pub const DEFAULT_HOURS: usize = 24 * 14;

/// Mock market data source.
#[derive(Debug, Clone)]
pub struct MockMarket {
    start: DateTime<Utc>,
    hours: usize,
    omitted: BTreeSet<String>,
}

impl Default for MockMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarket {
    /// Two weeks of data starting 2024-01-01 00:00 UTC.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_723),
            hours: DEFAULT_HOURS,
            omitted: BTreeSet::new(),
        }
    }

    /// Change the number of hourly rows.
    #[must_use]
    pub const fn with_hours(mut self, hours: usize) -> Self {
        self.hours = hours;
        self
    }

    /// Pretend a market (or [`FX_SERIES`]) has no data.
    #[must_use]
    pub fn omit(mut self, id: impl Into<String>) -> Self {
        self.omitted.insert(id.into());
        self
    }

    /// First hour of every series.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Last hour of every series.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::hours(self.hours.saturating_sub(1) as i64)
    }

    /// Number of hourly rows.
    #[must_use]
    pub const fn hours(&self) -> usize {
        self.hours
    }

    fn ts(&self, hour: usize) -> DateTime<Utc> {
        self.start + Duration::hours(hour as i64)
    }

    fn available(&self, id: &str) -> bool {
        !self.omitted.contains(id)
    }

    /// Hourly candles for `market`, newest first as venues page them.
    ///
    /// `None` for unknown or omitted markets.
    #[must_use]
    pub fn candles(&self, market: &str) -> Option<Vec<Candle>> {
        if !self.available(market) {
            return None;
        }
        (0..self.hours)
            .rev()
            .map(|h| fixtures::prices::close(market, h).map(|c| fixtures::prices::candle(self.ts(h), c, h)))
            .collect()
    }

    /// KRW-per-USD rate series, or `None` if omitted.
    #[must_use]
    pub fn fx_rates(&self) -> Option<NamedSeries> {
        self.available(FX_SERIES).then(|| {
            NamedSeries::first_wins(
                FX_SERIES,
                (0..self.hours).map(|h| TimePoint::new(self.ts(h), fixtures::prices::fx_rate(h))),
            )
        })
    }

    /// Raw transfers touching (and some not touching) [`HOT_WALLET`].
    #[must_use]
    pub fn transfers(&self) -> Vec<WalletTransfer> {
        (0..self.hours)
            .flat_map(|h| fixtures::wallet::hour_transfers(self.start, h))
            .collect()
    }

    /// Hourly flows of [`HOT_WALLET`].
    #[must_use]
    pub fn flows(&self) -> FlowSeries {
        aggregate_wallet_transfers(HOT_WALLET, &self.transfers(), None)
    }

    /// Premium inputs for `assets`, leaving out whatever is omitted.
    #[must_use]
    pub fn premium_inputs(&self, assets: &[AssetConfig]) -> PremiumInputs {
        let mut inputs = PremiumInputs::new();
        for asset in assets {
            if let Some(candles) = self.candles(&asset.domestic_market) {
                inputs = inputs.domestic(
                    asset.domestic_market.clone(),
                    close_series(asset.domestic_market.clone(), candles),
                );
            }
            let reference = asset
                .reference_symbol
                .as_deref()
                .and_then(|symbol| Some((symbol, self.candles(symbol)?)));
            if let Some((symbol, candles)) = reference {
                inputs = inputs.reference(symbol, close_series(symbol, candles));
            }
        }
        if let Some(fx) = self.fx_rates() {
            inputs = inputs.fx_rate(fx);
        }
        inputs
    }
}
