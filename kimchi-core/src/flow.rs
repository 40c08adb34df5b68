//! Hot-wallet transfer classification and hourly flow aggregation.
//!
//! Every wallet data source reduces to the same shape: a stream of signed
//! transfer amounts (positive into the wallet, negative out of it) that is
//! bucketed by hour. This module owns that reduction so sources only have to
//! produce [`SignedTransfer`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::KimchiError;
use crate::timeseries::table::{AlignedTable, Column};
use crate::timeseries::util::{floor_hour, is_hour_aligned};
use kimchi_types::{AnalysisWindow, FlowMetric};

/// A raw token transfer touching (or not) a monitored wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransfer {
    /// Block time of the transfer.
    pub ts: DateTime<Utc>,
    /// Sender address.
    pub from: String,
    /// Receiver address.
    pub to: String,
    /// Transferred amount in whole tokens (non-negative).
    pub amount: f64,
}

impl WalletTransfer {
    /// Signed amount from the wallet's perspective.
    ///
    /// `+amount` when the wallet receives, `-amount` when it sends, `None`
    /// when it is not a party. Addresses compare ASCII case-insensitively.
    #[must_use]
    pub fn signed_amount(&self, wallet: &str) -> Option<f64> {
        if self.to.eq_ignore_ascii_case(wallet) {
            Some(self.amount)
        } else if self.from.eq_ignore_ascii_case(wallet) {
            Some(-self.amount)
        } else {
            None
        }
    }

    /// Signed transfer from the wallet's perspective.
    #[must_use]
    pub fn signed(&self, wallet: &str) -> Option<SignedTransfer> {
        self.signed_amount(wallet).map(|amount| SignedTransfer {
            ts: self.ts,
            amount,
        })
    }
}

/// Convert an integer amount of token base units to whole tokens.
#[must_use]
pub fn scale_raw_units(raw: u128, decimals: u32) -> f64 {
    raw as f64 / 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX))
}

/// A transfer amount signed from the monitored wallet's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignedTransfer {
    /// Block time.
    pub ts: DateTime<Utc>,
    /// Positive for inflow, negative for outflow.
    pub amount: f64,
}

/// Hourly wallet flow.
///
/// Invariant: `inflow >= 0`, `outflow >= 0`, and `net_flow == inflow - outflow`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Start of the hour.
    #[serde(rename = "timestamp", with = "crate::tabular::timestamp_format")]
    pub ts: DateTime<Utc>,
    /// Inflow minus outflow.
    pub net_flow: f64,
    /// Sum of incoming amounts.
    pub inflow: f64,
    /// Sum of outgoing amounts, as a positive number.
    pub outflow: f64,
}

impl FlowRecord {
    /// Build a record, deriving `net_flow`.
    #[must_use]
    pub fn new(ts: DateTime<Utc>, inflow: f64, outflow: f64) -> Self {
        Self {
            ts,
            net_flow: inflow - outflow,
            inflow,
            outflow,
        }
    }

    /// Validate a record received from elsewhere.
    ///
    /// # Errors
    /// Returns `KimchiError::Data` if a side is negative or non-finite, or if
    /// `net_flow` disagrees with `inflow - outflow` beyond rounding noise.
    pub fn checked(self) -> Result<Self, KimchiError> {
        let finite = self.net_flow.is_finite() && self.inflow.is_finite() && self.outflow.is_finite();
        if !finite || self.inflow < 0.0 || self.outflow < 0.0 {
            return Err(KimchiError::Data(format!(
                "invalid flow at {}: inflow={} outflow={}",
                self.ts, self.inflow, self.outflow
            )));
        }
        let tolerance = 1e-6 * (self.inflow + self.outflow).max(1.0);
        if (self.net_flow - (self.inflow - self.outflow)).abs() > tolerance {
            return Err(KimchiError::Data(format!(
                "net flow mismatch at {}: net={} inflow={} outflow={}",
                self.ts, self.net_flow, self.inflow, self.outflow
            )));
        }
        Ok(self)
    }

    /// Value of one metric.
    #[must_use]
    pub const fn metric(&self, metric: FlowMetric) -> f64 {
        match metric {
            FlowMetric::NetFlow => self.net_flow,
            FlowMetric::Inflow => self.inflow,
            FlowMetric::Outflow => self.outflow,
        }
    }
}

/// Ascending, de-duplicated hourly flow records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowSeries {
    records: Vec<FlowRecord>,
}

impl FlowSeries {
    /// Build from records in any order.
    ///
    /// # Errors
    /// - `DuplicateTimestamp` if two records share an hour.
    /// - `Data` if a record violates the flow invariant.
    /// - `InvalidArg` if a timestamp is not on an hour boundary.
    pub fn new(records: impl IntoIterator<Item = FlowRecord>) -> Result<Self, KimchiError> {
        let mut map: BTreeMap<DateTime<Utc>, FlowRecord> = BTreeMap::new();
        for r in records {
            let r = r.checked()?;
            if !is_hour_aligned(r.ts) {
                return Err(KimchiError::InvalidArg(format!(
                    "flow timestamp {} is not hour-aligned",
                    r.ts.to_rfc3339()
                )));
            }
            if map.insert(r.ts, r).is_some() {
                return Err(KimchiError::duplicate_timestamp("wallet_flow", r.ts));
            }
        }
        Ok(Self {
            records: map.into_values().collect(),
        })
    }

    /// Records in ascending order.
    #[must_use]
    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    /// Number of hourly records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records inside `window`.
    #[must_use]
    pub fn clip(&self, window: &AnalysisWindow) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| window.contains(r.ts))
                .copied()
                .collect(),
        }
    }

    /// Table with `net_flow`, `inflow`, `outflow` columns.
    #[must_use]
    pub fn to_table(&self) -> AlignedTable {
        let index = self.records.iter().map(|r| r.ts).collect();
        let columns = FlowMetric::ALL
            .iter()
            .map(|&m| {
                Column::new(
                    m.column(),
                    self.records.iter().map(|r| Some(r.metric(m))).collect(),
                )
            })
            .collect();
        AlignedTable::from_parts_unchecked(index, columns)
    }
}

/// Bucket signed transfers by hour.
///
/// Per hour: `net_flow` is the sum of all amounts, `inflow` the sum of the
/// positive ones, `outflow` the absolute sum of the negative ones; a side with
/// no transfers is zero. Hours without any transfer are absent, not zero.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(target = "kimchi::flow", skip(transfers))
)]
pub fn aggregate_hourly<I>(transfers: I) -> FlowSeries
where
    I: IntoIterator<Item = SignedTransfer>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, (f64, f64, f64)> = BTreeMap::new();
    for t in transfers.into_iter().filter(|t| t.amount.is_finite()) {
        let (net, inflow, outflow) = buckets.entry(floor_hour(t.ts)).or_insert((0.0, 0.0, 0.0));
        *net += t.amount;
        if t.amount > 0.0 {
            *inflow += t.amount;
        } else if t.amount < 0.0 {
            *outflow += -t.amount;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "kimchi::flow", hours = buckets.len(), "aggregated transfers");

    FlowSeries {
        records: buckets
            .into_iter()
            .map(|(ts, (net_flow, inflow, outflow))| FlowRecord {
                ts,
                net_flow,
                inflow,
                outflow,
            })
            .collect(),
    }
}

/// Classify raw transfers against `wallet`, keep those inside `window`, and
/// aggregate them by hour.
///
/// Transfers in which the wallet is not a party are ignored.
pub fn aggregate_wallet_transfers<'a, I>(
    wallet: &str,
    transfers: I,
    window: Option<&AnalysisWindow>,
) -> FlowSeries
where
    I: IntoIterator<Item = &'a WalletTransfer>,
{
    aggregate_hourly(
        transfers
            .into_iter()
            .filter(|t| window.is_none_or(|w| w.contains(t.ts)))
            .filter_map(|t| t.signed(wallet)),
    )
}
