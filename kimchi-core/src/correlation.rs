//! Pearson correlation, lag sweeps, and best-lag selection.
//!
//! Degenerate data never errors here: fewer than two complete pairs, or a
//! constant side, resolve to [`Correlation::NEUTRAL`]. Only contract
//! violations (a column that is not in the table) are reported as errors.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::function::beta::beta_reg;

use kimchi_types::{BestLag, CorrelationRow, FlowMetric, LagRow, LeadLag};

use crate::KimchiError;
use crate::flow::FlowSeries;
use crate::timeseries::join::{JoinMode, join_tables};
use crate::timeseries::table::AlignedTable;

/// Suffix identifying premium columns in an aligned table.
pub const PREMIUM_SUFFIX: &str = "_premium";

/// Correlation coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Pearson r in `[-1, 1]`.
    pub coefficient: f64,
    /// Two-sided p-value in `[0, 1]`.
    pub p_value: f64,
}

impl Correlation {
    /// Result for inputs that cannot support a correlation.
    pub const NEUTRAL: Self = Self {
        coefficient: 0.0,
        p_value: 1.0,
    };
}

/// Two-sided p-value of `r` over `n` pairs under the null of no linear
/// association (Student's t with `n - 2` degrees of freedom).
#[must_use]
pub fn p_value(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    let r = r.clamp(-1.0, 1.0);
    let df = (n - 2) as f64;
    let x = (1.0 - r * r).clamp(0.0, 1.0);
    beta_reg(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Pearson correlation over complete pairs.
///
/// Pairs with a non-finite member are ignored.
#[must_use]
pub fn pearson_pairs(pairs: &[(f64, f64)]) -> Correlation {
    let pairs: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let n = pairs.len();
    if n < 2 {
        return Correlation::NEUTRAL;
    }
    // Exact comparison: a rounded mean leaves tiny positive variance otherwise.
    let (x0, y0) = pairs[0];
    if pairs.iter().all(|p| p.0 == x0) || pairs.iter().all(|p| p.1 == y0) {
        return Correlation::NEUTRAL;
    }
    let nf = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return Correlation::NEUTRAL;
    }

    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);
    if !r.is_finite() {
        return Correlation::NEUTRAL;
    }
    Correlation {
        coefficient: r,
        p_value: p_value(r, n),
    }
}

/// Pearson correlation of two aligned columns, dropping rows where either
/// side is missing.
///
/// Columns of unequal length are compared over their common prefix.
#[must_use]
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Correlation {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    pearson_pairs(&pairs)
}

/// Correlation at `lag` with positional shifting.
///
/// `lag > 0` pairs `x[i]` with `y[i + lag]`; `lag < 0` pairs `x[i + |lag|]`
/// with `y[i]`.
#[must_use]
pub fn lagged_pearson(x: &[Option<f64>], y: &[Option<f64>], lag: i32) -> Correlation {
    let n = x.len().min(y.len());
    let shift = lag.unsigned_abs() as usize;
    if shift >= n {
        return Correlation::NEUTRAL;
    }
    let (x, y) = if lag >= 0 {
        (&x[..n - shift], &y[shift..n])
    } else {
        (&x[shift..n], &y[..n - shift])
    };
    pearson(x, y)
}

/// Correlation at every integer lag in `[-max_lag, max_lag]`.
///
/// Keys are contiguous and iterate in ascending order; lag 0 always equals
/// the unshifted [`pearson`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelationProfile {
    max_lag: u32,
    entries: BTreeMap<i32, Correlation>,
}

impl LagCorrelationProfile {
    /// Build from arbitrary entries.
    ///
    /// # Errors
    /// Returns `KimchiError::InvalidArg` unless the keys are exactly
    /// `-m..=m` for some `m >= 0`.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, KimchiError>
    where
        I: IntoIterator<Item = (i32, Correlation)>,
    {
        let entries: BTreeMap<i32, Correlation> = entries.into_iter().collect();
        let (Some((&lo, _)), Some((&hi, _))) = (entries.first_key_value(), entries.last_key_value())
        else {
            return Err(KimchiError::InvalidArg("lag profile has no entries".into()));
        };
        let expected = i64::from(hi) - i64::from(lo) + 1;
        if lo != -hi || i64::try_from(entries.len()).ok() != Some(expected) {
            return Err(KimchiError::InvalidArg(format!(
                "lag profile keys must be contiguous and symmetric around zero, got {lo}..={hi} with {} entries",
                entries.len()
            )));
        }
        Ok(Self {
            max_lag: hi.unsigned_abs(),
            entries,
        })
    }

    /// Largest absolute lag.
    #[must_use]
    pub const fn max_lag(&self) -> u32 {
        self.max_lag
    }

    /// Correlation at `lag`.
    #[must_use]
    pub fn get(&self, lag: i32) -> Option<Correlation> {
        self.entries.get(&lag).copied()
    }

    /// Unshifted correlation.
    #[must_use]
    pub fn zero_lag(&self) -> Correlation {
        self.get(0).unwrap_or(Correlation::NEUTRAL)
    }

    /// Entries in ascending lag order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, Correlation)> + '_ {
        self.entries.iter().map(|(l, c)| (*l, *c))
    }

    /// Number of lags, always `2 * max_lag + 1`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; lag 0 is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lag with the strongest absolute correlation.
    #[must_use]
    pub fn best(&self) -> (i32, Correlation) {
        select_best_lag(self.iter()).unwrap_or((0, self.zero_lag()))
    }

    /// Rows for the lag profile table, lag ascending.
    #[must_use]
    pub fn to_rows(&self) -> Vec<LagRow> {
        self.iter()
            .map(|(lag, c)| LagRow {
                lag,
                correlation: c.coefficient,
                p_value: c.p_value,
            })
            .collect()
    }
}

/// Pick the lag with the largest `|r|`.
///
/// Ties go to the lag closest to zero; a remaining tie between `+L` and `-L`
/// goes to `-L`. Returns `None` for an empty input.
pub fn select_best_lag<I>(entries: I) -> Option<(i32, Correlation)>
where
    I: IntoIterator<Item = (i32, Correlation)>,
{
    entries.into_iter().reduce(|best, cand| {
        let (b, c) = (best.1.coefficient.abs(), cand.1.coefficient.abs());
        let better = c > b
            || (c == b
                && (cand.0.unsigned_abs(), cand.0) < (best.0.unsigned_abs(), best.0));
        if better { cand } else { best }
    })
}

/// Sweep `x` (the driver) against `y` (the target) over `[-max_lag, max_lag]`.
///
/// `max_lag` above `i32::MAX - 1` is capped there; callers going through
/// `Analyzer` are already limited to [`MAX_LAG_LIMIT`](crate::MAX_LAG_LIMIT).
#[must_use]
pub fn lag_sweep(x: &[Option<f64>], y: &[Option<f64>], max_lag: u32) -> LagCorrelationProfile {
    let max = i32::try_from(max_lag).unwrap_or(i32::MAX - 1);
    let entries = (-max..=max)
        .map(|lag| (lag, lagged_pearson(x, y, lag)))
        .collect();
    LagCorrelationProfile {
        max_lag: max.unsigned_abs(),
        entries,
    }
}

/// Lag profile of one (flow metric, premium asset) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairProfile {
    /// Asset symbol.
    pub asset: String,
    /// Flow metric used as the driver.
    pub metric: FlowMetric,
    /// Correlation per lag.
    pub profile: LagCorrelationProfile,
}

impl PairProfile {
    /// Best lag with its interpretation.
    #[must_use]
    pub fn best_lag(&self) -> BestLag {
        let (lag, c) = self.profile.best();
        BestLag {
            asset: self.asset.clone(),
            metric: self.metric,
            lag,
            correlation: c.coefficient,
            p_value: c.p_value,
            lead_lag: LeadLag::from_lag(lag),
        }
    }
}

/// Asset symbol of a premium column (`BTC_premium` → `BTC`).
#[must_use]
pub fn asset_of(column: &str) -> &str {
    column.strip_suffix(PREMIUM_SUFFIX).unwrap_or(column)
}

/// Premium columns of `table` in column order; moving averages excluded.
#[must_use]
pub fn premium_columns(table: &AlignedTable) -> Vec<String> {
    table
        .column_names()
        .filter(|n| n.len() > PREMIUM_SUFFIX.len() && n.ends_with(PREMIUM_SUFFIX))
        .map(str::to_string)
        .collect()
}

/// Inner join of hourly flows with the premium table.
///
/// # Errors
/// `DuplicateColumn` if the premium table already holds a flow column.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "kimchi::correlation",
        skip(flows, premiums),
        fields(flow_rows = flows.len(), premium_rows = premiums.len()),
    )
)]
pub fn merge_flows_and_premiums(
    flows: &FlowSeries,
    premiums: &AlignedTable,
) -> Result<AlignedTable, KimchiError> {
    join_tables(&[flows.to_table(), premiums.clone()], JoinMode::Inner)
}

struct Pair<'a> {
    asset: &'a str,
    metric: FlowMetric,
    driver: &'a [Option<f64>],
    target: &'a [Option<f64>],
}

fn resolve_pairs<'a>(
    table: &'a AlignedTable,
    metrics: &[FlowMetric],
    premium_columns: &'a [String],
) -> Result<Vec<Pair<'a>>, KimchiError> {
    let mut pairs = Vec::with_capacity(metrics.len() * premium_columns.len());
    for column in premium_columns {
        let target = table.column(column)?;
        for &metric in metrics {
            pairs.push(Pair {
                asset: asset_of(column),
                metric,
                driver: table.column(metric.column())?,
                target,
            });
        }
    }
    Ok(pairs)
}

/// Zero-lag correlation of every (metric, premium) pair, asset-major.
///
/// # Errors
/// `MissingColumn` if a metric or premium column is absent from `table`.
pub fn correlation_summary(
    table: &AlignedTable,
    metrics: &[FlowMetric],
    premium_columns: &[String],
) -> Result<Vec<CorrelationRow>, KimchiError> {
    Ok(resolve_pairs(table, metrics, premium_columns)?
        .into_iter()
        .map(|p| {
            let c = pearson(p.driver, p.target);
            CorrelationRow::new(p.asset, p.metric, c.coefficient, c.p_value)
        })
        .collect())
}

/// Lag sweep of every (metric, premium) pair.
///
/// Pairs are independent and swept in parallel; the output keeps the
/// asset-major, metric-minor order of the inputs.
///
/// # Errors
/// `MissingColumn` if a metric or premium column is absent from `table`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "kimchi::correlation",
        skip(table, metrics, premium_columns),
        fields(rows = table.len(), max_lag = max_lag),
    )
)]
pub fn sweep_pairs(
    table: &AlignedTable,
    metrics: &[FlowMetric],
    premium_columns: &[String],
    max_lag: u32,
) -> Result<Vec<PairProfile>, KimchiError> {
    let pairs = resolve_pairs(table, metrics, premium_columns)?;
    let profiles: Vec<PairProfile> = pairs
        .par_iter()
        .map(|p| PairProfile {
            asset: p.asset.to_string(),
            metric: p.metric,
            profile: lag_sweep(p.driver, p.target, max_lag),
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "kimchi::correlation", pairs = profiles.len(), "lag sweep done");

    Ok(profiles)
}
