//! Descriptive statistics of aligned tables.

use statrs::statistics::Statistics;

use kimchi_types::ColumnStats;

use crate::timeseries::table::AlignedTable;

/// Linearly interpolated quantile of ascending `sorted` values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Statistics of one column's present values.
///
/// Non-finite values are ignored. `std` needs at least two values.
#[must_use]
pub fn describe_values(column: impl Into<String>, values: &[f64]) -> ColumnStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();
    if count == 0 {
        return ColumnStats {
            column: column.into(),
            count,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }
    ColumnStats {
        column: column.into(),
        count,
        mean: Some(Statistics::mean(sorted.iter())),
        std: (count > 1).then(|| Statistics::std_dev(sorted.iter())),
        min: Some(Statistics::min(sorted.iter())),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: Some(Statistics::max(sorted.iter())),
    }
}

/// Statistics of every column, in column order.
///
/// A table without rows or columns yields an empty report.
#[must_use]
pub fn describe(table: &AlignedTable) -> Vec<ColumnStats> {
    if table.is_empty() {
        return Vec::new();
    }
    table
        .columns()
        .iter()
        .map(|c| {
            let values: Vec<f64> = c.values().iter().flatten().copied().collect();
            describe_values(c.name(), &values)
        })
        .collect()
}
