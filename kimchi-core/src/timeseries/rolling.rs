use crate::KimchiError;
use crate::timeseries::table::AlignedTable;

/// Name of the moving-average column derived from `column` with `window`.
#[must_use]
pub fn ma_column(column: &str, window: usize) -> String {
    format!("{column}_ma{window}")
}

/// Whether `name` looks like a derived moving-average column (`<base>_ma<digits>`).
#[must_use]
pub fn is_ma_column(name: &str) -> bool {
    name.rsplit_once("_ma").is_some_and(|(base, digits)| {
        !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Trailing simple moving average over the last `window` rows.
///
/// Uses whatever observations are present in the window (at least one), so
/// the first `window - 1` rows are averaged over a shorter history instead of
/// being left empty. A window that holds no observation yields `None`.
#[must_use]
pub fn trailing_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let lo = (i + 1).saturating_sub(window);
            let (sum, count) = values[lo..=i]
                .iter()
                .flatten()
                .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
            (count > 0).then(|| sum / count as f64)
        })
        .collect()
}

/// Add `<column>_ma<W>` for every base column and every window.
///
/// Base columns are those that are not themselves moving averages. Existing
/// moving-average columns are recomputed from their base column and keep
/// their position, so applying the same windows twice changes nothing.
///
/// # Errors
/// Returns `KimchiError::InvalidArg` if any window is zero.
pub fn add_moving_averages(
    table: &AlignedTable,
    windows: &[usize],
) -> Result<AlignedTable, KimchiError> {
    if windows.contains(&0) {
        return Err(KimchiError::InvalidArg(
            "moving-average window must be at least one hour".into(),
        ));
    }
    let mut out = table.clone();
    let bases: Vec<(String, Vec<Option<f64>>)> = table
        .columns()
        .iter()
        .filter(|c| !is_ma_column(c.name()))
        .map(|c| (c.name().to_string(), c.values().to_vec()))
        .collect();
    for (name, values) in &bases {
        for &w in windows {
            out.upsert_column(ma_column(name, w), trailing_mean(values, w));
        }
    }
    Ok(out)
}
