use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};

use crate::KimchiError;
use crate::timeseries::series::NamedSeries;
use crate::timeseries::table::{AlignedTable, Column};

/// Join semantics on the shared timestamp key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Keep only timestamps present in every input.
    Inner,
    /// Keep the union of timestamps; absent cells are `None`.
    Outer,
}

/// Join named series on their timestamps into one aligned table.
///
/// - Column order follows input order; each series contributes one column
///   named after it.
/// - Rows are ascending by timestamp regardless of input order.
/// - An inner join with no common timestamp yields an empty table, not an
///   error; callers check `is_empty()` before downstream use.
///
/// # Errors
/// - `EmptyInput` if `series` is empty.
/// - `DuplicateColumn` if two series share a name.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "kimchi::timeseries",
        skip(series),
        fields(inputs = series.len(), mode = ?mode),
    )
)]
pub fn join(series: &[NamedSeries], mode: JoinMode) -> Result<AlignedTable, KimchiError> {
    if series.is_empty() {
        return Err(KimchiError::empty_input("series list"));
    }
    let tables: Vec<AlignedTable> = series.iter().map(NamedSeries::to_table).collect();
    join_tables(&tables, mode)
}

/// Join aligned tables on their timestamp index.
///
/// Cells that were already missing in an input stay missing; an inner join
/// only guarantees that every row's timestamp exists in every input.
///
/// # Errors
/// - `EmptyInput` if `tables` is empty.
/// - `DuplicateColumn` if a column name appears in more than one input.
pub fn join_tables(tables: &[AlignedTable], mode: JoinMode) -> Result<AlignedTable, KimchiError> {
    let Some((first, rest)) = tables.split_first() else {
        return Err(KimchiError::empty_input("table list"));
    };

    let mut names: HashSet<&str> = HashSet::new();
    for name in tables.iter().flat_map(AlignedTable::column_names) {
        if !names.insert(name) {
            return Err(KimchiError::duplicate_column(name));
        }
    }

    let keys: Vec<DateTime<Utc>> = match mode {
        JoinMode::Inner => {
            let mut keys: Vec<DateTime<Utc>> = first.index().to_vec();
            for t in rest {
                keys.retain(|ts| t.index().binary_search(ts).is_ok());
            }
            keys
        }
        JoinMode::Outer => {
            let union: BTreeSet<DateTime<Utc>> = tables
                .iter()
                .flat_map(|t| t.index().iter().copied())
                .collect();
            union.into_iter().collect()
        }
    };

    let mut columns: Vec<Column> = Vec::with_capacity(names.len());
    for t in tables {
        // Row positions of each key in this input, shared by all of its columns.
        let rows: Vec<Option<usize>> = keys
            .iter()
            .map(|ts| t.index().binary_search(ts).ok())
            .collect();
        for c in t.columns() {
            let values = rows
                .iter()
                .map(|row| row.and_then(|i| c.values()[i]))
                .collect();
            columns.push(Column::new(c.name(), values));
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "kimchi::timeseries",
        rows = keys.len(),
        columns = columns.len(),
        "joined tables"
    );

    AlignedTable::new(keys, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::series::TimePoint;

    fn t(h: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(h * 3_600, 0).unwrap()
    }

    fn s(name: &str, hours: &[i64]) -> NamedSeries {
        NamedSeries::new(
            name,
            hours.iter().map(|&h| TimePoint::new(t(h), h as f64)),
        )
        .unwrap()
    }

    #[test]
    fn inner_keeps_common_timestamps_only() {
        let out = join(&[s("a", &[3, 1, 2]), s("b", &[2, 3, 4])], JoinMode::Inner).unwrap();
        assert_eq!(out.index(), &[t(2), t(3)]);
        assert_eq!(out.column("b").unwrap(), &[Some(2.0), Some(3.0)]);
    }

    #[test]
    fn outer_marks_missing_cells_explicitly() {
        let out = join(&[s("a", &[1]), s("b", &[2])], JoinMode::Outer).unwrap();
        assert_eq!(out.index(), &[t(1), t(2)]);
        assert_eq!(out.column("a").unwrap(), &[Some(1.0), None]);
        assert_eq!(out.column("b").unwrap(), &[None, Some(2.0)]);
    }

    #[test]
    fn empty_input_and_disjoint_inner() {
        assert_eq!(
            join(&[], JoinMode::Inner).unwrap_err(),
            KimchiError::empty_input("series list")
        );
        let out = join(&[s("a", &[1]), s("b", &[2])], JoinMode::Inner).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.width(), 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = join(&[s("a", &[1]), s("a", &[2])], JoinMode::Outer).unwrap_err();
        assert!(matches!(err, KimchiError::DuplicateColumn { .. }));
    }
}
