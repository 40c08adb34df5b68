use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::KimchiError;
use crate::timeseries::series::{NamedSeries, TimePoint};

/// A named column of optional values aligned to a table's timestamp index.
///
/// `None` marks a missing cell; it is never coerced to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

impl Column {
    /// Build a column.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells in index order.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Several columns joined on a shared, strictly ascending timestamp index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedTable {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl AlignedTable {
    /// Build a table, validating its invariants.
    ///
    /// # Errors
    /// - `InvalidArg` if the index is not strictly ascending or a column's
    ///   length differs from the index length.
    /// - `DuplicateColumn` if two columns share a name.
    pub fn new(index: Vec<DateTime<Utc>>, columns: Vec<Column>) -> Result<Self, KimchiError> {
        if index.windows(2).any(|w| w[0] >= w[1]) {
            return Err(KimchiError::InvalidArg(
                "table index must be strictly ascending".into(),
            ));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for c in &columns {
            if c.values.len() != index.len() {
                return Err(KimchiError::InvalidArg(format!(
                    "column {} has {} cells, index has {} rows",
                    c.name,
                    c.values.len(),
                    index.len()
                )));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(KimchiError::duplicate_column(c.name.clone()));
            }
        }
        Ok(Self { index, columns })
    }

    pub(crate) const fn from_parts_unchecked(
        index: Vec<DateTime<Utc>>,
        columns: Vec<Column>,
    ) -> Self {
        Self { index, columns }
    }

    /// Ascending timestamp index.
    #[must_use]
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Whether a column named `name` exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Cells of the column named `name`.
    ///
    /// # Errors
    /// Returns `KimchiError::MissingColumn` if no such column exists.
    pub fn column(&self, name: &str) -> Result<&[Option<f64>], KimchiError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| KimchiError::missing_column(name))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Append a column.
    ///
    /// # Errors
    /// - `DuplicateColumn` if the name is already taken.
    /// - `InvalidArg` if the column length differs from the row count.
    pub fn with_column(mut self, column: Column) -> Result<Self, KimchiError> {
        if self.has_column(&column.name) {
            return Err(KimchiError::duplicate_column(column.name));
        }
        if column.values.len() != self.index.len() {
            return Err(KimchiError::InvalidArg(format!(
                "column {} has {} cells, index has {} rows",
                column.name,
                column.values.len(),
                self.index.len()
            )));
        }
        self.columns.push(column);
        Ok(self)
    }

    /// Replace the cells of an existing column in place, or append it.
    pub(crate) fn upsert_column(&mut self, name: String, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.index.len());
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == name) {
            existing.values = values;
        } else {
            self.columns.push(Column { name, values });
        }
    }

    /// Table restricted to the named columns, in the order given.
    ///
    /// # Errors
    /// Returns `KimchiError::MissingColumn` for the first unknown name.
    pub fn select(&self, names: &[&str]) -> Result<Self, KimchiError> {
        let columns = names
            .iter()
            .map(|n| {
                self.column(n)
                    .map(|values| Column::new(*n, values.to_vec()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(self.index.clone(), columns)
    }

    /// Rows whose timestamp lies in `[start, end]`.
    #[must_use]
    pub fn clip(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let lo = self.index.partition_point(|ts| *ts < start);
        let hi = self.index.partition_point(|ts| *ts <= end).max(lo);
        Self {
            index: self.index[lo..hi].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values[lo..hi].to_vec()))
                .collect(),
        }
    }

    /// Non-missing cells of a column as a series.
    ///
    /// # Errors
    /// Returns `KimchiError::MissingColumn` if no such column exists.
    pub fn series(&self, name: &str) -> Result<NamedSeries, KimchiError> {
        let values = self.column(name)?;
        Ok(NamedSeries::first_wins(
            name,
            self.index
                .iter()
                .zip(values)
                .filter_map(|(ts, v)| v.map(|v| TimePoint::new(*ts, v))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(h * 3_600, 0).unwrap()
    }

    fn table() -> AlignedTable {
        AlignedTable::new(
            vec![t(0), t(1), t(2)],
            vec![
                Column::new("a", vec![Some(1.0), None, Some(3.0)]),
                Column::new("b", vec![Some(4.0), Some(5.0), Some(6.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_unsorted_index_and_ragged_columns() {
        assert!(AlignedTable::new(vec![t(1), t(0)], vec![]).is_err());
        assert!(AlignedTable::new(vec![t(0), t(0)], vec![]).is_err());
        assert!(AlignedTable::new(vec![t(0)], vec![Column::new("a", vec![])]).is_err());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = table().column("net_flow").unwrap_err();
        assert_eq!(err, KimchiError::missing_column("net_flow"));
    }

    #[test]
    fn clip_and_select() {
        let tb = table().clip(t(1), t(5));
        assert_eq!(tb.index(), &[t(1), t(2)]);
        assert_eq!(tb.column("a").unwrap(), &[None, Some(3.0)]);

        let sel = table().select(&["b"]).unwrap();
        assert_eq!(sel.column_names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn series_drops_missing_cells() {
        let s = table().series("a").unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(t(2)), Some(3.0));
    }
}
