//! CSV exchange format for aligned tables and upstream rows.
//!
//! Layout: a `timestamp` column first, then one column per series. Timestamps
//! are UTC in `%Y-%m-%d %H:%M:%S`; missing cells are empty fields. Floats are
//! written in their shortest round-trip form, so a write/read cycle reproduces
//! every value exactly.

use std::fmt::Display;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::KimchiError;
use crate::candle::Candle;
use crate::flow::{FlowRecord, FlowSeries};
use crate::timeseries::series::{NamedSeries, TimePoint};
use crate::timeseries::table::{AlignedTable, Column};
use crate::timeseries::util::floor_hour;

/// Name of the index column.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// `chrono` format of the index column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn tabular_err(e: impl Display) -> KimchiError {
    KimchiError::Tabular(e.to_string())
}

/// Parse an index cell: `%Y-%m-%d %H:%M:%S` (UTC) or RFC 3339.
///
/// # Errors
/// `KimchiError::Tabular` if neither form matches.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, KimchiError> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| KimchiError::Tabular(format!("invalid timestamp {s:?}: {e}")))
}

/// Serde adapter for timestamp fields in tabular rows.
pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Write `ts` in the tabular timestamp format.
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(super::TIMESTAMP_FORMAT))
    }

    /// Read a timestamp in the tabular format or RFC 3339.
    ///
    /// # Errors
    /// Fails on any other text.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

/// Write `table` as CSV.
///
/// # Errors
/// `KimchiError::Tabular` on I/O failure.
pub fn write_table<W: Write>(table: &AlignedTable, writer: W) -> Result<(), KimchiError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(std::iter::once(TIMESTAMP_COLUMN).chain(table.column_names()))
        .map_err(tabular_err)?;
    for (i, ts) in table.index().iter().enumerate() {
        let mut record = Vec::with_capacity(table.width() + 1);
        record.push(ts.format(TIMESTAMP_FORMAT).to_string());
        record.extend(
            table
                .columns()
                .iter()
                .map(|c| c.values()[i].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record).map_err(tabular_err)?;
    }
    wtr.flush().map_err(tabular_err)
}

/// Read a table written by [`write_table`].
///
/// Rows must be strictly ascending by timestamp.
///
/// # Errors
/// - `MissingColumn` if the first header is not `timestamp`.
/// - `Tabular` for malformed timestamps or numbers.
/// - Any error of [`AlignedTable::new`] (unsorted rows, duplicate headers).
pub fn read_table<R: Read>(reader: R) -> Result<AlignedTable, KimchiError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().map_err(tabular_err)?.clone();
    let mut names = headers.iter();
    if names.next() != Some(TIMESTAMP_COLUMN) {
        return Err(KimchiError::missing_column(TIMESTAMP_COLUMN));
    }
    let names: Vec<String> = names.map(str::to_string).collect();

    let mut index = Vec::new();
    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(tabular_err)?;
        let ts = record
            .get(0)
            .ok_or_else(|| KimchiError::Tabular(format!("row {row}: empty record")))?;
        index.push(parse_timestamp(ts)?);
        for (j, column) in cells.iter_mut().enumerate() {
            let raw = record.get(j + 1).unwrap_or("").trim();
            let value = if raw.is_empty() {
                None
            } else {
                Some(raw.parse::<f64>().map_err(|e| {
                    KimchiError::Tabular(format!("row {row}, column {}: {e}", names[j]))
                })?)
            };
            column.push(value);
        }
    }
    AlignedTable::new(
        index,
        names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

/// [`write_table`] into a file, replacing it.
///
/// # Errors
/// `KimchiError::Tabular` on I/O failure.
pub fn write_table_to_path(table: &AlignedTable, path: impl AsRef<Path>) -> Result<(), KimchiError> {
    write_table(table, File::create(path).map_err(tabular_err)?)
}

/// [`read_table`] from a file.
///
/// # Errors
/// As [`read_table`], plus `Tabular` if the file cannot be opened.
pub fn read_table_from_path(path: impl AsRef<Path>) -> Result<AlignedTable, KimchiError> {
    read_table(File::open(path).map_err(tabular_err)?)
}

/// Write serializable report rows (summary, lag profile, statistics) as CSV.
///
/// # Errors
/// `KimchiError::Tabular` on I/O or serialization failure.
pub fn write_rows<T: Serialize, W: Write>(rows: &[T], writer: W) -> Result<(), KimchiError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row).map_err(tabular_err)?;
    }
    wtr.flush().map_err(tabular_err)
}

fn read_rows<T, R>(reader: R) -> Result<Vec<T>, KimchiError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(tabular_err)
}

/// Read `timestamp,open,high,low,close,volume` rows.
///
/// # Errors
/// `KimchiError::Tabular` on malformed input.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>, KimchiError> {
    read_rows(reader)
}

#[derive(Deserialize)]
struct RateRow {
    #[serde(with = "timestamp_format")]
    timestamp: DateTime<Utc>,
    rate: f64,
}

/// Read `timestamp,rate` rows into a series called `name`.
///
/// Timestamps are floored to their hour.
///
/// # Errors
/// - `Tabular` on malformed input.
/// - `DuplicateTimestamp` if a timestamp repeats.
pub fn read_rates<R: Read>(reader: R, name: impl Into<String>) -> Result<NamedSeries, KimchiError> {
    let rows: Vec<RateRow> = read_rows(reader)?;
    NamedSeries::new(
        name,
        rows.into_iter()
            .map(|r| TimePoint::new(floor_hour(r.timestamp), r.rate)),
    )
}

/// Read `timestamp,net_flow,inflow,outflow` rows.
///
/// Timestamps are floored to their hour.
///
/// # Errors
/// - `Tabular` on malformed input.
/// - `Data` if a row breaks the flow invariant.
/// - `DuplicateTimestamp` if an hour repeats.
pub fn read_flows<R: Read>(reader: R) -> Result<FlowSeries, KimchiError> {
    let rows: Vec<FlowRecord> = read_rows(reader)?;
    FlowSeries::new(rows.into_iter().map(|r| FlowRecord {
        ts: floor_hour(r.ts),
        ..r
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_accept_both_forms() {
        let a = parse_timestamp("2024-01-02 03:00:00").unwrap();
        let b = parse_timestamp("2024-01-02T03:00:00Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn missing_index_header_is_rejected() {
        let err = read_table("time,a\n2024-01-01 00:00:00,1\n".as_bytes()).unwrap_err();
        assert_eq!(err, KimchiError::missing_column("timestamp"));
    }

    #[test]
    fn rates_and_flows_parse() {
        let rates = read_rates(
            "timestamp,rate\n2024-01-01 00:00:00,1300.5\n2024-01-01 01:00:00,1301\n".as_bytes(),
            "usd_krw",
        )
        .unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.values().next(), Some(1300.5));

        let flows = read_flows(
            "timestamp,net_flow,inflow,outflow\n2024-01-01 00:00:00,-2,1,3\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(flows.records()[0].outflow, 3.0);

        let rates = read_rates(
            "timestamp,rate\n2024-01-01 00:30:00,1300.5\n2024-01-01 01:00:00,1301\n".as_bytes(),
            "usd_krw",
        )
        .unwrap();
        assert_eq!(
            rates.timestamps().collect::<Vec<_>>(),
            vec![
                parse_timestamp("2024-01-01 00:00:00").unwrap(),
                parse_timestamp("2024-01-01 01:00:00").unwrap(),
            ]
        );
        let flows = read_flows(
            "timestamp,net_flow,inflow,outflow\n2024-01-01 05:59:59,1,1,0\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(flows.records()[0].ts, parse_timestamp("2024-01-01 05:00:00").unwrap());

        let bad = read_flows("timestamp,net_flow,inflow,outflow\n2024-01-01 00:00:00,5,1,3\n".as_bytes());
        assert!(matches!(bad, Err(KimchiError::Data(_))));
    }
}
