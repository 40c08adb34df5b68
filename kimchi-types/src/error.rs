use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the kimchi workspace.
///
/// Contract violations (empty inputs, missing columns, duplicate keys) are
/// fatal to the single operation that raised them. Statistically degenerate
/// data never produces an error; the correlation engine resolves it to a
/// neutral result instead.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KimchiError {
    /// An operation that needs at least one input received none.
    #[error("empty input: {what}")]
    EmptyInput {
        /// Description of the missing input, e.g. "series list".
        what: String,
    },

    /// A required column is absent from an aligned table.
    #[error("missing column: {column}")]
    MissingColumn {
        /// Name of the column that was looked up.
        column: String,
    },

    /// No configured asset produced a premium series.
    #[error("no premium data could be calculated for any configured asset")]
    NoPremiumData,

    /// A series contained the same timestamp more than once.
    #[error("duplicate timestamp {ts} in series {series}")]
    DuplicateTimestamp {
        /// Series identifier.
        series: String,
        /// Offending timestamp, RFC 3339.
        ts: String,
    },

    /// Two inputs of a join carried the same column name.
    #[error("duplicate column: {column}")]
    DuplicateColumn {
        /// Name that appeared more than once.
        column: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with the supplied data (violated record invariants, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Reading or writing the tabular exchange format failed.
    #[error("tabular format: {0}")]
    Tabular(String),
}

/// Coarse classification of a [`KimchiError`] for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The caller supplied data that breaks an operation's contract.
    ContractViolation,
    /// The supplied data is well-formed but unusable.
    DataQuality,
    /// Some, but not all, of the requested results could be produced.
    PartialCoverage,
    /// Serialization or deserialization failed.
    Io,
}

impl KimchiError {
    /// Helper: build an `EmptyInput` error.
    pub fn empty_input(what: impl Into<String>) -> Self {
        Self::EmptyInput { what: what.into() }
    }

    /// Helper: build a `MissingColumn` error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Helper: build a `DuplicateColumn` error.
    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Helper: build a `DuplicateTimestamp` error.
    pub fn duplicate_timestamp(series: impl Into<String>, ts: chrono::DateTime<chrono::Utc>) -> Self {
        Self::DuplicateTimestamp {
            series: series.into(),
            ts: ts.to_rfc3339(),
        }
    }

    /// Classify the error for status reporting.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput { .. }
            | Self::MissingColumn { .. }
            | Self::DuplicateTimestamp { .. }
            | Self::DuplicateColumn { .. }
            | Self::InvalidArg(_) => ErrorKind::ContractViolation,
            Self::Data(_) => ErrorKind::DataQuality,
            Self::NoPremiumData => ErrorKind::PartialCoverage,
            Self::Tabular(_) => ErrorKind::Io,
        }
    }
}
