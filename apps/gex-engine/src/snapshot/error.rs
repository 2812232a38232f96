//! Snapshot parsing error types.

use thiserror::Error;

/// Broad classification of a snapshot error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotErrorKind {
    /// The file does not match the expected layout.
    Format,
    /// The strike price could not be coerced to a positive number.
    NumericCoercion,
}

impl SnapshotErrorKind {
    /// Stable lowercase label, used for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::NumericCoercion => "numeric_coercion",
        }
    }
}

/// Snapshot parsing errors.
///
/// Every variant is terminal for the invocation. Line numbers are 1-based
/// positions in the source file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file ended before a required header line.
    #[error("Snapshot has {found} lines, expected at least {expected}")]
    MissingLine {
        /// Minimum number of lines required.
        expected: usize,
        /// Lines actually present.
        found: usize,
    },

    /// The spot price label is absent from its header line.
    #[error("Line {line}: spot price label '{label}' not found")]
    MissingSpotLabel {
        /// Header line searched.
        line: usize,
        /// Label that was expected.
        label: &'static str,
    },

    /// The text after the spot price label is not a positive number.
    #[error("Line {line}: invalid spot price '{value}'")]
    InvalidSpotPrice {
        /// Header line containing the label.
        line: usize,
        /// Offending text.
        value: String,
    },

    /// A date field does not match the `Www Mmm DD YYYY` format.
    #[error("Line {line}: invalid date '{value}' in {column}: {source}")]
    InvalidDate {
        /// Source line.
        line: usize,
        /// Column (or header field) holding the date.
        column: &'static str,
        /// Offending text.
        value: String,
        /// Underlying chrono error.
        source: chrono::ParseError,
    },

    /// A tabular row has the wrong number of fields.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// Source line.
        line: usize,
        /// Fields required by the schema.
        expected: usize,
        /// Fields present.
        found: usize,
    },

    /// Non-numeric text in a numeric column.
    #[error("Line {line}: column {column} is not numeric: '{value}'")]
    InvalidNumber {
        /// Source line.
        line: usize,
        /// Column name from the schema.
        column: &'static str,
        /// Offending text.
        value: String,
    },

    /// The strike price field is blank.
    #[error("Line {line}: strike price is missing")]
    MissingStrike {
        /// Source line.
        line: usize,
    },

    /// The strike price is non-numeric or not positive.
    #[error("Line {line}: invalid strike price '{value}'")]
    InvalidStrike {
        /// Source line.
        line: usize,
        /// Offending text.
        value: String,
    },

    /// The tabular section could not be tokenized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SnapshotError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> SnapshotErrorKind {
        match self {
            Self::MissingStrike { .. } | Self::InvalidStrike { .. } => {
                SnapshotErrorKind::NumericCoercion
            }
            Self::MissingLine { .. }
            | Self::MissingSpotLabel { .. }
            | Self::InvalidSpotPrice { .. }
            | Self::InvalidDate { .. }
            | Self::FieldCount { .. }
            | Self::InvalidNumber { .. }
            | Self::Csv(_) => SnapshotErrorKind::Format,
        }
    }

    /// Source line the error refers to, when it is row or header specific.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MissingSpotLabel { line, .. }
            | Self::InvalidSpotPrice { line, .. }
            | Self::InvalidDate { line, .. }
            | Self::FieldCount { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::MissingStrike { line }
            | Self::InvalidStrike { line, .. } => Some(*line),
            Self::MissingLine { .. } | Self::Csv(_) => None,
        }
    }
}
