//! Exposure calculation error types.

use thiserror::Error;

/// Exposure calculation errors.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// A row's strike cannot be used as an aggregation key.
    #[error("Row {index}: strike {strike} cannot be used as an aggregation key")]
    UnrepresentableStrike {
        /// 0-based row index.
        index: usize,
        /// Offending strike.
        strike: f64,
    },

    /// The reference spot price is not a positive number.
    #[error("Spot price must be positive, got: {0}")]
    InvalidSpot(f64),
}
