//! Parsed snapshot value objects.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Scalar metadata read from the snapshot header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Reference spot price of the underlying (always positive).
    pub spot_price: f64,
    /// Trading date the snapshot was taken on.
    pub snapshot_date: NaiveDate,
}

impl SnapshotMetadata {
    /// Create snapshot metadata.
    #[must_use]
    pub const fn new(spot_price: f64, snapshot_date: NaiveDate) -> Self {
        Self {
            spot_price,
            snapshot_date,
        }
    }
}

/// One side (call or put) of a chain row.
///
/// Blank implied volatility and open interest are stored as zero, which
/// means "no contribution". A blank gamma stays `None` so it can be told
/// apart from a published zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Implied volatility (annualized, decimal).
    pub implied_vol: f64,
    /// Gamma per unit of underlying as published, `None` when blank.
    pub gamma: Option<f64>,
    /// Open interest in contracts.
    pub open_interest: f64,
}

impl OptionQuote {
    /// Create a quote with a published gamma.
    #[must_use]
    pub const fn new(implied_vol: f64, gamma: f64, open_interest: f64) -> Self {
        Self {
            implied_vol,
            gamma: Some(gamma),
            open_interest,
        }
    }

    /// Create a quote whose gamma field was blank.
    #[must_use]
    pub const fn without_gamma(implied_vol: f64, open_interest: f64) -> Self {
        Self {
            implied_vol,
            gamma: None,
            open_interest,
        }
    }

    /// Published gamma, zero when blank.
    #[must_use]
    pub fn gamma_or_zero(&self) -> f64 {
        self.gamma.unwrap_or(0.0)
    }
}

/// A single (expiration, strike) row with paired call and put fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractRow {
    /// Expiration at the end-of-day cutoff.
    pub expiration: NaiveDateTime,
    /// Strike price (always positive).
    pub strike: f64,
    /// Call side.
    pub call: OptionQuote,
    /// Put side.
    pub put: OptionQuote,
}

/// A fully parsed snapshot: header metadata plus rows in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Header metadata.
    pub metadata: SnapshotMetadata,
    /// Contract rows in the order they appear in the source.
    pub rows: Vec<ContractRow>,
}

impl Snapshot {
    /// Number of contract rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the snapshot carries no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
