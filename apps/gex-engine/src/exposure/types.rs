//! Exposure value objects: per-row exposure, strike series and report.

use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};

use crate::snapshot::SnapshotMetadata;

/// Dollars per billion.
pub const BILLION: f64 = 1e9;

/// Which valuation route produced a side's gamma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GammaOrigin {
    /// Gamma published in the snapshot.
    Supplied,
    /// Gamma derived with the Black-Scholes model.
    Model,
}

/// Dollar-gamma exposure of a single contract row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposureRow {
    /// Strike price as parsed.
    pub strike: f64,
    /// Expiration cutoff.
    pub expiration: NaiveDateTime,
    /// Call dollar gamma (non-negative for non-negative inputs).
    pub call_gex: f64,
    /// Put dollar gamma (negative by dealer convention).
    pub put_gex: f64,
    /// `(call_gex + put_gex) / 1e9`.
    pub total_gamma_bn: f64,
    /// Origin of the call gamma.
    pub call_origin: GammaOrigin,
    /// Origin of the put gamma.
    pub put_origin: GammaOrigin,
}

impl ExposureRow {
    /// Number of sides valued with the model.
    #[must_use]
    pub fn model_sides(&self) -> usize {
        [self.call_origin, self.put_origin]
            .iter()
            .filter(|o| **o == GammaOrigin::Model)
            .count()
    }
}

/// Strike normalized to a fixed number of decimal places.
///
/// Grouping on the rounded decimal keeps representation noise in the
/// source (`4000`, `4000.0`, `4000.000001`) from splitting one strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrikeKey(Decimal);

impl StrikeKey {
    /// Round `strike` to `decimals` places. `None` for non-finite or
    /// out-of-range values.
    #[must_use]
    pub fn new(strike: f64, decimals: u32) -> Option<Self> {
        Decimal::from_f64_retain(strike).map(|d| Self(d.round_dp(decimals).normalize()))
    }

    /// The rounded strike as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl std::fmt::Display for StrikeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exposure summed over every expiration at one strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikeExposure {
    /// Rounded strike.
    pub strike: f64,
    /// Summed call dollar gamma.
    pub call_gex: f64,
    /// Summed put dollar gamma.
    pub put_gex: f64,
    /// Summed total gamma in billions.
    pub total_gamma_bn: f64,
    /// Rows merged into this strike.
    pub contracts: usize,
}

impl StrikeExposure {
    fn empty(strike: f64) -> Self {
        Self {
            strike,
            call_gex: 0.0,
            put_gex: 0.0,
            total_gamma_bn: 0.0,
            contracts: 0,
        }
    }

    fn absorb(&mut self, row: &ExposureRow) {
        self.call_gex += row.call_gex;
        self.put_gex += row.put_gex;
        self.total_gamma_bn += row.total_gamma_bn;
        self.contracts += 1;
    }
}

/// Exposure by strike, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    entries: BTreeMap<StrikeKey, StrikeExposure>,
}

impl AggregatedSeries {
    /// Create an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row's exposure under `key`.
    pub(crate) fn add(&mut self, key: StrikeKey, row: &ExposureRow) {
        self.entries
            .entry(key)
            .or_insert_with(|| StrikeExposure::empty(key.as_f64()))
            .absorb(row);
    }

    /// Number of distinct strikes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no strike is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a strike key.
    #[must_use]
    pub fn get(&self, key: &StrikeKey) -> Option<&StrikeExposure> {
        self.entries.get(key)
    }

    /// Entries in ascending strike order.
    pub fn iter(&self) -> btree_map::Iter<'_, StrikeKey, StrikeExposure> {
        self.entries.iter()
    }

    /// Entries in ascending strike order, without keys.
    pub fn values(&self) -> btree_map::Values<'_, StrikeKey, StrikeExposure> {
        self.entries.values()
    }

    /// Ascending strikes.
    #[must_use]
    pub fn strikes(&self) -> Vec<f64> {
        self.entries.values().map(|e| e.strike).collect()
    }

    /// Sum of `total_gamma_bn` across strikes.
    #[must_use]
    pub fn total_gamma_bn(&self) -> f64 {
        self.entries.values().map(|e| e.total_gamma_bn).sum()
    }
}

impl<'a> IntoIterator for &'a AggregatedSeries {
    type Item = (&'a StrikeKey, &'a StrikeExposure);
    type IntoIter = btree_map::Iter<'a, StrikeKey, StrikeExposure>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for AggregatedSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

/// Display range around spot, `[spot × (1 − pct), spot × (1 + pct)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikeWindow {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl StrikeWindow {
    /// Window of `pct` either side of `spot`.
    #[must_use]
    pub fn around(spot: f64, pct: f64) -> Self {
        Self {
            low: (1.0 - pct) * spot,
            high: (1.0 + pct) * spot,
        }
    }

    /// Whether `strike` falls inside the window (inclusive).
    #[must_use]
    pub fn contains(&self, strike: f64) -> bool {
        strike >= self.low && strike <= self.high
    }
}

/// Everything the chart producer needs from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureReport {
    /// Snapshot header.
    pub metadata: SnapshotMetadata,
    /// Per-row exposure in source order.
    pub rows: Vec<ExposureRow>,
    /// Exposure by strike.
    pub series: AggregatedSeries,
    /// Sum of per-row `total_gamma_bn`, in source order.
    pub total_gamma_bn: f64,
    /// Display window around spot.
    pub strike_window: StrikeWindow,
    /// Option sides valued with the Black-Scholes model.
    pub model_fallbacks: usize,
}

impl ExposureReport {
    /// Strikes inside the display window.
    pub fn windowed(&self) -> impl Iterator<Item = &StrikeExposure> {
        self.series
            .values()
            .filter(|e| self.strike_window.contains(e.strike))
    }

    /// Total call dollar gamma.
    #[must_use]
    pub fn call_gex(&self) -> f64 {
        self.rows.iter().map(|r| r.call_gex).sum()
    }

    /// Total put dollar gamma.
    #[must_use]
    pub fn put_gex(&self) -> f64 {
        self.rows.iter().map(|r| r.put_gex).sum()
    }
}
