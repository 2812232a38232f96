//! Gamma exposure (GEX) calculation.
//!
//! Turns parsed contract rows into signed dollar-gamma exposure per row,
//! sums it by strike across expirations and summarizes the total in
//! billions per 1% move of the underlying.
//!
//! Calls are counted positive and puts negative, following the usual
//! convention that dealers are long call gamma and short put gamma.
//!
//! # Example
//!
//! ```ignore
//! use gex_engine::exposure::ExposureCalculator;
//! use gex_engine::snapshot::parse_snapshot;
//!
//! let snapshot = parse_snapshot(&raw)?;
//! let report = ExposureCalculator::default().compute(&snapshot.metadata, &snapshot.rows)?;
//! println!("Total gamma: ${:.2} Bn per 1% move", report.total_gamma_bn);
//! ```

mod calculator;
mod error;
mod types;

pub use calculator::ExposureCalculator;
pub use error::ExposureError;
pub use types::{
    AggregatedSeries, BILLION, ExposureReport, ExposureRow, GammaOrigin, StrikeExposure,
    StrikeKey, StrikeWindow,
};

pub use crate::config::GammaSource;
