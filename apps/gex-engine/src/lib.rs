// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! GEX Engine - Gamma Exposure Profile Library
//!
//! Computes the dealer gamma exposure (GEX) profile of one underlying from a
//! single options-chain snapshot.
//!
//! # Pipeline
//!
//! - `snapshot`: Header metadata and the 22-column contract table
//! - `pricing`: Black-Scholes gamma for rows without a usable greek
//! - `exposure`: Signed dollar gamma per row, by strike, and in total
//! - `chart`: Renderer-agnostic chart descriptions
//!
//! # Ambient
//!
//! - `config`: YAML configuration with env var interpolation
//! - `observability`: `metrics` counters and histograms
//! - `telemetry`: `tracing` subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Core
// =============================================================================

/// Options-chain snapshot parsing.
pub mod snapshot;

/// Black-Scholes gamma model.
pub mod pricing;

/// Gamma exposure calculation.
pub mod exposure;

/// Chart descriptions and rendering boundary.
pub mod chart;

/// End-to-end snapshot evaluation.
pub mod pipeline;

// =============================================================================
// Infrastructure
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Top-level error type.
pub mod error;

/// Metrics instrumentation.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use chart::{ChartRenderer, ChartSpec, JsonChartRenderer, build_charts};
pub use config::{Config, load_config};
pub use error::GexError;
pub use exposure::{ExposureCalculator, ExposureReport};
pub use pipeline::{GexOutput, run};
pub use pricing::GammaModel;
pub use snapshot::{Snapshot, parse_snapshot};
