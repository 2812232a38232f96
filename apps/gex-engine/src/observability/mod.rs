//! Observability module for metrics.
//!
//! Metrics are emitted through the `metrics` facade. Without an installed
//! recorder every call is a no-op, so library users opt in by installing
//! whichever exporter they run.

mod metrics;

pub use metrics::{
    record_exposure_compute, record_gamma_model_fallbacks, record_snapshot_error,
    record_snapshot_parse,
};
