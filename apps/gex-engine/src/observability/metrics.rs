//! Metrics for snapshot parsing and exposure calculation.
//!
//! # Example
//!
//! ```ignore
//! use gex_engine::observability::record_snapshot_parse;
//!
//! // 1,250 contract rows parsed in 4ms
//! record_snapshot_parse(1250, 0.004);
//! ```

use metrics::{counter, histogram};

// ============================================================================
// Snapshot Metrics
// ============================================================================

/// Record a successfully parsed snapshot.
///
/// # Arguments
///
/// * `rows` - Contract rows decoded
/// * `duration_seconds` - Parse time in seconds
pub fn record_snapshot_parse(rows: usize, duration_seconds: f64) {
    histogram!("snapshot_parse_seconds").record(duration_seconds);
    counter!("snapshot_rows_parsed_total").increment(rows as u64);
}

/// Record a rejected snapshot.
///
/// # Arguments
///
/// * `kind` - Failure kind (e.g., `"format"`, `"numeric_coercion"`)
pub fn record_snapshot_error(kind: &str) {
    counter!(
        "snapshot_parse_failures_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

// ============================================================================
// Exposure Metrics
// ============================================================================

/// Record option sides valued with the Black-Scholes model.
pub fn record_gamma_model_fallbacks(count: usize) {
    counter!("gamma_model_fallbacks_total").increment(count as u64);
}

/// Record an exposure calculation.
///
/// # Arguments
///
/// * `rows` - Contract rows valued
/// * `strikes` - Distinct strikes after aggregation
/// * `model_fallbacks` - Sides valued with the model
/// * `duration_seconds` - Calculation time in seconds
pub fn record_exposure_compute(
    rows: usize,
    strikes: usize,
    model_fallbacks: usize,
    duration_seconds: f64,
) {
    histogram!("exposure_compute_seconds").record(duration_seconds);
    histogram!("exposure_strikes").record(strikes as f64);
    counter!("exposure_rows_total").increment(rows as u64);
    record_gamma_model_fallbacks(model_fallbacks);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_snapshot_parse() {
        // This test verifies the function doesn't panic
        // Actual metric recording requires an installed recorder
        record_snapshot_parse(1250, 0.004);
    }

    #[test]
    fn test_record_snapshot_error() {
        record_snapshot_error("format");
        record_snapshot_error("numeric_coercion");
    }

    #[test]
    fn test_record_gamma_model_fallbacks() {
        record_gamma_model_fallbacks(0);
        record_gamma_model_fallbacks(12);
    }

    #[test]
    fn test_record_exposure_compute() {
        record_exposure_compute(1250, 180, 3, 0.002);
    }
}
