//! Snapshot file to exposure report and chart descriptions.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::chart::{ChartSpec, build_charts};
use crate::config::{Config, validate_config};
use crate::error::GexError;
use crate::exposure::{BILLION, ExposureCalculator, ExposureReport};
use crate::snapshot::parse_snapshot;

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct GexOutput {
    /// Exposure report.
    pub report: ExposureReport,
    /// Aggregate and call/put charts.
    pub charts: [ChartSpec; 2],
}

/// Read, parse and evaluate the snapshot at `input`.
pub fn run(input: &Path, config: &Config) -> Result<GexOutput, GexError> {
    let raw = std::fs::read_to_string(input).map_err(|source| GexError::Io {
        path: input.display().to_string(),
        source,
    })?;
    tracing::info!(path = %input.display(), bytes = raw.len(), "Loaded snapshot");
    run_str(&raw, config)
}

/// Parse and evaluate snapshot text.
pub fn run_str(raw: &str, config: &Config) -> Result<GexOutput, GexError> {
    validate_config(config)?;

    let snapshot = parse_snapshot(raw)?;
    let report = ExposureCalculator::from_config(config).compute(&snapshot.metadata, &snapshot.rows)?;
    let charts = build_charts(&report, &config.chart);

    Ok(GexOutput { report, charts })
}

/// Strike table of the display window plus a summary line.
#[must_use]
pub fn format_strike_table(report: &ExposureReport, underlying_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>10} {:>14} {:>14} {:>14}",
        "Strike", "Call ($Bn)", "Put ($Bn)", "Total ($Bn)"
    );
    for entry in report.windowed() {
        let _ = writeln!(
            out,
            "{:>10.2} {:>14.4} {:>14.4} {:>14.4}",
            entry.strike,
            entry.call_gex / BILLION,
            entry.put_gex / BILLION,
            entry.total_gamma_bn
        );
    }
    let _ = writeln!(
        out,
        "{underlying_label} spot {:.2} on {}: total gamma ${:.2} Bn per 1% move ({} strikes, {} model fallbacks)",
        report.metadata.spot_price,
        report.metadata.snapshot_date,
        report.total_gamma_bn,
        report.series.len(),
        report.model_fallbacks
    );
    let _ = writeln!(
        out,
        "calls ${:.4} Bn, puts ${:.4} Bn",
        report.call_gex() / BILLION,
        report.put_gex() / BILLION
    );
    out
}
