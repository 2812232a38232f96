//! GEX Engine Binary
//!
//! Computes the gamma exposure profile of an options-chain snapshot.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gex-engine -- spx_quotedata.csv
//! cargo run --bin gex-engine -- spx_quotedata.csv --config gex.yaml --output gex.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gex_engine::chart::{ChartRenderer, JsonChartRenderer};
use gex_engine::config::{Config, load_config};
use gex_engine::pipeline::{self, format_strike_table};
use gex_engine::telemetry::init_tracing;

/// Gamma exposure profile of an options-chain snapshot.
#[derive(Parser)]
#[command(name = "gex-engine", version, about)]
struct Cli {
    /// Path to the chain snapshot CSV
    input: PathBuf,

    /// YAML configuration file (defaults apply when omitted)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write the report and chart descriptions as JSON to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Also write the chart descriptions alone to this file
    #[arg(long)]
    charts: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    init_tracing(&config.observability.logging)?;

    let output = pipeline::run(&cli.input, &config)
        .with_context(|| format!("Failed to evaluate {}", cli.input.display()))?;

    if let Some(path) = &cli.charts {
        JsonChartRenderer::new(path).render(&output.charts)?;
    }

    match &cli.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&output)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote report");
        }
        None => print!(
            "{}",
            format_strike_table(&output.report, &config.chart.underlying_label)
        ),
    }

    Ok(())
}
