//! Configuration module for the GEX engine.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults used for SPX chain exports (100x multiplier, 1% move, ±15%
//! window, zero rates).
//!
//! # Usage
//!
//! ```rust,ignore
//! use gex_engine::config::{Config, load_config};
//!
//! // Load from a YAML file
//! let config = load_config("gex.yaml")?;
//!
//! // Or use defaults
//! let config = Config::default();
//! println!("window: ±{}", config.exposure.strike_window_pct);
//! ```

mod chart;
mod exposure;
mod observability;
mod pricing;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use chart::ChartConfig;
pub use exposure::{ExposureConfig, GammaSource};
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;

/// Largest supported strike rounding precision.
const MAX_STRIKE_DECIMALS: u32 = 8;

/// Errors raised while loading a GEX config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be opened or read.
    #[error("cannot read GEX config '{path}': {source}")]
    ReadError {
        /// Path as given on the command line.
        path: String,
        /// IO failure.
        source: std::io::Error,
    },

    /// The YAML did not match the config layout.
    #[error("invalid GEX config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// A value is outside its allowed range.
    #[error("invalid GEX config value: {0}")]
    ValidationError(String),
}

/// GEX engine settings, one section per stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rates fed to the fallback gamma model.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Exposure calculation configuration.
    #[serde(default)]
    pub exposure: ExposureConfig,
    /// Chart labelling configuration.
    #[serde(default)]
    pub chart: ChartConfig,
    /// Log level and format.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Loading
// ============================================

/// Read a YAML config file, expand `${VAR}` references and validate it.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is unreadable, malformed or holds
/// out-of-range values.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Same as [`load_config`] for YAML already in memory.
///
/// # Errors
///
/// Returns [`ConfigError`] when the YAML is malformed or holds out-of-range
/// values.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-fallback}` references.
///
/// Unset or empty variables take the fallback, or the empty string when
/// there is none.
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static REFERENCE: OnceLock<Option<regex::Regex>> = OnceLock::new();

    let Some(reference) = REFERENCE
        .get_or_init(|| regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").ok())
    else {
        return input.to_string();
    };

    reference
        .replace_all(input, |cap: &regex::Captures<'_>| {
            let fallback = cap.get(2).map_or("", |m| m.as_str());
            std::env::var(&cap[1])
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        })
        .into_owned()
}

/// Check value ranges the YAML types cannot express.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming the first offending field.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let pricing = &config.pricing;
    if !pricing.risk_free_rate.is_finite() || !(-1.0..=1.0).contains(&pricing.risk_free_rate) {
        return Err(ConfigError::ValidationError(
            "pricing.risk_free_rate must be between -1.0 and 1.0".to_string(),
        ));
    }

    if !pricing.dividend_yield.is_finite() || !(-1.0..=1.0).contains(&pricing.dividend_yield) {
        return Err(ConfigError::ValidationError(
            "pricing.dividend_yield must be between -1.0 and 1.0".to_string(),
        ));
    }

    let exposure = &config.exposure;
    if !exposure.contract_multiplier.is_finite() || exposure.contract_multiplier <= 0.0 {
        return Err(ConfigError::ValidationError(
            "exposure.contract_multiplier must be positive".to_string(),
        ));
    }

    if !exposure.move_size.is_finite() || exposure.move_size <= 0.0 {
        return Err(ConfigError::ValidationError(
            "exposure.move_size must be positive".to_string(),
        ));
    }

    if !(exposure.strike_window_pct > 0.0 && exposure.strike_window_pct < 1.0) {
        return Err(ConfigError::ValidationError(
            "exposure.strike_window_pct must be between 0.0 and 1.0 (exclusive)".to_string(),
        ));
    }

    if exposure.strike_decimals > MAX_STRIKE_DECIMALS {
        return Err(ConfigError::ValidationError(format!(
            "exposure.strike_decimals must be at most {MAX_STRIKE_DECIMALS}"
        )));
    }

    if config.chart.underlying_label.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "chart.underlying_label must not be empty".to_string(),
        ));
    }

    Ok(())
}
