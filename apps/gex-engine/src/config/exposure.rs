//! Exposure calculation configuration.

use serde::{Deserialize, Serialize};

/// Where a row's gamma comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GammaSource {
    /// Use the snapshot's gamma as published, blanks contribute zero.
    Supplied,
    /// Use the snapshot's gamma when present and finite, otherwise the
    /// Black-Scholes model. A published zero is kept.
    #[default]
    SuppliedWithFallback,
    /// Always use the Black-Scholes model.
    Model,
}

/// Exposure calculation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Units of underlying per contract.
    #[serde(default = "default_contract_multiplier")]
    pub contract_multiplier: f64,
    /// Underlying move the exposure is quoted for (0.01 = 1%).
    #[serde(default = "default_move_size")]
    pub move_size: f64,
    /// Half-width of the display window as a fraction of spot.
    #[serde(default = "default_strike_window_pct")]
    pub strike_window_pct: f64,
    /// Decimal places strikes are rounded to before grouping.
    #[serde(default = "default_strike_decimals")]
    pub strike_decimals: u32,
    /// Gamma source strategy.
    #[serde(default)]
    pub gamma_source: GammaSource,
    /// Derive per-row exposure on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: default_contract_multiplier(),
            move_size: default_move_size(),
            strike_window_pct: default_strike_window_pct(),
            strike_decimals: default_strike_decimals(),
            gamma_source: GammaSource::default(),
            parallel: default_parallel(),
        }
    }
}

const fn default_contract_multiplier() -> f64 {
    100.0
}

const fn default_move_size() -> f64 {
    0.01
}

const fn default_strike_window_pct() -> f64 {
    0.15
}

const fn default_strike_decimals() -> u32 {
    2
}

const fn default_parallel() -> bool {
    true
}
