//! Pricing model configuration for the Black-Scholes gamma fallback.

use serde::{Deserialize, Serialize};

/// Pricing model configuration.
///
/// Both rates default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized, continuous).
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Dividend yield (annualized, continuous).
    #[serde(default)]
    pub dividend_yield: f64,
}
