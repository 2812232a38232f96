//! Black-Scholes gamma and dollar-gamma exposure.
//!
//! Used when a snapshot row has no usable gamma of its own. Dollar gamma is
//! the change in delta-hedge notional for a `move_size` move of the
//! underlying: `OI × multiplier × S² × move_size × Γ`.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use std::f64::consts::PI;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::{ExposureConfig, PricingConfig};

/// Standard equity/index option contract multiplier.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Exposure is quoted per 1% move of the underlying.
pub const ONE_PERCENT_MOVE: f64 = 0.01;

/// Seconds in an ACT/365 year.
const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

// ============================================================================
// Black-Scholes Helpers
// ============================================================================

/// Standard normal PDF (probability density function).
fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter.
fn d1(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Black-Scholes gamma per unit of underlying (same for calls and puts).
///
/// Returns 0 when there is no time value left (`t <= 0`) or no volatility
/// (`sigma <= 0`).
#[must_use]
pub fn bs_gamma(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    if t <= 0.0 || sigma <= 0.0 {
        return 0.0;
    }
    let d1_val = d1(s, k, t, r, q, sigma);
    (-q * t).exp() * norm_pdf(d1_val) / (s * sigma * t.sqrt())
}

fn dollar_gamma(gamma: f64, open_interest: f64, spot: f64, multiplier: f64, move_size: f64) -> f64 {
    open_interest * multiplier * spot * spot * move_size * gamma
}

/// Dollar-gamma exposure of `open_interest` contracts for a 1% move.
///
/// # Arguments
///
/// * `spot` - Underlying price
/// * `strike` - Strike price
/// * `implied_vol` - Implied volatility (annualized, decimal)
/// * `time_to_expiry` - Time to expiration (years)
/// * `risk_free_rate` - Risk-free rate (annualized)
/// * `dividend_yield` - Dividend yield (continuous)
/// * `open_interest` - Contracts outstanding
///
/// Returns exactly 0 when `time_to_expiry` or `implied_vol` is 0.
#[must_use]
pub fn black_scholes_gamma_exposure(
    spot: f64,
    strike: f64,
    implied_vol: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    open_interest: f64,
) -> f64 {
    if time_to_expiry <= 0.0 || implied_vol <= 0.0 {
        return 0.0;
    }
    let gamma = bs_gamma(
        spot,
        strike,
        time_to_expiry,
        risk_free_rate,
        dividend_yield,
        implied_vol,
    );
    dollar_gamma(gamma, open_interest, spot, CONTRACT_MULTIPLIER, ONE_PERCENT_MOVE)
}

/// Year fraction (ACT/365) from the start of the snapshot date to an
/// expiration cutoff, clamped at zero for already-expired rows.
#[must_use]
pub fn year_fraction(snapshot_date: NaiveDate, expiration: NaiveDateTime) -> f64 {
    let start = snapshot_date.and_time(NaiveTime::MIN);
    let seconds = (expiration - start).num_seconds();
    if seconds <= 0 {
        return 0.0;
    }
    seconds as f64 / SECONDS_PER_YEAR
}

// ============================================================================
// Gamma Model
// ============================================================================

/// Black-Scholes gamma model bound to configured rates and scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaModel {
    risk_free_rate: f64,
    dividend_yield: f64,
    contract_multiplier: f64,
    move_size: f64,
}

impl Default for GammaModel {
    fn default() -> Self {
        Self::new(&PricingConfig::default(), &ExposureConfig::default())
    }
}

impl GammaModel {
    /// Create a model from pricing and exposure configuration.
    #[must_use]
    pub const fn new(pricing: &PricingConfig, exposure: &ExposureConfig) -> Self {
        Self {
            risk_free_rate: pricing.risk_free_rate,
            dividend_yield: pricing.dividend_yield,
            contract_multiplier: exposure.contract_multiplier,
            move_size: exposure.move_size,
        }
    }

    /// Gamma per unit of underlying.
    #[must_use]
    pub fn gamma(&self, spot: f64, strike: f64, implied_vol: f64, time_to_expiry: f64) -> f64 {
        bs_gamma(
            spot,
            strike,
            time_to_expiry,
            self.risk_free_rate,
            self.dividend_yield,
            implied_vol,
        )
    }

    /// Dollar-gamma exposure of `open_interest` contracts.
    #[must_use]
    pub fn exposure(
        &self,
        spot: f64,
        strike: f64,
        implied_vol: f64,
        time_to_expiry: f64,
        open_interest: f64,
    ) -> f64 {
        if time_to_expiry <= 0.0 || implied_vol <= 0.0 {
            return 0.0;
        }
        let gamma = self.gamma(spot, strike, implied_vol, time_to_expiry);
        dollar_gamma(
            gamma,
            open_interest,
            spot,
            self.contract_multiplier,
            self.move_size,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
