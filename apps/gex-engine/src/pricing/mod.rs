//! Options pricing.
//!
//! This module provides the closed-form Black-Scholes gamma used as the
//! fallback valuation route when a snapshot row's own gamma is unusable.
//!
//! # Example
//!
//! ```ignore
//! use gex_engine::pricing::black_scholes_gamma_exposure;
//!
//! // 1,000 ATM contracts, 20% IV, two weeks to expiry
//! let gex = black_scholes_gamma_exposure(4000.0, 4000.0, 0.20, 14.0 / 365.0, 0.0, 0.0, 1000.0);
//! ```

mod gamma;

pub use gamma::{
    CONTRACT_MULTIPLIER, GammaModel, ONE_PERCENT_MOVE, black_scholes_gamma_exposure, bs_gamma,
    year_fraction,
};
