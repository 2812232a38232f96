//! Per-row dollar gamma, strike aggregation and summary.

use std::time::Instant;

use rayon::prelude::*;

use super::error::ExposureError;
use super::types::{
    AggregatedSeries, BILLION, ExposureReport, ExposureRow, GammaOrigin, StrikeKey, StrikeWindow,
};
use crate::config::{Config, ExposureConfig, GammaSource, PricingConfig};
use crate::observability::record_exposure_compute;
use crate::pricing::{GammaModel, year_fraction};
use crate::snapshot::{ContractRow, OptionQuote, SnapshotMetadata};

/// Sign applied to call exposure (dealers long call gamma).
const CALL_SIGN: f64 = 1.0;

/// Sign applied to put exposure (dealers short put gamma).
const PUT_SIGN: f64 = -1.0;

/// Computes the gamma exposure profile of a parsed snapshot.
#[derive(Debug, Clone)]
pub struct ExposureCalculator {
    config: ExposureConfig,
    model: GammaModel,
}

impl Default for ExposureCalculator {
    fn default() -> Self {
        Self::new(&PricingConfig::default(), &ExposureConfig::default())
    }
}

impl ExposureCalculator {
    /// Create a calculator from pricing and exposure configuration.
    #[must_use]
    pub const fn new(pricing: &PricingConfig, exposure: &ExposureConfig) -> Self {
        Self {
            config: *exposure,
            model: GammaModel::new(pricing, exposure),
        }
    }

    /// Create a calculator from the root configuration.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(&config.pricing, &config.exposure)
    }

    /// Dollar-gamma exposure of a single row.
    #[must_use]
    pub fn row_exposure(&self, metadata: &SnapshotMetadata, row: &ContractRow) -> ExposureRow {
        let spot = metadata.spot_price;
        let time_to_expiry = year_fraction(metadata.snapshot_date, row.expiration);

        let (call_gex, call_origin) =
            self.side_exposure(spot, row.strike, &row.call, time_to_expiry, CALL_SIGN);
        let (put_gex, put_origin) =
            self.side_exposure(spot, row.strike, &row.put, time_to_expiry, PUT_SIGN);

        ExposureRow {
            strike: row.strike,
            expiration: row.expiration,
            call_gex,
            put_gex,
            total_gamma_bn: (call_gex + put_gex) / BILLION,
            call_origin,
            put_origin,
        }
    }

    /// Signed dollar gamma of one side and the route its gamma came from.
    fn side_exposure(
        &self,
        spot: f64,
        strike: f64,
        quote: &OptionQuote,
        time_to_expiry: f64,
        sign: f64,
    ) -> (f64, GammaOrigin) {
        let (gamma, origin) = match self.config.gamma_source {
            GammaSource::Supplied => (quote.gamma_or_zero(), GammaOrigin::Supplied),
            GammaSource::SuppliedWithFallback => match quote.gamma {
                Some(gamma) if gamma.is_finite() => (gamma, GammaOrigin::Supplied),
                // Nothing open on this side, so nothing to derive.
                _ if quote.open_interest == 0.0 => (quote.gamma_or_zero(), GammaOrigin::Supplied),
                _ => (
                    self.model
                        .gamma(spot, strike, quote.implied_vol, time_to_expiry),
                    GammaOrigin::Model,
                ),
            },
            GammaSource::Model => (
                self.model
                    .gamma(spot, strike, quote.implied_vol, time_to_expiry),
                GammaOrigin::Model,
            ),
        };

        let gex = gamma
            * quote.open_interest
            * self.config.contract_multiplier
            * spot
            * spot
            * self.config.move_size
            * sign;

        (gex, origin)
    }

    /// Compute the exposure report for a snapshot.
    ///
    /// Per-row exposure may be derived in parallel; aggregation and the
    /// summary are folded sequentially in source order, so the result does
    /// not depend on scheduling.
    ///
    /// # Errors
    ///
    /// Returns an error if the spot is not positive or a strike cannot be
    /// turned into an aggregation key. Neither happens for parser output.
    pub fn compute(
        &self,
        metadata: &SnapshotMetadata,
        rows: &[ContractRow],
    ) -> Result<ExposureReport, ExposureError> {
        let started = Instant::now();

        let spot = metadata.spot_price;
        if !spot.is_finite() || spot <= 0.0 {
            return Err(ExposureError::InvalidSpot(spot));
        }

        let exposures: Vec<ExposureRow> = if self.config.parallel {
            rows.par_iter()
                .map(|row| self.row_exposure(metadata, row))
                .collect()
        } else {
            rows.iter()
                .map(|row| self.row_exposure(metadata, row))
                .collect()
        };

        let mut series = AggregatedSeries::new();
        let mut total_gamma_bn = 0.0;
        let mut model_fallbacks = 0;
        for (index, exposure) in exposures.iter().enumerate() {
            let key = StrikeKey::new(exposure.strike, self.config.strike_decimals).ok_or(
                ExposureError::UnrepresentableStrike {
                    index,
                    strike: exposure.strike,
                },
            )?;
            series.add(key, exposure);
            total_gamma_bn += exposure.total_gamma_bn;
            model_fallbacks += exposure.model_sides();
        }

        let report = ExposureReport {
            metadata: *metadata,
            rows: exposures,
            series,
            total_gamma_bn,
            strike_window: StrikeWindow::around(spot, self.config.strike_window_pct),
            model_fallbacks,
        };

        record_exposure_compute(
            report.rows.len(),
            report.series.len(),
            model_fallbacks,
            started.elapsed().as_secs_f64(),
        );
        tracing::info!(
            rows = report.rows.len(),
            strikes = report.series.len(),
            model_fallbacks,
            total_gamma_bn = report.total_gamma_bn,
            "Computed gamma exposure"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::pricing::black_scholes_gamma_exposure;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn snapshot_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 2).unwrap()
    }

    fn expiry(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
    }

    fn metadata(spot: f64) -> SnapshotMetadata {
        SnapshotMetadata::new(spot, snapshot_date())
    }

    fn contract(strike: f64, call: OptionQuote, put: OptionQuote) -> ContractRow {
        ContractRow {
            expiration: expiry(16),
            strike,
            call,
            put,
        }
    }

    fn supplied_only() -> ExposureCalculator {
        let exposure = ExposureConfig {
            gamma_source: GammaSource::Supplied,
            ..ExposureConfig::default()
        };
        ExposureCalculator::new(&PricingConfig::default(), &exposure)
    }

    #[test]
    fn test_single_call_row() {
        // 0.002 x 500 x 100 x 4000^2 x 0.01 = 1.6e7
        let rows = [contract(
            4000.0,
            OptionQuote::new(0.0, 0.002, 500.0),
            OptionQuote::default(),
        )];

        let report = ExposureCalculator::default()
            .compute(&metadata(4000.0), &rows)
            .unwrap();

        let row = report.rows[0];
        assert!(approx_eq(row.call_gex, 1.6e7, 1e-3));
        assert_eq!(row.put_gex, 0.0);
        assert!(approx_eq(row.total_gamma_bn, 0.016, 1e-12));
        assert!(approx_eq(report.total_gamma_bn, 0.016, 1e-12));
        assert_eq!(report.model_fallbacks, 0);
    }

    #[test]
    fn test_put_exposure_is_negative() {
        let rows = [contract(
            3900.0,
            OptionQuote::default(),
            OptionQuote::new(0.25, 0.001, 1000.0),
        )];

        let report = supplied_only().compute(&metadata(4000.0), &rows).unwrap();

        let row = report.rows[0];
        assert!(row.put_gex < 0.0);
        assert!(approx_eq(row.put_gex, -1.6e7, 1e-3));
        assert_eq!(row.call_gex, 0.0);
    }

    #[test]
    fn test_blank_greeks_contribute_nothing() {
        let rows = [contract(
            4000.0,
            OptionQuote::new(0.0, 0.0, 250.0),
            OptionQuote::default(),
        )];

        let report = ExposureCalculator::default()
            .compute(&metadata(4000.0), &rows)
            .unwrap();

        assert_eq!(report.rows[0].call_gex, 0.0);
        assert_eq!(report.rows[0].total_gamma_bn, 0.0);
    }

    #[test]
    fn test_fallback_uses_model_when_gamma_missing() {
        let rows = [contract(
            4000.0,
            OptionQuote::without_gamma(0.20, 1000.0),
            OptionQuote::default(),
        )];
        let meta = metadata(4000.0);

        let report = ExposureCalculator::default().compute(&meta, &rows).unwrap();

        let t = year_fraction(meta.snapshot_date, rows[0].expiration);
        let expected = black_scholes_gamma_exposure(4000.0, 4000.0, 0.20, t, 0.0, 0.0, 1000.0);
        assert!(expected > 0.0);
        assert!(approx_eq(report.rows[0].call_gex, expected, 1e-6));
        assert_eq!(report.rows[0].call_origin, GammaOrigin::Model);
        assert_eq!(report.model_fallbacks, 1);
    }

    #[test]
    fn test_fallback_keeps_published_zero_gamma() {
        let rows = [contract(
            4000.0,
            OptionQuote::new(0.20, 0.0, 1000.0),
            OptionQuote::new(0.20, 0.0, 1000.0),
        )];

        let report = ExposureCalculator::default()
            .compute(&metadata(4000.0), &rows)
            .unwrap();

        let row = report.rows[0];
        assert_eq!(row.call_gex, 0.0);
        assert_eq!(row.put_gex, 0.0);
        assert_eq!(row.call_origin, GammaOrigin::Supplied);
        assert_eq!(report.model_fallbacks, 0);
    }

    #[test]
    fn test_fallback_replaces_nan_gamma() {
        let rows = [contract(
            4000.0,
            OptionQuote::new(0.20, f64::NAN, 1000.0),
            OptionQuote::default(),
        )];
        let meta = metadata(4000.0);

        let report = ExposureCalculator::default().compute(&meta, &rows).unwrap();

        let t = year_fraction(meta.snapshot_date, rows[0].expiration);
        let expected = black_scholes_gamma_exposure(4000.0, 4000.0, 0.20, t, 0.0, 0.0, 1000.0);
        let row = report.rows[0];
        assert!(row.call_gex.is_finite());
        assert!(approx_eq(row.call_gex, expected, 1e-6));
        assert_eq!(row.call_origin, GammaOrigin::Model);
        assert_eq!(report.model_fallbacks, 1);
    }

    #[test]
    fn test_fallback_skips_sides_without_open_interest() {
        let rows = [contract(
            4000.0,
            OptionQuote::without_gamma(0.20, 0.0),
            OptionQuote::without_gamma(0.20, 0.0),
        )];

        let report = ExposureCalculator::default()
            .compute(&metadata(4000.0), &rows)
            .unwrap();

        assert_eq!(report.model_fallbacks, 0);
        assert_eq!(report.rows[0].total_gamma_bn, 0.0);
    }

    #[test]
    fn test_supplied_mode_ignores_model() {
        let rows = [contract(
            4000.0,
            OptionQuote::without_gamma(0.20, 1000.0),
            OptionQuote::default(),
        )];

        let report = supplied_only().compute(&metadata(4000.0), &rows).unwrap();

        assert_eq!(report.rows[0].call_gex, 0.0);
        assert_eq!(report.model_fallbacks, 0);
    }

    #[test]
    fn test_model_mode_overrides_supplied_gamma() {
        let exposure = ExposureConfig {
            gamma_source: GammaSource::Model,
            ..ExposureConfig::default()
        };
        let calculator = ExposureCalculator::new(&PricingConfig::default(), &exposure);
        let rows = [contract(
            4000.0,
            OptionQuote::new(0.20, 0.5, 10.0),
            OptionQuote::new(0.20, 0.5, 10.0),
        )];

        let report = calculator.compute(&metadata(4000.0), &rows).unwrap();

        let row = report.rows[0];
        assert_eq!(row.model_sides(), 2);
        // Same IV, strike and expiry on both sides: exposures cancel.
        assert!(approx_eq(row.call_gex + row.put_gex, 0.0, 1e-6));
        assert!(row.call_gex < 1e9);
    }

    #[test]
    fn test_nan_propagates_in_supplied_mode() {
        let rows = [contract(
            4000.0,
            OptionQuote::new(0.0, f64::NAN, 10.0),
            OptionQuote::default(),
        )];

        let report = supplied_only().compute(&metadata(4000.0), &rows).unwrap();

        assert!(report.rows[0].call_gex.is_nan());
        assert!(report.total_gamma_bn.is_nan());
    }

    #[test]
    fn test_aggregates_across_expirations() {
        let mut later = contract(
            4000.0,
            OptionQuote::new(0.0, 0.001, 100.0),
            OptionQuote::default(),
        );
        later.expiration = expiry(30);
        let rows = [
            contract(4000.0, OptionQuote::new(0.0, 0.002, 100.0), OptionQuote::default()),
            later,
            contract(4050.0, OptionQuote::new(0.0, 0.001, 100.0), OptionQuote::default()),
        ];

        let report = supplied_only().compute(&metadata(4000.0), &rows).unwrap();

        assert_eq!(report.series.len(), 2);
        let atm = report
            .series
            .get(&StrikeKey::new(4000.0, 2).unwrap())
            .unwrap();
        assert_eq!(atm.contracts, 2);
        assert!(approx_eq(
            atm.call_gex,
            report.rows[0].call_gex + report.rows[1].call_gex,
            1e-6
        ));
        assert!(approx_eq(
            report.series.total_gamma_bn(),
            report.total_gamma_bn,
            1e-12
        ));
    }

    #[test]
    fn test_sub_cent_strikes_share_a_key() {
        let quote = OptionQuote::new(0.0, 0.001, 10.0);
        let rows = [
            contract(4000.001, quote, OptionQuote::default()),
            contract(4000.004, quote, OptionQuote::default()),
            contract(4000.0, quote, OptionQuote::default()),
            contract(4000.01, quote, OptionQuote::default()),
        ];

        let report = supplied_only().compute(&metadata(4000.0), &rows).unwrap();

        // Keys round to cents: the first three rows land on 4000.00.
        assert_eq!(report.series.len(), 2);
        let cent = report
            .series
            .get(&StrikeKey::new(4000.0, 2).unwrap())
            .unwrap();
        assert_eq!(cent.contracts, 3);
        let next = report
            .series
            .get(&StrikeKey::new(4000.01, 2).unwrap())
            .unwrap();
        assert_eq!(next.contracts, 1);
    }

    #[test]
    fn test_strike_window_independent_of_strikes() {
        let rows = [contract(
            1000.0,
            OptionQuote::new(0.0, 0.001, 1.0),
            OptionQuote::default(),
        )];

        let report = ExposureCalculator::default()
            .compute(&metadata(4000.0), &rows)
            .unwrap();

        assert!(approx_eq(report.strike_window.low, 3400.0, 1e-9));
        assert!(approx_eq(report.strike_window.high, 4600.0, 1e-9));
        // Out-of-window strikes still count.
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.windowed().count(), 0);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let rows: Vec<ContractRow> = (0..200_i32)
            .map(|i| {
                let strike = 3500.0 + f64::from(i % 40) * 25.0;
                contract(
                    strike,
                    OptionQuote::new(0.2, 0.0001 * f64::from(i % 7), f64::from(i * 3)),
                    OptionQuote::new(0.2, 0.0002 * f64::from(i % 5), f64::from(i * 2)),
                )
            })
            .collect();
        let sequential = ExposureCalculator::new(
            &PricingConfig::default(),
            &ExposureConfig {
                parallel: false,
                ..ExposureConfig::default()
            },
        );

        let a = ExposureCalculator::default()
            .compute(&metadata(4000.0), &rows)
            .unwrap();
        let b = sequential.compute(&metadata(4000.0), &rows).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_spot_rejected() {
        let err = ExposureCalculator::default()
            .compute(&metadata(0.0), &[])
            .unwrap_err();
        assert!(matches!(err, ExposureError::InvalidSpot(_)));
    }

    #[test]
    fn test_empty_rows() {
        let report = ExposureCalculator::default()
            .compute(&metadata(4000.0), &[])
            .unwrap();
        assert!(report.series.is_empty());
        assert_eq!(report.total_gamma_bn, 0.0);
    }
}
