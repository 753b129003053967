//! Greeks by bump-and-reprice.
//!
//! Every sensitivity is a symmetric finite difference of the whole
//! pricing pipeline; each bump is an independent pricing call sharing
//! no mutable state, so the sweep is embarrassingly parallel and runs
//! over a rayon thread pool.

use crate::engine::AmericanOptionEngine;
use pricer_boundary::error::PricingError;
use pricer_boundary::params::MarketParameters;
use rayon::prelude::*;

/// First- and second-order price sensitivities.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂σ.
    pub vega: f64,
    /// ∂V/∂t in calendar time (value decay per year).
    pub theta: f64,
    /// ∂V/∂r.
    pub rho: f64,
}

/// Bump sizes for the finite-difference Greeks.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `spot_bump` | 1e-3 | Relative spot bump |
/// | `vol_bump` | 1e-4 | Absolute volatility bump |
/// | `rate_bump` | 1e-4 | Absolute rate bump (1bp) |
/// | `time_bump` | 1/365 | Maturity bump in years |
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreeksConfig {
    /// Relative spot bump for delta and gamma.
    pub spot_bump: f64,
    /// Absolute volatility bump for vega.
    pub vol_bump: f64,
    /// Absolute rate bump for rho.
    pub rate_bump: f64,
    /// Maturity bump for theta, in years.
    pub time_bump: f64,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            spot_bump: 1e-3,
            vol_bump: 1e-4,
            rate_bump: 1e-4,
            time_bump: 1.0 / 365.0,
        }
    }
}

impl GreeksConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative spot bump.
    pub fn with_spot_bump(mut self, spot_bump: f64) -> Self {
        self.spot_bump = spot_bump;
        self
    }

    /// Sets the absolute volatility bump.
    pub fn with_vol_bump(mut self, vol_bump: f64) -> Self {
        self.vol_bump = vol_bump;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PricingError> {
        for (name, value) in [
            ("spot_bump", self.spot_bump),
            ("vol_bump", self.vol_bump),
            ("rate_bump", self.rate_bump),
            ("time_bump", self.time_bump),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(PricingError::InvalidParameters(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Compute Greeks by symmetric bump-and-reprice.
///
/// Nine pricing calls (base plus eight bumps) run in parallel. Bumped
/// parameters are rebuilt through the validating constructor; a bump
/// that leaves the supported domain falls back to a one-sided
/// difference on the valid side, and errors only when neither side is
/// usable.
///
/// # Examples
///
/// ```no_run
/// use pricer_boundary::{MarketParameters, OptionSide};
/// use pricer_pricing::engine::AmericanOptionEngine;
/// use pricer_pricing::greeks::{compute_greeks, GreeksConfig};
///
/// let engine = AmericanOptionEngine::with_defaults();
/// let params =
///     MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
/// let greeks = compute_greeks(&engine, &params, &GreeksConfig::default()).unwrap();
/// assert!(greeks.delta < 0.0); // put delta
/// ```
pub fn compute_greeks(
    engine: &AmericanOptionEngine,
    params: &MarketParameters,
    config: &GreeksConfig,
) -> Result<Greeks, PricingError> {
    config.validate()?;

    let ds = config.spot_bump * params.spot;
    let dv = config.vol_bump;
    let dr = config.rate_bump;
    let dt = config.time_bump;

    // Scenario parameter sets; invalid bumps are recorded as None and
    // resolved into one-sided differences afterwards.
    let scenarios: Vec<Option<MarketParameters>> = vec![
        Some(*params),
        params.with_spot(params.spot + ds).ok(),
        params.with_spot(params.spot - ds).ok(),
        params.with_volatility(params.volatility + dv).ok(),
        params.with_volatility(params.volatility - dv).ok(),
        params.with_rate(params.rate + dr).ok(),
        params.with_rate(params.rate - dr).ok(),
        params.with_maturity(params.maturity + dt).ok(),
        params.with_maturity(params.maturity - dt).ok(),
    ];

    let prices: Vec<Option<f64>> = scenarios
        .par_iter()
        .map(|scenario| {
            scenario
                .as_ref()
                .map(|p| engine.price(p).map(|r| r.price))
                .transpose()
        })
        .collect::<Result<Vec<Option<f64>>, PricingError>>()?;

    let base = prices[0].ok_or_else(|| {
        PricingError::InvalidParameters("base scenario failed to price".to_string())
    })?;

    let symmetric = |up: Option<f64>, down: Option<f64>, h: f64, name: &str| match (up, down) {
        (Some(u), Some(d)) => Ok((u - d) / (2.0 * h)),
        (Some(u), None) => Ok((u - base) / h),
        (None, Some(d)) => Ok((base - d) / h),
        (None, None) => Err(PricingError::InvalidParameters(format!(
            "no valid bump for {}",
            name
        ))),
    };

    let delta = symmetric(prices[1], prices[2], ds, "delta")?;
    let gamma = match (prices[1], prices[2]) {
        (Some(u), Some(d)) => (u - 2.0 * base + d) / (ds * ds),
        _ => {
            return Err(PricingError::InvalidParameters(
                "gamma needs both spot bumps".to_string(),
            ))
        }
    };
    let vega = symmetric(prices[3], prices[4], dv, "vega")?;
    let rho = symmetric(prices[5], prices[6], dr, "rho")?;
    // Calendar theta: value decay as maturity shortens.
    let theta = -symmetric(prices[7], prices[8], dt, "theta")?;

    Ok(Greeks {
        delta,
        gamma,
        vega,
        theta,
        rho,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_boundary::params::OptionSide;

    fn benchmark_put() -> MarketParameters {
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(GreeksConfig::default().validate().is_ok());
        let bad = GreeksConfig::default().with_vol_bump(0.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_put_greeks_signs() {
        let engine = AmericanOptionEngine::with_defaults();
        let greeks =
            compute_greeks(&engine, &benchmark_put(), &GreeksConfig::default()).unwrap();

        assert!(greeks.delta < 0.0, "put delta = {}", greeks.delta);
        assert!(greeks.delta > -1.0);
        assert!(greeks.gamma > 0.0, "gamma = {}", greeks.gamma);
        assert!(greeks.vega > 0.0, "vega = {}", greeks.vega);
        assert!(greeks.theta < 0.0, "theta = {}", greeks.theta);
        assert!(greeks.rho < 0.0, "put rho = {}", greeks.rho);
    }

    #[test]
    fn test_greeks_deterministic_across_parallel_runs() {
        let engine = AmericanOptionEngine::with_defaults();
        let params = benchmark_put();
        let config = GreeksConfig::default();
        let a = compute_greeks(&engine, &params, &config).unwrap();
        let b = compute_greeks(&engine, &params, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_maturity_bump_near_floor_uses_one_sided() {
        // Maturity so short that the downward time bump leaves the
        // validated domain; theta must still come back finite.
        let params =
            MarketParameters::new(36.0, 40.0, 2e-3, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
        let engine = AmericanOptionEngine::with_defaults();
        let greeks = compute_greeks(&engine, &params, &GreeksConfig::default()).unwrap();
        assert!(greeks.theta.is_finite());
    }
}
