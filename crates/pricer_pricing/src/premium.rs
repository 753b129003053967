//! Early-exercise premium quadrature.
//!
//! With the boundary functions known, the American price is the
//! European value plus one integral over exercise time: the difference
//! of rate- and dividend-weighted normal-CDF terms evaluated at the
//! upper vs. lower boundary (a single evaluation when only one
//! boundary exists). Integration uses the core quadrature provider:
//! adaptive Gauss-Lobatto with an adaptive-Simpson fallback on
//! non-convergence.

use pricer_boundary::black_scholes::d1_d2;
use pricer_boundary::config::EngineConfig;
use pricer_boundary::error::PricingError;
use pricer_boundary::params::MarketParameters;
use pricer_boundary::spectral::BoundaryFunction;
use pricer_core::math::normal::norm_cdf;
use pricer_core::math::quadrature::integrate;

/// Exercise-region weight at exercise horizon `w` for spot `s`.
///
/// `Φ(-d₂(s/U, w)) - Φ(-d₂(s/L, w))` and the `d₁` companion: the
/// risk-neutral probability of sitting inside the band `[L, U]` at `w`,
/// and its stock-measure analogue.
fn band_weights(
    s: f64,
    upper_level: f64,
    lower_level: Option<f64>,
    params: &MarketParameters,
    w: f64,
) -> (f64, f64) {
    let w = w.max(1e-12);
    let (d1_u, d2_u) = d1_d2(
        s,
        upper_level,
        params.rate,
        params.dividend_yield,
        params.volatility,
        w,
    );
    let mut weight_q = norm_cdf(-d1_u);
    let mut weight_r = norm_cdf(-d2_u);
    if let Some(l) = lower_level {
        let (d1_l, d2_l) = d1_d2(
            s,
            l,
            params.rate,
            params.dividend_yield,
            params.volatility,
            w,
        );
        weight_q -= norm_cdf(-d1_l);
        weight_r -= norm_cdf(-d2_l);
    }
    (weight_r, weight_q)
}

/// Early-exercise premium for a put with the given boundary functions.
///
/// Integrates
///
/// ```text
/// ∫ [ rK·e^{-rw}·P_band(d₂) - qS·e^{-qw}·P_band(d₁) ] dw
/// ```
///
/// over exercise horizons `w` where the band is open, i.e.
/// `w ∈ [T - τ*, T]`; `crossing_time = maturity` integrates the whole
/// range. Collapsed boundary segments contribute zero by construction
/// (upper = lower makes both weights cancel), so the restriction is a
/// cost saving rather than a correctness requirement.
///
/// # Arguments
///
/// * `params` - Put-oriented market parameters
/// * `upper` - Upper boundary function
/// * `lower` - Lower boundary function in the double-boundary regime
/// * `crossing_time` - Merge time-to-expiry τ* of the band
/// * `config` - Engine tunables (premium tolerance)
///
/// # Returns
///
/// * `Err(PricingError::Quadrature)` - both quadrature stages failed
///
/// Tiny negative values from quadrature round-off are floored at zero.
pub fn early_exercise_premium(
    params: &MarketParameters,
    upper: &BoundaryFunction,
    lower: Option<&BoundaryFunction>,
    crossing_time: f64,
    config: &EngineConfig,
) -> Result<f64, PricingError> {
    let maturity = params.maturity;
    let start = (maturity - crossing_time).max(0.0);
    if start >= maturity {
        return Ok(0.0);
    }

    let integrand = |w: f64| {
        let tau_boundary = (maturity - w).max(0.0);
        let u = match upper.evaluate(tau_boundary) {
            Ok(v) => v,
            Err(_) => return f64::NAN,
        };
        let l = match lower {
            Some(lower) => match lower.evaluate(tau_boundary) {
                Ok(v) => Some(v),
                Err(_) => return f64::NAN,
            },
            None => None,
        };
        let (weight_r, weight_q) = band_weights(params.spot, u, l, params, w);
        params.rate * params.strike * (-params.rate * w).exp() * weight_r
            - params.dividend_yield * params.spot * (-params.dividend_yield * w).exp() * weight_q
    };

    let premium = integrate(integrand, start, maturity, config.premium_tolerance)?;
    Ok(premium.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_boundary::params::OptionSide;
    use pricer_boundary::{approximate_boundaries, refine_boundaries};
    use pricer_core::math::chebyshev::ChebyshevInterpolant;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn boundary_from_profile<F: Fn(f64) -> f64>(
        f: F,
        params: &MarketParameters,
    ) -> BoundaryFunction {
        let taus: Vec<f64> = ChebyshevInterpolant::nodes(24, 0.0, 1.0)
            .iter()
            .map(|xi| params.maturity * xi * xi)
            .collect();
        let values: Vec<f64> = taus.iter().map(|&t| f(t)).collect();
        BoundaryFunction::from_samples(
            &taus,
            &values,
            params.strike,
            params.rate,
            params.dividend_yield,
        )
        .unwrap()
    }

    #[test]
    fn test_premium_positive_for_itm_single_boundary() {
        let params =
            MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
        let seeds = approximate_boundaries(&params, &config()).unwrap();
        let refined = refine_boundaries(&params, &seeds, &config()).unwrap();
        let upper = BoundaryFunction::from_samples(
            &refined.upper.taus,
            &refined.upper.values,
            params.strike,
            params.rate,
            params.dividend_yield,
        )
        .unwrap();

        let premium =
            early_exercise_premium(&params, &upper, None, params.maturity, &config()).unwrap();
        assert!(premium > 0.0, "premium = {}", premium);
        assert!(premium < 2.0, "premium implausibly large: {}", premium);
    }

    #[test]
    fn test_premium_vanishes_far_otm() {
        // Deep out-of-the-money put: spot far above every boundary level.
        let params =
            MarketParameters::new(400.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
        let upper = boundary_from_profile(|t| 35.0 * (-0.2 * t.sqrt()).exp(), &params);
        let premium =
            early_exercise_premium(&params, &upper, None, params.maturity, &config()).unwrap();
        assert!(premium < 1e-4, "premium = {}", premium);
    }

    #[test]
    fn test_collapsed_band_contributes_nothing() {
        // Upper and lower identical: every band weight cancels.
        let params =
            MarketParameters::new(100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put).unwrap();
        let profile = |t: f64| 70.0 * (-0.05 * t).exp();
        let upper = boundary_from_profile(profile, &params);
        let lower = boundary_from_profile(profile, &params);
        let premium =
            early_exercise_premium(&params, &upper, Some(&lower), params.maturity, &config())
                .unwrap();
        assert!(premium.abs() < 1e-10, "premium = {}", premium);
    }

    #[test]
    fn test_zero_crossing_time_short_circuits() {
        let params =
            MarketParameters::new(100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put).unwrap();
        let upper = boundary_from_profile(|t| 90.0 * (-0.1 * t).exp(), &params);
        let premium = early_exercise_premium(&params, &upper, None, 0.0, &config()).unwrap();
        assert_eq!(premium, 0.0);
    }

    #[test]
    fn test_premium_scales_with_moneyness() {
        let config = config();
        let deep =
            MarketParameters::new(25.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
        let shallow =
            MarketParameters::new(39.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
        let seeds = approximate_boundaries(&deep, &config).unwrap();
        let refined = refine_boundaries(&deep, &seeds, &config).unwrap();
        let upper = BoundaryFunction::from_samples(
            &refined.upper.taus,
            &refined.upper.values,
            deep.strike,
            deep.rate,
            deep.dividend_yield,
        )
        .unwrap();

        let premium_deep =
            early_exercise_premium(&deep, &upper, None, deep.maturity, &config).unwrap();
        let premium_shallow =
            early_exercise_premium(&shallow, &upper, None, shallow.maturity, &config).unwrap();
        assert!(
            premium_deep > premium_shallow,
            "deep {} should exceed shallow {}",
            premium_deep,
            premium_shallow
        );
    }
}
