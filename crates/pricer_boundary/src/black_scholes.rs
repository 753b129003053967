//! Closed-form European Black-Scholes kernel.
//!
//! Leaf math utility consumed by both approximation stages: the QD+
//! characteristic equation needs the European value and theta at
//! candidate boundary levels, and the premium integral adds its result
//! on top of the European price.
//!
//! All functions take explicit scalar arguments rather than a parameter
//! struct because the boundary solvers call them with shifted spots and
//! strikes at every quadrature node.

use crate::params::OptionSide;
use pricer_core::math::normal::{norm_cdf, norm_pdf};

#[inline]
fn intrinsic(side: OptionSide, spot: f64, strike: f64) -> f64 {
    match side {
        OptionSide::Call => (spot - strike).max(0.0),
        OptionSide::Put => (strike - spot).max(0.0),
    }
}

/// The Black-Scholes `d1` and `d2` arguments.
///
/// Requires `vol > 0` and `tau > 0`; the pricing functions handle those
/// edge cases before calling this.
#[inline]
pub fn d1_d2(spot: f64, strike: f64, rate: f64, dividend_yield: f64, vol: f64, tau: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * tau.sqrt();
    let d1 = ((spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * tau) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// European option price.
///
/// Edge cases: `tau ≤ 0` returns intrinsic value; `vol ≤ 0` returns the
/// discounted forward parity value.
///
/// # Examples
/// ```
/// use pricer_boundary::black_scholes::bs_price;
/// use pricer_boundary::params::OptionSide;
///
/// let put = bs_price(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, 0.20, 1.0);
/// assert!(put > 3.0 && put < 6.0);
/// ```
pub fn bs_price(
    side: OptionSide,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    tau: f64,
) -> f64 {
    if tau <= 0.0 {
        return intrinsic(side, spot, strike);
    }
    let df_r = (-rate * tau).exp();
    let df_q = (-dividend_yield * tau).exp();
    if vol <= 0.0 {
        return match side {
            OptionSide::Call => (spot * df_q - strike * df_r).max(0.0),
            OptionSide::Put => (strike * df_r - spot * df_q).max(0.0),
        };
    }
    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, tau);
    match side {
        OptionSide::Call => spot * df_q * norm_cdf(d1) - strike * df_r * norm_cdf(d2),
        OptionSide::Put => strike * df_r * norm_cdf(-d2) - spot * df_q * norm_cdf(-d1),
    }
}

/// European delta (∂V/∂S).
pub fn bs_delta(
    side: OptionSide,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    tau: f64,
) -> f64 {
    if tau <= 0.0 || vol <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, tau);
    let df_q = (-dividend_yield * tau).exp();
    match side {
        OptionSide::Call => df_q * norm_cdf(d1),
        OptionSide::Put => df_q * (norm_cdf(d1) - 1.0),
    }
}

/// European gamma (∂²V/∂S²), side-independent.
pub fn bs_gamma(spot: f64, strike: f64, rate: f64, dividend_yield: f64, vol: f64, tau: f64) -> f64 {
    if tau <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, tau);
    let df_q = (-dividend_yield * tau).exp();
    df_q * norm_pdf(d1) / (spot * vol * tau.sqrt())
}

/// European vega (∂V/∂σ), side-independent.
pub fn bs_vega(spot: f64, strike: f64, rate: f64, dividend_yield: f64, vol: f64, tau: f64) -> f64 {
    if tau <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, tau);
    let df_q = (-dividend_yield * tau).exp();
    spot * df_q * norm_pdf(d1) * tau.sqrt()
}

/// European theta (∂V/∂t, calendar time).
pub fn bs_theta(
    side: OptionSide,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    tau: f64,
) -> f64 {
    if tau <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, tau);
    let sqrt_t = tau.sqrt();
    let df_q = (-dividend_yield * tau).exp();
    let df_r = (-rate * tau).exp();
    match side {
        OptionSide::Call => {
            -spot * df_q * norm_pdf(d1) * vol / (2.0 * sqrt_t)
                + dividend_yield * spot * df_q * norm_cdf(d1)
                - rate * strike * df_r * norm_cdf(d2)
        }
        OptionSide::Put => {
            -spot * df_q * norm_pdf(d1) * vol / (2.0 * sqrt_t)
                - dividend_yield * spot * df_q * norm_cdf(-d1)
                + rate * strike * df_r * norm_cdf(-d2)
        }
    }
}

/// European rho (∂V/∂r).
pub fn bs_rho(
    side: OptionSide,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    tau: f64,
) -> f64 {
    if tau <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (_, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, tau);
    let df_r = (-rate * tau).exp();
    match side {
        OptionSide::Call => strike * tau * df_r * norm_cdf(d2),
        OptionSide::Put => -strike * tau * df_r * norm_cdf(-d2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, q, v, t) = (100.0, 95.0, 0.04, 0.01, 0.3, 1.5);
        let call = bs_price(OptionSide::Call, s, k, r, q, v, t);
        let put = bs_price(OptionSide::Put, s, k, r, q, v, t);
        let forward = s * (-q * t).exp() - k * (-r * t).exp();
        assert_relative_eq!(call - put, forward, epsilon = 1e-10);
    }

    #[test]
    fn test_known_reference_value() {
        // Hull-style reference: S=42, K=40, r=10%, σ=20%, T=0.5, q=0.
        let call = bs_price(OptionSide::Call, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
        assert_relative_eq!(call, 4.759422, epsilon = 1e-5);
        let put = bs_price(OptionSide::Put, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
        assert_relative_eq!(put, 0.808599, epsilon = 1e-5);
    }

    #[test]
    fn test_expired_option_is_intrinsic() {
        assert_eq!(bs_price(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, 0.2, 0.0), 4.0);
        assert_eq!(bs_price(OptionSide::Call, 36.0, 40.0, 0.06, 0.02, 0.2, 0.0), 0.0);
    }

    #[test]
    fn test_zero_volatility_discounted_parity() {
        let put = bs_price(OptionSide::Put, 36.0, 40.0, 0.06, 0.0, 0.0, 1.0);
        assert_relative_eq!(put, (40.0 * (-0.06f64).exp() - 36.0).max(0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_rates_still_price() {
        let put = bs_price(OptionSide::Put, 100.0, 100.0, -0.01, -0.02, 0.10, 2.0);
        assert!(put.is_finite() && put > 0.0);
    }

    #[test]
    fn test_delta_bounds() {
        let call_delta = bs_delta(OptionSide::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
        let put_delta = bs_delta(OptionSide::Put, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
        assert!((0.0..=1.0).contains(&call_delta));
        assert!((-1.0..=0.0).contains(&put_delta));
        assert_relative_eq!(call_delta - put_delta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_matches_finite_difference() {
        let h = 1e-5;
        let f = |s: f64| bs_price(OptionSide::Put, s, 40.0, 0.06, 0.02, 0.2, 1.0);
        let fd = (f(36.0 + h) - f(36.0 - h)) / (2.0 * h);
        let delta = bs_delta(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, 0.2, 1.0);
        assert_relative_eq!(delta, fd, max_relative = 1e-6);
    }

    #[test]
    fn test_gamma_matches_finite_difference() {
        let h = 1e-4;
        let f = |s: f64| bs_price(OptionSide::Put, s, 40.0, 0.06, 0.02, 0.2, 1.0);
        let fd = (f(36.0 + h) - 2.0 * f(36.0) + f(36.0 - h)) / (h * h);
        let gamma = bs_gamma(36.0, 40.0, 0.06, 0.02, 0.2, 1.0);
        assert_relative_eq!(gamma, fd, max_relative = 1e-4);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let h = 1e-6;
        let f = |v: f64| bs_price(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, v, 1.0);
        let fd = (f(0.2 + h) - f(0.2 - h)) / (2.0 * h);
        let vega = bs_vega(36.0, 40.0, 0.06, 0.02, 0.2, 1.0);
        assert_relative_eq!(vega, fd, max_relative = 1e-6);
    }

    #[test]
    fn test_theta_matches_finite_difference() {
        // Theta in calendar time: V(τ - h) ≈ V(τ) + θ·h.
        let h = 1e-6;
        let f = |t: f64| bs_price(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, 0.2, t);
        let fd = (f(1.0 - h) - f(1.0 + h)) / (2.0 * h);
        let theta = bs_theta(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, 0.2, 1.0);
        assert_relative_eq!(theta, fd, max_relative = 1e-5);
    }

    #[test]
    fn test_rho_matches_finite_difference() {
        let h = 1e-6;
        let f = |r: f64| bs_price(OptionSide::Put, 36.0, 40.0, r, 0.02, 0.2, 1.0);
        let fd = (f(0.06 + h) - f(0.06 - h)) / (2.0 * h);
        let rho = bs_rho(OptionSide::Put, 36.0, 40.0, 0.06, 0.02, 0.2, 1.0);
        assert_relative_eq!(rho, fd, max_relative = 1e-6);
    }
}
