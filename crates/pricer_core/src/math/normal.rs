//! Standard normal distribution functions.
//!
//! The cumulative distribution is evaluated through `erfc` from statrs
//! rather than a polynomial approximation: boundary pricing evaluates the
//! CDF at arguments out to ±8 where the classic Abramowitz-Stegun
//! polynomial (~1e-7 absolute error) is not accurate enough. The erfc
//! route is good to better than 1e-14 over the whole range.

use statrs::function::erf::erfc;

/// 1/√(2π)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal probability density function.
///
/// # Examples
/// ```
/// use pricer_core::math::normal::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.3989422804014327).abs() < 1e-16);
/// ```
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution function.
///
/// Accurate to better than 1e-14 for |x| ≤ 8, including the deep tails
/// needed by boundary-evaluation arguments.
///
/// # Examples
/// ```
/// use pricer_core::math::normal::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!((norm_cdf(1.96) - 0.9750021048517795).abs() < 1e-12);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * std::f64::consts::FRAC_1_SQRT_2)
}
