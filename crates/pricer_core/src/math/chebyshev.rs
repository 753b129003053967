//! Chebyshev collocation on Chebyshev-Gauss-Lobatto nodes.
//!
//! An interpolant is fitted to function values sampled at the CGL nodes
//! and evaluated with Clenshaw's recurrence. The fit is a discrete
//! cosine transform, so coefficients are exact for polynomials up to the
//! node count and decay geometrically for analytic functions; the decay
//! rate of the coefficient tail doubles as a convergence diagnostic.

use crate::types::InterpolationError;

/// Chebyshev interpolant over an interval `[a, b]`.
///
/// Owns its coefficient vector exclusively; construction consumes the
/// sampled values and the instance is immutable afterwards.
///
/// # Example
///
/// ```
/// use pricer_core::math::chebyshev::ChebyshevInterpolant;
///
/// let nodes = ChebyshevInterpolant::nodes(16, 0.0, 2.0);
/// let samples: Vec<f64> = nodes.iter().map(|&x| x.exp()).collect();
/// let cheb = ChebyshevInterpolant::fit(&samples, 0.0, 2.0).unwrap();
///
/// assert!((cheb.evaluate(1.3).unwrap() - 1.3f64.exp()).abs() < 1e-10);
/// assert!((cheb.derivative(1.3).unwrap() - 1.3f64.exp()).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevInterpolant {
    /// Chebyshev coefficients a_k of Σ a_k T_k(ξ).
    coefficients: Vec<f64>,
    /// Derivative-series coefficients, same basis.
    derivative_coefficients: Vec<f64>,
    /// Interval lower bound.
    a: f64,
    /// Interval upper bound.
    b: f64,
}

impl ChebyshevInterpolant {
    /// Chebyshev-Gauss-Lobatto nodes for an `n`-degree fit over `[a, b]`.
    ///
    /// Returns `n + 1` abscissae `x_j = a + (b-a)(1 + cos(πj/n))/2`,
    /// ordered from `b` down to `a`. Sample the target function at
    /// exactly these points, in this order, before calling [`fit`].
    ///
    /// [`fit`]: ChebyshevInterpolant::fit
    pub fn nodes(n: usize, a: f64, b: f64) -> Vec<f64> {
        assert!(n >= 1, "need at least a linear fit");
        (0..=n)
            .map(|j| {
                let xi = (std::f64::consts::PI * j as f64 / n as f64).cos();
                a + (b - a) * 0.5 * (1.0 + xi)
            })
            .collect()
    }

    /// Fit coefficients to values sampled at the CGL nodes of `[a, b]`.
    ///
    /// # Arguments
    ///
    /// * `values` - Function values at [`nodes`]`(values.len() - 1, a, b)`
    /// * `a` - Interval lower bound
    /// * `b` - Interval upper bound
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::InsufficientData)` - fewer than 2 samples
    /// * `Err(InterpolationError::InvalidInput)` - non-finite samples or
    ///   a degenerate interval
    ///
    /// [`nodes`]: ChebyshevInterpolant::nodes
    pub fn fit(values: &[f64], a: f64, b: f64) -> Result<Self, InterpolationError> {
        if values.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: values.len(),
                need: 2,
            });
        }
        if !(b - a).is_finite() || b <= a {
            return Err(InterpolationError::InvalidInput(format!(
                "degenerate interval [{}, {}]",
                a, b
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(InterpolationError::InvalidInput(
                "non-finite sample value".to_string(),
            ));
        }

        let n = values.len() - 1;
        let nf = n as f64;
        let mut coefficients = vec![0.0; n + 1];
        for (k, coefficient) in coefficients.iter_mut().enumerate() {
            let kf = k as f64;
            // Trapezoidal cosine transform: endpoint terms carry half weight.
            let mut sum = 0.5 * (values[0] + values[n] * (std::f64::consts::PI * kf).cos());
            for (j, &v) in values.iter().enumerate().take(n).skip(1) {
                sum += v * (std::f64::consts::PI * kf * j as f64 / nf).cos();
            }
            let scale = if k == 0 || k == n { 1.0 / nf } else { 2.0 / nf };
            *coefficient = scale * sum;
        }

        let derivative_coefficients = Self::differentiate_series(&coefficients);
        Ok(Self {
            coefficients,
            derivative_coefficients,
            a,
            b,
        })
    }

    /// Evaluate the interpolant at `x ∈ [a, b]`.
    pub fn evaluate(&self, x: f64) -> Result<f64, InterpolationError> {
        let xi = self.to_unit(x)?;
        Ok(clenshaw(&self.coefficients, xi))
    }

    /// Evaluate the derivative d/dx of the interpolant at `x ∈ [a, b]`.
    pub fn derivative(&self, x: f64) -> Result<f64, InterpolationError> {
        let xi = self.to_unit(x)?;
        let scale = 2.0 / (self.b - self.a);
        Ok(scale * clenshaw(&self.derivative_coefficients, xi))
    }

    /// Borrow the fitted coefficient vector.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Estimated geometric decay rate of the coefficient tail.
    ///
    /// Returns the average per-order log10 reduction across the trailing
    /// half of the spectrum, or `None` when the tail is already at
    /// round-off. Diagnostic only; nothing branches on it.
    pub fn convergence_rate(&self) -> Option<f64> {
        let n = self.coefficients.len();
        if n < 6 {
            return None;
        }
        let head = self.coefficients[n / 4].abs().max(f64::MIN_POSITIVE);
        let tail = self.coefficients[n - 1]
            .abs()
            .max(self.coefficients[n - 2].abs());
        if tail < 1e-15 * head.max(1.0) {
            return None;
        }
        let orders = (n - 1 - n / 4) as f64;
        Some((head / tail).log10() / orders)
    }

    fn to_unit(&self, x: f64) -> Result<f64, InterpolationError> {
        let eps = 1e-12 * (self.b - self.a);
        if x < self.a - eps || x > self.b + eps {
            return Err(InterpolationError::OutOfBounds {
                x,
                min: self.a,
                max: self.b,
            });
        }
        let xi = 2.0 * (x - self.a) / (self.b - self.a) - 1.0;
        Ok(xi.clamp(-1.0, 1.0))
    }

    /// Coefficients of the derivative series in the same T_k basis.
    ///
    /// Uses the backward recurrence d_{k-1} = d_{k+1} + 2k a_k with the
    /// customary halving of d_0.
    fn differentiate_series(coefficients: &[f64]) -> Vec<f64> {
        let n = coefficients.len();
        let mut d = vec![0.0; n];
        if n < 2 {
            return d;
        }
        // d has degree n-2; positions n-1.. stay zero.
        let mut kp1 = 0.0; // d_{k+1}
        let mut kp2 = 0.0; // d_{k+2}
        for k in (1..n).rev() {
            let dk = kp2 + 2.0 * k as f64 * coefficients[k];
            d[k - 1] = dk;
            kp2 = kp1;
            kp1 = dk;
        }
        d[0] *= 0.5;
        d
    }
}

/// Clenshaw recurrence for Σ a_k T_k(ξ), ξ ∈ [-1, 1].
fn clenshaw(coefficients: &[f64], xi: f64) -> f64 {
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for &ak in coefficients.iter().skip(1).rev() {
        let b0 = 2.0 * xi * b1 - b2 + ak;
        b2 = b1;
        b1 = b0;
    }
    coefficients[0] + xi * b1 - b2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fit_function<F: Fn(f64) -> f64>(f: F, n: usize, a: f64, b: f64) -> ChebyshevInterpolant {
        let samples: Vec<f64> = ChebyshevInterpolant::nodes(n, a, b)
            .iter()
            .map(|&x| f(x))
            .collect();
        ChebyshevInterpolant::fit(&samples, a, b).unwrap()
    }

    #[test]
    fn test_reproduces_polynomial_exactly() {
        // Degree-3 polynomial is exact with any n >= 3.
        let f = |x: f64| 2.0 - x + 0.5 * x * x * x;
        let cheb = fit_function(f, 8, -1.5, 2.5);
        for &x in &[-1.5, -0.3, 0.0, 1.1, 2.5] {
            assert_relative_eq!(cheb.evaluate(x).unwrap(), f(x), epsilon = 1e-11);
        }
    }

    #[test]
    fn test_interpolates_at_nodes() {
        let nodes = ChebyshevInterpolant::nodes(12, 0.0, 1.0);
        let samples: Vec<f64> = nodes.iter().map(|&x| (3.0 * x).sin()).collect();
        let cheb = ChebyshevInterpolant::fit(&samples, 0.0, 1.0).unwrap();
        for (x, v) in nodes.iter().zip(samples.iter()) {
            assert_relative_eq!(cheb.evaluate(*x).unwrap(), *v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_exponential_accuracy() {
        let cheb = fit_function(|x| x.exp(), 20, 0.0, 2.0);
        let mut x = 0.0;
        while x <= 2.0 {
            assert_relative_eq!(cheb.evaluate(x).unwrap(), x.exp(), max_relative = 1e-12);
            x += 0.07;
        }
    }

    #[test]
    fn test_derivative_accuracy() {
        let cheb = fit_function(|x| (2.0 * x).sin(), 24, -1.0, 1.0);
        for &x in &[-0.9, -0.4, 0.0, 0.3, 0.8] {
            assert_relative_eq!(
                cheb.derivative(x).unwrap(),
                2.0 * (2.0 * x).cos(),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let cheb = fit_function(|x| x, 4, 0.0, 1.0);
        assert!(matches!(
            cheb.evaluate(1.5),
            Err(InterpolationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_insufficient_data() {
        let result = ChebyshevInterpolant::fit(&[1.0], 0.0, 1.0);
        assert!(matches!(
            result,
            Err(InterpolationError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_degenerate_interval() {
        let result = ChebyshevInterpolant::fit(&[1.0, 2.0], 1.0, 1.0);
        assert!(matches!(
            result,
            Err(InterpolationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_convergence_rate_for_analytic_function() {
        // exp is entire, so coefficients decay fast and the estimated
        // rate should be comfortably positive.
        let cheb = fit_function(|x| x.exp(), 16, 0.0, 1.0);
        if let Some(rate) = cheb.convergence_rate() {
            assert!(rate > 0.5);
        }
    }

    #[test]
    fn test_endpoint_evaluation() {
        let cheb = fit_function(|x| x * x, 10, 0.25, 0.75);
        assert_relative_eq!(cheb.evaluate(0.25).unwrap(), 0.0625, epsilon = 1e-10);
        assert_relative_eq!(cheb.evaluate(0.75).unwrap(), 0.5625, epsilon = 1e-10);
    }
}
