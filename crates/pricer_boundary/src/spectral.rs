//! Spectral (Chebyshev) representation of an exercise boundary.
//!
//! Discrete boundary samples are noisy and only defined on the time
//! grid; Greeks and the premium integral need a smooth, differentiable
//! function of arbitrary time-to-expiry. The representation applies a
//! conditioning transform chain before fitting:
//!
//! ```text
//! ξ = √(τ/τmax)          concentrates resolution near expiry
//! B̃ = B / X              X = K·min(1, r/q) where meaningful, else K
//! G = ln(B̃)
//! H = G²                  variance stabilisation
//! ```
//!
//! H(ξ) is smooth and flat near ξ = 0 where the raw boundary has a
//! square-root cusp, which is what makes a low-degree Chebyshev fit
//! accurate. A profile sits entirely on one side of X: the classic
//! single put boundary below it, both edges of the negative-rate band
//! above it. The side is detected at fit time and evaluation inverts
//! the chain as `B = X·exp(±√H)` accordingly.

use crate::error::PricingError;
use pricer_core::math::chebyshev::ChebyshevInterpolant;

/// Floor applied to B/X before taking logs.
const RATIO_FLOOR: f64 = 1e-10;

/// Normalisation scale `X = K·min(1, r/q)`.
///
/// This is the level where `rK - qS` changes sign, i.e. the at-expiry
/// limit of the boundary the transform is conditioning. Falls back to
/// the strike when the ratio is meaningless (zero or opposite-sign
/// dividend yield).
pub fn boundary_scale(strike: f64, rate: f64, dividend_yield: f64) -> f64 {
    if dividend_yield != 0.0 {
        let ratio = rate / dividend_yield;
        if ratio > 0.0 {
            return strike * ratio.min(1.0);
        }
    }
    strike
}

/// Immutable spectral encoding of one boundary profile.
///
/// Built from a finalized sample set plus the instantiating market
/// parameters; owns its coefficient vector exclusively and never
/// mutates after construction.
///
/// # Examples
///
/// ```
/// use pricer_boundary::spectral::BoundaryFunction;
/// use pricer_core::math::chebyshev::ChebyshevInterpolant;
///
/// // A synthetic boundary profile sampled on the collocation grid.
/// let maturity = 1.0;
/// let taus: Vec<f64> = ChebyshevInterpolant::nodes(16, 0.0, 1.0)
///     .iter()
///     .map(|xi| maturity * xi * xi)
///     .collect();
/// let values: Vec<f64> = taus.iter().map(|t| 40.0 * (-0.3 * t.sqrt()).exp()).collect();
///
/// let boundary = BoundaryFunction::from_samples(&taus, &values, 40.0, 0.06, 0.02).unwrap();
/// let b = boundary.evaluate(0.5).unwrap();
/// assert!((b - 40.0 * (-0.3 * 0.5f64.sqrt()).exp()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryFunction {
    /// Chebyshev fit of H(ξ) over ξ ∈ [0, 1].
    transform: ChebyshevInterpolant,
    /// Normalisation scale X.
    scale: f64,
    /// +1 when the profile sits above X, -1 below.
    sign: f64,
    /// Largest time-to-expiry covered by the fit.
    maturity: f64,
}

impl BoundaryFunction {
    /// Build the spectral encoding from boundary samples.
    ///
    /// # Arguments
    ///
    /// * `taus` - Sample times-to-expiry; must be the collocation grid
    ///   `τ_j = τmax·ξ_j²` with `ξ_j` the Chebyshev-Gauss-Lobatto nodes
    ///   of `[0, 1]` in their native (descending) order
    /// * `values` - Boundary levels at `taus`, all positive
    /// * `strike` - Strike of the instantiating request
    /// * `rate` - Risk-free rate of the instantiating request
    /// * `dividend_yield` - Dividend yield of the instantiating request
    ///
    /// # Returns
    ///
    /// * `Err(PricingError::InvalidParameters)` - mismatched lengths,
    ///   empty input, non-positive values, or an off-grid `taus`
    pub fn from_samples(
        taus: &[f64],
        values: &[f64],
        strike: f64,
        rate: f64,
        dividend_yield: f64,
    ) -> Result<Self, PricingError> {
        if taus.len() != values.len() || taus.len() < 2 {
            return Err(PricingError::InvalidParameters(format!(
                "boundary sample mismatch: {} times vs {} values",
                taus.len(),
                values.len()
            )));
        }
        let maturity = taus[0];
        if !(maturity.is_finite() && maturity > 0.0) {
            return Err(PricingError::InvalidParameters(
                "first sample must carry the largest time-to-expiry".to_string(),
            ));
        }

        // The fit is only valid on the CGL grid in ξ-space.
        let n = taus.len() - 1;
        let nodes = ChebyshevInterpolant::nodes(n, 0.0, 1.0);
        for (j, (&tau, &xi)) in taus.iter().zip(nodes.iter()).enumerate() {
            if (tau - maturity * xi * xi).abs() > 1e-9 * maturity.max(1.0) {
                return Err(PricingError::InvalidParameters(format!(
                    "sample {} is off the collocation grid",
                    j
                )));
            }
        }

        let scale = boundary_scale(strike, rate, dividend_yield);
        let mut logs = Vec::with_capacity(values.len());
        for &b in values {
            if !b.is_finite() || b <= 0.0 {
                return Err(PricingError::InvalidParameters(format!(
                    "boundary value must be positive, got {}",
                    b
                )));
            }
            logs.push((b / scale).max(RATIO_FLOOR).ln());
        }

        // The profile lives on one side of X; round-off can push single
        // samples across, so the side is taken from the aggregate and
        // strays are flattened onto X.
        let sign = if logs.iter().sum::<f64>() >= 0.0 { 1.0 } else { -1.0 };
        let transformed: Vec<f64> = logs
            .iter()
            .map(|&g| {
                let g_eff = if sign * g < 0.0 { 0.0 } else { g };
                g_eff * g_eff
            })
            .collect();

        let transform = ChebyshevInterpolant::fit(&transformed, 0.0, 1.0)?;
        Ok(Self {
            transform,
            scale,
            sign,
            maturity,
        })
    }

    /// Evaluate the boundary at time-to-expiry `tau ∈ [0, maturity]`.
    pub fn evaluate(&self, tau: f64) -> Result<f64, PricingError> {
        let xi = self.to_xi(tau)?;
        let h = self.transform.evaluate(xi)?.max(0.0);
        Ok(self.scale * (self.sign * h.sqrt()).exp())
    }

    /// Boundary slope dB/dτ at `tau ∈ [0, maturity]`.
    ///
    /// Analytic through the transform chain away from expiry. The raw
    /// boundary has a square-root cusp at τ = 0, where the chain
    /// derivative is an ∞·0 product; near that point a one-sided
    /// difference of [`evaluate`] is returned instead.
    ///
    /// [`evaluate`]: BoundaryFunction::evaluate
    pub fn derivative(&self, tau: f64) -> Result<f64, PricingError> {
        let xi = self.to_xi(tau)?;
        let h = self.transform.evaluate(xi)?.max(0.0);

        let near_cusp = xi < 1e-4 || h < 1e-12;
        if near_cusp {
            let step = 1e-6 * self.maturity;
            let lo = self.evaluate(tau)?;
            let hi = self.evaluate((tau + step).min(self.maturity))?;
            return Ok((hi - lo) / step);
        }

        // B = X·exp(s·√H(ξ)), ξ = √(τ/τmax):
        // dB/dτ = B · s·H'(ξ)/(2√H) · 1/(2·τmax·ξ)
        let b = self.scale * (self.sign * h.sqrt()).exp();
        let h_prime = self.transform.derivative(xi)?;
        Ok(b * (self.sign * h_prime / (2.0 * h.sqrt())) / (2.0 * self.maturity * xi))
    }

    /// Normalisation scale X of this boundary.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Largest time-to-expiry covered by the fit.
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Estimated geometric decay rate of the Chebyshev tail.
    ///
    /// Diagnostic only; forwarded from the underlying fit.
    pub fn convergence_rate(&self) -> Option<f64> {
        self.transform.convergence_rate()
    }

    fn to_xi(&self, tau: f64) -> Result<f64, PricingError> {
        if !tau.is_finite() || tau < -1e-12 || tau > self.maturity * (1.0 + 1e-9) {
            return Err(PricingError::InvalidParameters(format!(
                "time-to-expiry {} outside [0, {}]",
                tau, self.maturity
            )));
        }
        Ok((tau.max(0.0) / self.maturity).sqrt().clamp(0.0, 1.0))
    }
}
