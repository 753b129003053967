//! Kim integral-equation refinement of the exercise boundaries.
//!
//! The QD+ stage yields the boundary pair at valuation only; this
//! module solves for the full **time profile** of both boundaries and
//! resolves any crossing. The value-matching condition at a boundary
//! level `x` with time-to-expiry τ rearranges into a fixed point
//!
//! ```text
//! B = K · N(τ, x) / D(τ, x)
//! N = 1 - e^{-rτ}Φ(-d₂(x/K, τ)) - r·Iᵣ(x)
//! D = 1 - e^{-qτ}Φ(-d₁(x/K, τ)) - q·I_q(x)
//! ```
//!
//! where `Iᵣ`, `I_q` integrate rate/dividend-weighted normal-CDF
//! differences of the upper vs. lower boundary over the remaining
//! time. The naive fixed point oscillates for the lower boundary at
//! longer maturities; the **FP-B′** variant updates the lower boundary
//! with the *just-computed* upper values, moves the dividend integral
//! into the numerator scaled by `lower/K`, and drops it from the
//! denominator. The two forms share fixed points (the rearrangement is
//! exact algebra), but the primed denominator has no integral term to
//! feed the oscillation.

use crate::config::EngineConfig;
use crate::error::PricingError;
use crate::params::{MarketParameters, OptionSide};
use crate::qdplus::BoundarySeeds;
use crate::spectral::boundary_scale;
use pricer_core::math::chebyshev::ChebyshevInterpolant;
use pricer_core::math::isotonic::{isotonic_non_decreasing, isotonic_non_increasing};
use pricer_core::math::normal::norm_cdf;
use pricer_core::math::quadrature::trapezoid;
use pricer_core::math::solvers::{BisectionSolver, SolverConfig};
use tracing::debug;

/// Floor for the lower boundary, relative to the strike.
const LOWER_FLOOR: f64 = 1e-8;

/// Denominator guard below which a fixed-point update is skipped and
/// the previous value kept.
const DENOMINATOR_GUARD: f64 = 1e-10;

/// One boundary profile on the collocation grid.
///
/// `taus` holds times-to-expiry in descending order (valuation first,
/// expiry last); `values` the boundary level at each. Snapshots are
/// immutable: each refinement iteration produces a fresh pair and the
/// loop holds only "current" and "previous".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundarySample {
    /// Times-to-expiry, descending from maturity to zero.
    pub taus: Vec<f64>,
    /// Boundary level at each grid time.
    pub values: Vec<f64>,
}

impl BoundarySample {
    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.taus.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.taus.is_empty()
    }
}

/// Outcome of the FP-B′ refinement.
///
/// Budget exhaustion is non-fatal: `converged` is false and `residual`
/// carries the last maximum per-point move so the caller can decide
/// whether the accuracy is acceptable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefinedBoundaries {
    /// Upper boundary profile.
    pub upper: BoundarySample,
    /// Lower boundary profile; absent outside the double-boundary regime.
    pub lower: Option<BoundarySample>,
    /// Time-to-expiry at which the boundaries merge; equals the
    /// maturity when they never cross.
    pub crossing_time: f64,
    /// Fixed-point iterations used.
    pub iterations: usize,
    /// Final maximum per-point move, relative to the strike.
    pub residual: f64,
    /// Whether the residual fell below the configured tolerance.
    pub converged: bool,
}

/// Collocation grid in time-to-expiry: `τ_j = T·ξ_j²` over the
/// Chebyshev-Gauss-Lobatto nodes `ξ_j` of `[0, 1]`, descending.
///
/// The square-root spacing concentrates points near expiry where the
/// boundary moves fastest, and the grid doubles as the spectral-fit
/// abscissae so the refined samples feed the Chebyshev stage directly.
pub fn collocation_taus(degree: usize, maturity: f64) -> Vec<f64> {
    ChebyshevInterpolant::nodes(degree, 0.0, 1.0)
        .iter()
        .map(|xi| maturity * xi * xi)
        .collect()
}

/// Linear interpolation on the descending-τ grid, clamped at the ends.
fn interp(taus: &[f64], values: &[f64], tau: f64) -> f64 {
    let n = taus.len();
    if tau >= taus[0] {
        return values[0];
    }
    if tau <= taus[n - 1] {
        return values[n - 1];
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if taus[mid] >= tau {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let t = (tau - taus[lo]) / (taus[hi] - taus[lo]);
    values[lo] + t * (values[hi] - values[lo])
}

/// `d₁` with the boundary level as effective strike; `w` floored so
/// the `w → 0` limit degrades into the exercise-region indicator.
#[inline]
fn d1(x: f64, b: f64, rate: f64, dividend_yield: f64, vol: f64, w: f64) -> f64 {
    let w = w.max(1e-12);
    let sig_sqrt = vol * w.sqrt();
    ((x / b).ln() + (rate - dividend_yield + 0.5 * vol * vol) * w) / sig_sqrt
}

#[inline]
fn d2(x: f64, b: f64, rate: f64, dividend_yield: f64, vol: f64, w: f64) -> f64 {
    d1(x, b, rate, dividend_yield, vol, w) - vol * w.max(1e-12).sqrt()
}

/// State shared by the per-point updates of one solve.
struct KimContext<'a> {
    params: &'a MarketParameters,
    config: &'a EngineConfig,
    taus: &'a [f64],
}

impl KimContext<'_> {
    /// Rate-discounted integral of the band-probability difference at
    /// level `x`, `∫₀^τ e^{-rw}[Φ(-d₂(x/U(τ-w))) - Φ(-d₂(x/L(τ-w)))] dw`.
    fn integral_r(&self, x: f64, tau: f64, upper: &[f64], lower: Option<&[f64]>) -> f64 {
        let p = self.params;
        trapezoid(
            |w| {
                let remaining = tau - w;
                let u = interp(self.taus, upper, remaining);
                let mut band = norm_cdf(-d2(x, u, p.rate, p.dividend_yield, p.volatility, w));
                if let Some(lower) = lower {
                    let l = interp(self.taus, lower, remaining).max(LOWER_FLOOR * p.strike);
                    band -= norm_cdf(-d2(x, l, p.rate, p.dividend_yield, p.volatility, w));
                }
                (-p.rate * w).exp() * band
            },
            0.0,
            tau,
            self.config.integration_panels,
        )
    }

    /// Dividend-discounted companion using `d₁`.
    fn integral_q(&self, x: f64, tau: f64, upper: &[f64], lower: Option<&[f64]>) -> f64 {
        let p = self.params;
        trapezoid(
            |w| {
                let remaining = tau - w;
                let u = interp(self.taus, upper, remaining);
                let mut band = norm_cdf(-d1(x, u, p.rate, p.dividend_yield, p.volatility, w));
                if let Some(lower) = lower {
                    let l = interp(self.taus, lower, remaining).max(LOWER_FLOOR * p.strike);
                    band -= norm_cdf(-d1(x, l, p.rate, p.dividend_yield, p.volatility, w));
                }
                (-p.dividend_yield * w).exp() * band
            },
            0.0,
            tau,
            self.config.integration_panels,
        )
    }

    /// Non-integral value-matching terms at level `x`.
    fn base_terms(&self, x: f64, tau: f64) -> (f64, f64) {
        let p = self.params;
        let base_r = (-p.rate * tau).exp()
            * norm_cdf(-d2(x, p.strike, p.rate, p.dividend_yield, p.volatility, tau));
        let base_q = (-p.dividend_yield * tau).exp()
            * norm_cdf(-d1(x, p.strike, p.rate, p.dividend_yield, p.volatility, tau));
        (base_r, base_q)
    }

    /// Standard fixed-point map for the upper boundary.
    fn upper_update(&self, x: f64, tau: f64, upper: &[f64], lower: Option<&[f64]>) -> Option<f64> {
        let p = self.params;
        let (base_r, base_q) = self.base_terms(x, tau);
        let numerator = 1.0 - base_r - p.rate * self.integral_r(x, tau, upper, lower);
        let denominator = 1.0 - base_q - p.dividend_yield * self.integral_q(x, tau, upper, lower);
        if denominator.abs() < DENOMINATOR_GUARD {
            return None;
        }
        let updated = p.strike * numerator / denominator;
        updated.is_finite().then_some(updated)
    }

    /// FP-B′ map for the lower boundary: same value-matching algebra
    /// with the dividend integral moved into the numerator (scaled by
    /// `x/K`) and a denominator stripped of its integral term.
    fn lower_update(&self, x: f64, tau: f64, upper: &[f64], lower: &[f64]) -> Option<f64> {
        let p = self.params;
        let (base_r, base_q) = self.base_terms(x, tau);
        let i_r = self.integral_r(x, tau, upper, Some(lower));
        let i_q = self.integral_q(x, tau, upper, Some(lower));
        let numerator = 1.0 - base_r - p.rate * i_r + (x / p.strike) * p.dividend_yield * i_q;
        let denominator = 1.0 - base_q;
        if denominator.abs() < DENOMINATOR_GUARD {
            return None;
        }
        let updated = p.strike * numerator / denominator;
        updated.is_finite().then_some(updated)
    }
}

/// Largest per-iteration relative move, then damp.
fn damp(old: f64, proposed: f64, threshold: f64) -> f64 {
    let cap = threshold * old.abs().max(f64::MIN_POSITIVE);
    let delta = proposed - old;
    if delta.abs() > cap {
        old + delta.signum() * cap
    } else {
        proposed
    }
}

/// Locate the boundary merge time on the current profiles.
///
/// Boundaries are separated near expiry and merge (cross) as
/// time-to-expiry grows. Returns the maturity when they never cross;
/// otherwise the bracketing grid interval is refined by bisection to
/// the configured resolution.
fn detect_crossing(
    taus: &[f64],
    upper: &[f64],
    lower: &[f64],
    config: &EngineConfig,
) -> f64 {
    let n = taus.len();
    // First index (scanning from valuation toward expiry) where the
    // band is strictly open.
    let mut first_open = None;
    for j in 0..n {
        if upper[j] > lower[j] {
            first_open = Some(j);
            break;
        }
    }
    let Some(jc) = first_open else {
        // Fully collapsed profile; the merge sits at expiry.
        return 0.0;
    };
    if jc == 0 {
        return taus[0];
    }

    let gap = |tau: f64| interp(taus, upper, tau) - interp(taus, lower, tau);
    let solver = BisectionSolver::new(SolverConfig::new(config.crossing_resolution, 100));
    // gap(taus[jc]) > 0 ≥ gap(taus[jc-1]); recall taus descend.
    match solver.find_root(gap, taus[jc], taus[jc - 1]) {
        Ok(tau_star) => tau_star,
        Err(_) => taus[jc],
    }
}

/// Collapse both profiles to their pointwise average wherever the
/// band is closed (`τ > τ*`).
fn collapse_beyond(taus: &[f64], upper: &mut [f64], lower: &mut [f64], tau_star: f64) {
    for j in 0..taus.len() {
        if taus[j] > tau_star {
            let mid = 0.5 * (upper[j] + lower[j]);
            upper[j] = mid;
            lower[j] = mid;
        }
    }
}

/// Refine the boundary seeds into full time profiles.
///
/// Put-oriented internally; calls are routed through the symmetric put
/// and mapped back with `B_call(τ) = K²/B_put(τ)` (which swaps the
/// roles of upper and lower).
///
/// # Arguments
///
/// * `params` - Validated market parameters
/// * `seeds` - QD+ output; infinite sentinels mark absent sides
/// * `config` - Engine tunables
///
/// # Returns
///
/// * `Err(PricingError::InvalidParameters)` - seeds carry no upper
///   boundary (nothing to refine)
///
/// Budget exhaustion is **not** an error; inspect
/// [`RefinedBoundaries::converged`] and `residual`.
pub fn refine_boundaries(
    params: &MarketParameters,
    seeds: &BoundarySeeds,
    config: &EngineConfig,
) -> Result<RefinedBoundaries, PricingError> {
    config.validate()?;

    if params.side == OptionSide::Call {
        let put = params.to_symmetric_put()?;
        let put_seeds = BoundarySeeds {
            upper: if seeds.lower.is_finite() {
                params.strike * params.strike / seeds.lower
            } else {
                f64::NEG_INFINITY
            },
            lower: if seeds.upper.is_finite() {
                params.strike * params.strike / seeds.upper
            } else {
                f64::NEG_INFINITY
            },
            spurious_root_discarded: seeds.spurious_root_discarded,
        };
        let refined = refine_boundaries(&put, &put_seeds, config)?;
        let k2 = params.strike * params.strike;
        let invert = |sample: &BoundarySample| BoundarySample {
            taus: sample.taus.clone(),
            values: sample.values.iter().map(|b| k2 / b).collect(),
        };
        // Inversion flips the band: the put's lower maps to the call's
        // upper edge and vice versa.
        let upper = refined
            .lower
            .as_ref()
            .map(&invert)
            .unwrap_or_else(|| invert(&refined.upper));
        let lower = refined.lower.as_ref().map(|_| invert(&refined.upper));
        return Ok(RefinedBoundaries {
            upper,
            lower,
            crossing_time: refined.crossing_time,
            iterations: refined.iterations,
            residual: refined.residual,
            converged: refined.converged,
        });
    }

    if !seeds.upper.is_finite() {
        return Err(PricingError::InvalidParameters(
            "no upper boundary seed to refine".to_string(),
        ));
    }
    let double = seeds.lower.is_finite();
    let strike = params.strike;
    let maturity = params.maturity;

    let taus = collocation_taus(config.grid_size, maturity);
    let n = taus.len();
    let floor = LOWER_FLOOR * strike;

    // Initialise both profiles flat at the seeds. The expiry node is
    // pinned analytically and never updated: the upper boundary ends at
    // the strike, the lower (negative-rate band) at K·min(1, r/q) where
    // rK - qS changes sign.
    let mut upper = vec![seeds.upper.min(strike); n];
    upper[n - 1] = strike;
    let mut lower = vec![if double { seeds.lower.max(floor) } else { floor }; n];
    if double {
        lower[n - 1] = boundary_scale(strike, params.rate, params.dividend_yield);
    }

    let mut crossing = if double {
        let tau_star = detect_crossing(&taus, &upper, &lower, config);
        collapse_beyond(&taus, &mut upper, &mut lower, tau_star);
        tau_star
    } else {
        maturity
    };

    let context = KimContext {
        params,
        config,
        taus: &taus,
    };

    let mut iterations = 0;
    let mut residual = f64::INFINITY;
    let mut converged = false;

    for iteration in 1..=config.max_fixed_point_iterations {
        iterations = iteration;
        let upper_prev = upper.clone();
        let lower_prev = lower.clone();
        let lower_view = double.then_some(lower_prev.as_slice());

        // Upper sweep from the previous snapshot.
        let mut upper_next = upper_prev.clone();
        for j in 0..n - 1 {
            if taus[j] > crossing {
                continue;
            }
            if let Some(proposed) =
                context.upper_update(upper_prev[j], taus[j], &upper_prev, lower_view)
            {
                upper_next[j] =
                    damp(upper_prev[j], proposed, config.damping_threshold).min(strike);
            }
        }

        // Lower sweep consumes the just-computed upper profile.
        let mut lower_next = lower_prev.clone();
        if double {
            for j in 0..n - 1 {
                if taus[j] > crossing {
                    continue;
                }
                if let Some(proposed) =
                    context.lower_update(lower_prev[j], taus[j], &upper_next, &lower_prev)
                {
                    lower_next[j] = damp(lower_prev[j], proposed, config.damping_threshold);
                }
                lower_next[j] = lower_next[j].max(floor);
                // Ordering violation: symmetrise around the midpoint.
                if lower_next[j] > upper_next[j] {
                    let mid = 0.5 * (lower_next[j] + upper_next[j]);
                    lower_next[j] = mid;
                    upper_next[j] = mid;
                }
            }
        }

        residual = upper_next
            .iter()
            .zip(upper_prev.iter())
            .chain(lower_next.iter().zip(lower_prev.iter()))
            .map(|(new, old)| (new - old).abs())
            .fold(0.0f64, f64::max)
            / strike;

        upper = upper_next;
        lower = lower_next;

        if double {
            crossing = detect_crossing(&taus, &upper, &lower, config);
            collapse_beyond(&taus, &mut upper, &mut lower, crossing);
        }

        debug!(
            "fp-b' iteration {} residual {:.3e} crossing {:.4}",
            iteration, residual, crossing
        );

        if residual < config.fixed_point_tolerance {
            converged = true;
            break;
        }
    }

    // Pointwise updates do not preserve monotonicity; project both
    // profiles before they reach the spectral stage. Arrays are stored
    // in descending τ, so the upper boundary (non-increasing in τ) is
    // non-decreasing in index and vice versa for the lower.
    upper = isotonic_non_decreasing(&upper);
    let lower_sample = if double {
        lower = isotonic_non_increasing(&lower);
        crossing = detect_crossing(&taus, &upper, &lower, config);
        Some(BoundarySample {
            taus: taus.clone(),
            values: lower,
        })
    } else {
        None
    };

    Ok(RefinedBoundaries {
        upper: BoundarySample {
            taus,
            values: upper,
        },
        lower: lower_sample,
        crossing_time: crossing.min(maturity),
        iterations,
        residual,
        converged,
    })
}
