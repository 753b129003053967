//! QD+ boundary approximation.
//!
//! Produces the exercise-boundary pair at valuation time from the
//! characteristic quadratic of the pricing ODE, refined by a
//! Super-Halley root finder. The output is a **seed**: downstream Kim
//! refinement corrects residual error, so the guard rails here prefer a
//! reasonable-but-inexact seed over a precisely-converged wrong root.
//!
//! Characteristic equation, with `α = 2r/σ²`, `β = 2(r-q)/σ²` and
//! `h = 1 - e^{-rT}`:
//!
//! ```text
//! λ² + (β - 1)λ - α/h = 0
//! ```
//!
//! The two roots always have opposite signs in the supported regimes
//! (their product `-α/h` is negative), and the assignment follows the
//! Healy (2021) convention: the negative root drives the put's standard
//! (upper) boundary through `K·λ/(λ-1)`, the positive root drives the
//! lower boundary of the negative-rate band.

use crate::black_scholes::{bs_price, d1_d2};
use crate::config::EngineConfig;
use crate::error::PricingError;
use crate::params::{MarketParameters, OptionSide};
use crate::regime::{classify_regime, critical_volatility, ExerciseRegime};
use pricer_core::math::normal::norm_cdf;
use pricer_core::math::solvers::{SolverConfig, SuperHalleySolver};

/// Clamp applied to the exponent of the characteristic residual.
const C0_CLAMP: f64 = 60.0;

/// Relative finite-difference step for the residual derivatives.
const FD_STEP: f64 = 1e-5;

/// Empirical seed table for the double-boundary regime: maps σ/σ* to
/// a blend weight `w`, and the lower seed is `X + w·(upper - X)` with
/// `X = K·min(1, r/q)` the lower boundary's expiry limit. At `w = 1`
/// the seeds merge, matching the band collapse at σ = σ*. Calibration
/// data, not ground truth; the Kim refinement stage never reads it, so
/// it can be recalibrated without touching the fixed-point logic.
const LOWER_SEED_TABLE: [(f64, f64); 7] = [
    (0.0, 0.02),
    (0.2, 0.08),
    (0.4, 0.20),
    (0.6, 0.38),
    (0.8, 0.62),
    (0.95, 0.85),
    (1.0, 1.0),
];

/// Boundary pair at valuation time.
///
/// The exercise region is the band `[lower, upper]` in spot space.
/// Absent sides carry infinite sentinels: a single-boundary put has
/// `lower = -∞` (the band reaches zero), a single-boundary call has
/// `upper = +∞`. A no-exercise regime collapses the band to empty
/// (`upper = -∞`, `lower = +∞` never occurs here because the engine
/// skips QD+ entirely in that regime).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundarySeeds {
    /// Upper edge of the exercise band at valuation.
    pub upper: f64,
    /// Lower edge of the exercise band at valuation.
    pub lower: f64,
    /// True when a converged root was discarded by the guard rails and
    /// the closed-form seed was returned instead.
    pub spurious_root_discarded: bool,
}

/// `h = 1 - e^{-rT}` with a Taylor guard for small `|rT|`.
///
/// `h` is legitimately negative when `r < 0` and must not be
/// special-cased away; only the catastrophic cancellation near zero is.
fn exercise_discount(rate: f64, maturity: f64) -> f64 {
    let x = rate * maturity;
    if x.abs() < 1e-6 {
        x * (1.0 - 0.5 * x + x * x / 6.0)
    } else {
        1.0 - (-x).exp()
    }
}

/// `α/h` evaluated without the 0/0 at `r → 0`.
fn alpha_over_h(rate: f64, volatility: f64, maturity: f64) -> f64 {
    let x = rate * maturity;
    if x.abs() < 1e-6 {
        // α/h = (2r/σ²)/(1-e^{-rT}) → 2/(σ²·T) as r → 0.
        2.0 / (volatility * volatility * maturity * (1.0 - 0.5 * x + x * x / 6.0))
    } else {
        (2.0 * rate / (volatility * volatility)) / exercise_discount(rate, maturity)
    }
}

/// Both roots of the characteristic quadratic, `(λ₋, λ₊)`.
fn characteristic_roots(
    rate: f64,
    dividend_yield: f64,
    volatility: f64,
    maturity: f64,
) -> Result<(f64, f64), PricingError> {
    let beta = 2.0 * (rate - dividend_yield) / (volatility * volatility);
    let aoh = alpha_over_h(rate, volatility, maturity);
    let disc = (beta - 1.0) * (beta - 1.0) + 4.0 * aoh;
    if disc < 0.0 {
        return Err(PricingError::InvalidParameters(format!(
            "characteristic discriminant negative ({:.6e}); no real exercise root",
            disc
        )));
    }
    let sq = disc.sqrt();
    let lambda_minus = 0.5 * (-(beta - 1.0) - sq);
    let lambda_plus = 0.5 * (-(beta - 1.0) + sq);
    Ok((lambda_minus, lambda_plus))
}

/// Perpetual-style boundary `K·λ/(λ-1)` at the finite-maturity root.
///
/// Evaluating λ at `h(T)` rather than `h = 1` builds the Ju-Zhong time
/// decay into the seed: as `T → 0`, `λ₋ → -∞` and the seed rises to
/// the strike limit.
fn perpetual_seed(strike: f64, lambda: f64) -> f64 {
    strike * lambda / (lambda - 1.0)
}

/// Linear interpolation in the calibrated lower-seed table.
fn lower_seed_ratio(sigma_ratio: f64) -> f64 {
    let x = sigma_ratio.clamp(0.0, 1.0);
    let mut prev = LOWER_SEED_TABLE[0];
    for &(xi, wi) in LOWER_SEED_TABLE.iter().skip(1) {
        if x <= xi {
            let t = (x - prev.0) / (xi - prev.0);
            return prev.1 + t * (wi - prev.1);
        }
        prev = (xi, wi);
    }
    1.0
}

/// The smooth-pasting fixed-point map behind the boundary equation.
///
/// Value matching plus smooth pasting at a band edge `S` give
///
/// ```text
/// S·(1 - e^{-qτ}Φ(-d₁(S))) + λ·(K - S - p(S)) = 0
/// ```
///
/// so the edge is a fixed point of
/// `Ŝ(S) = -λ·(K - S - p(S)) / (1 - e^{-qτ}Φ(-d₁(S)))`. The same map
/// serves both edges: the negative root for the standard/upper put
/// boundary, the positive root for the lower edge of the negative-rate
/// band (where `e^{-qτ} > 1` flips the denominator's sign).
///
/// Returns `None` when a factor is too degenerate to trust; the caller
/// keeps the seed — singularities recover locally, never raise.
fn critical_price_map(spot: f64, lambda: f64, params: &MarketParameters) -> Option<f64> {
    let (r, q, sigma, t, k) = (
        params.rate,
        params.dividend_yield,
        params.volatility,
        params.maturity,
        params.strike,
    );
    let european = bs_price(OptionSide::Put, spot, k, r, q, sigma, t);
    let gap = k - spot - european;
    if gap.abs() < 1e-10 * k {
        return None;
    }
    let (d1, _) = d1_d2(spot, k, r, q, sigma, t);
    let denominator = 1.0 - (-q * t).exp() * norm_cdf(-d1);
    if denominator.abs() < 1e-10 {
        return None;
    }
    let s_hat = -lambda * gap / denominator;
    (s_hat.is_finite() && s_hat > 0.0).then_some(s_hat)
}

/// `c0(S) = λ·ln(Ŝ(S)/K)`, the exponent recasting the fixed point as
/// the characteristic residual.
fn c0_exponent(spot: f64, lambda: f64, params: &MarketParameters) -> Option<f64> {
    critical_price_map(spot, lambda, params)
        .map(|s_hat| (lambda * (s_hat / params.strike).ln()).clamp(-C0_CLAMP, C0_CLAMP))
}

/// Characteristic residual `f(S) = (S/K)^λ - e^{c0(S)}`.
///
/// Normalised by `K^λ` so the magnitude stays workable across the
/// whole search band; its root is exactly the fixed point of
/// [`critical_price_map`].
fn residual(spot: f64, lambda: f64, params: &MarketParameters) -> f64 {
    let ratio = (spot / params.strike).max(1e-12);
    match c0_exponent(spot, lambda, params) {
        Some(c0) => ratio.powf(lambda) - c0.exp(),
        // Degenerate point: report no residual and let the acceptance
        // checks rule on whatever the solver lands on.
        None => 0.0,
    }
}

/// Maturity-dependent acceptance threshold for the refined root,
/// relative to the seed. Short maturities get a tighter band because
/// the seed is already close to the strike limit there.
fn deviation_threshold(maturity: f64) -> f64 {
    0.10 + 0.25 * maturity.min(1.0)
}

/// Refine one boundary level with Super-Halley, guarded.
///
/// Returns `(level, discarded)`: the refined root when it passes the
/// acceptance checks, otherwise the seed unchanged with the discard
/// flag set for any *converged-but-rejected* root.
fn refine_root(
    seed: f64,
    lambda: f64,
    params: &MarketParameters,
    upper_cap: f64,
) -> (f64, bool) {
    let k = params.strike;
    // c0 singularities make refinement pointless; the seed stands.
    if c0_exponent(seed, lambda, params).is_none() {
        return (seed, false);
    }

    let f = |s: f64| residual(s, lambda, params);
    let step = FD_STEP * k;
    let f_prime = move |s: f64| (f(s + step) - f(s - step)) / (2.0 * step);
    let f_second = move |s: f64| (f(s + step) - 2.0 * f(s) + f(s - step)) / (step * step);

    let solver = SuperHalleySolver::new(SolverConfig::new(1e-9, 50));
    let root = match solver.find_root_bounded(f, f_prime, f_second, seed, 0.01 * k, 2.0 * k) {
        Ok(root) => root,
        // Non-convergence is not a spurious root; the seed stands.
        Err(_) => return (seed, false),
    };

    // Economic bound for the put family plus the two rejection rules:
    // a root hugging the strike, or one too far from its seed.
    let near_strike = (root - k).abs() < 0.05 * k;
    let too_far = (root - seed).abs() > deviation_threshold(params.maturity) * seed;
    if root > upper_cap || near_strike || too_far {
        return (seed, true);
    }
    (root, false)
}

/// Compute the boundary seeds at valuation time.
///
/// Put-oriented internally; calls are routed through the
/// McDonald-Schroder symmetric put and mapped back with
/// `B_call = K²/B_put`. See [`BoundarySeeds`] for the sentinel
/// conventions of absent sides.
///
/// # Arguments
///
/// * `params` - Validated market parameters
/// * `config` - Engine tunables (currently unused here beyond
///   validation, kept in the signature so seed heuristics can become
///   configurable without an interface break)
///
/// # Returns
///
/// * `Err(PricingError::UnsupportedRegime)` - degenerate classification
///
/// # Examples
///
/// ```
/// use pricer_boundary::config::EngineConfig;
/// use pricer_boundary::params::{MarketParameters, OptionSide};
/// use pricer_boundary::qdplus::approximate_boundaries;
///
/// let params = MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
/// let seeds = approximate_boundaries(&params, &EngineConfig::default()).unwrap();
/// assert!(seeds.upper > 0.0 && seeds.upper < 40.0);
/// assert_eq!(seeds.lower, f64::NEG_INFINITY);
/// ```
pub fn approximate_boundaries(
    params: &MarketParameters,
    config: &EngineConfig,
) -> Result<BoundarySeeds, PricingError> {
    config.validate()?;

    if params.side == OptionSide::Call {
        let put = params.to_symmetric_put()?;
        let seeds = approximate_boundaries(&put, config)?;
        let k2 = params.strike * params.strike;
        let upper = if seeds.lower == f64::NEG_INFINITY {
            f64::INFINITY
        } else {
            k2 / seeds.lower
        };
        let lower = if seeds.upper == f64::NEG_INFINITY {
            f64::INFINITY
        } else {
            k2 / seeds.upper
        };
        return Ok(BoundarySeeds {
            upper,
            lower,
            spurious_root_discarded: seeds.spurious_root_discarded,
        });
    }

    let regime = classify_regime(
        params.rate,
        params.dividend_yield,
        params.volatility,
        params.side,
    );

    match regime {
        ExerciseRegime::Degenerate => Err(PricingError::UnsupportedRegime(regime)),
        ExerciseRegime::NoEarlyExercise => Ok(BoundarySeeds {
            upper: f64::NEG_INFINITY,
            lower: f64::NEG_INFINITY,
            spurious_root_discarded: false,
        }),
        ExerciseRegime::SingleBoundaryPositive | ExerciseRegime::SingleBoundaryNegativeDividend => {
            let (lambda_minus, _) = characteristic_roots(
                params.rate,
                params.dividend_yield,
                params.volatility,
                params.maturity,
            )?;
            let seed = perpetual_seed(params.strike, lambda_minus);
            let (upper, discarded) = refine_root(seed, lambda_minus, params, params.strike);
            Ok(BoundarySeeds {
                upper,
                lower: f64::NEG_INFINITY,
                spurious_root_discarded: discarded,
            })
        }
        ExerciseRegime::DoubleBoundaryNegativeRates => {
            let (lambda_minus, lambda_plus) = characteristic_roots(
                params.rate,
                params.dividend_yield,
                params.volatility,
                params.maturity,
            )?;
            let upper_seed = perpetual_seed(params.strike, lambda_minus);

            // critical_volatility is Some in this regime by construction
            let sigma_star = critical_volatility(params.rate, params.dividend_yield)
                .expect("double-boundary regime implies q < r < 0");
            // Lower seed blends from its expiry limit X = K·r/q toward
            // the upper seed as σ approaches σ*.
            let x_limit = params.strike * (params.rate / params.dividend_yield).min(1.0);
            let w = lower_seed_ratio(params.volatility / sigma_star);
            let lower_seed = x_limit + w * (upper_seed - x_limit);

            let (upper, upper_discarded) =
                refine_root(upper_seed, lambda_minus, params, params.strike);
            let (lower_refined, lower_discarded) =
                refine_root(lower_seed, lambda_plus, params, 0.99 * upper);
            // The band must stay ordered even when both roots moved.
            let lower = lower_refined.min(0.99 * upper);

            Ok(BoundarySeeds {
                upper,
                lower,
                spurious_root_discarded: upper_discarded || lower_discarded,
            })
        }
    }
}
