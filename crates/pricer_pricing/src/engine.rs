//! Pricing orchestrator.
//!
//! Composes the boundary engine into a price: classify the regime,
//! dispatch to the matching solver path, integrate the early-exercise
//! premium over the resulting boundary functions, and assemble an
//! immutable [`PricingResult`].
//!
//! Dispatch table:
//!
//! | Regime | Path |
//! |--------|------|
//! | NoEarlyExercise | European value only |
//! | SingleBoundary* | QD+ boundary profile, no Kim refinement |
//! | DoubleBoundaryNegativeRates | full QD+ → Kim → spectral pipeline |
//! | Degenerate | terminal `UnsupportedRegime` error |
//!
//! Calls run through the McDonald-Schroder symmetric put
//! (`C(S,K,r,q) = (S/K)·P(K²/S,K,q,r)`) so every boundary solve is
//! put-oriented; boundaries map back through `B_call = K²/B_put`.

use crate::premium::early_exercise_premium;
use crate::result::PricingResult;
use pricer_boundary::black_scholes::bs_price;
use pricer_boundary::config::EngineConfig;
use pricer_boundary::error::PricingError;
use pricer_boundary::kim::{collocation_taus, refine_boundaries, BoundarySample};
use pricer_boundary::params::{MarketParameters, OptionSide};
use pricer_boundary::qdplus::approximate_boundaries;
use pricer_boundary::regime::{classify_regime, critical_volatility, ExerciseRegime};
use pricer_boundary::spectral::BoundaryFunction;
use pricer_core::math::isotonic::isotonic_non_decreasing;
use tracing::debug;

/// Put-oriented boundary solve, before spectral encoding.
struct BoundarySolve {
    upper: BoundarySample,
    lower: Option<BoundarySample>,
    crossing_time: f64,
    iterations: usize,
    residual: f64,
    converged: bool,
    spurious_root_discarded: bool,
}

/// American option pricing engine.
///
/// A plain value type holding the engine configuration; pricing calls
/// share no mutable state, so one engine can serve concurrent
/// sensitivity sweeps.
///
/// # Examples
///
/// ```
/// use pricer_boundary::{EngineConfig, MarketParameters, OptionSide};
/// use pricer_pricing::engine::AmericanOptionEngine;
///
/// let engine = AmericanOptionEngine::new(EngineConfig::default()).unwrap();
/// let params =
///     MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
/// let result = engine.price(&params).unwrap();
/// assert!(result.price > result.european_price);
/// ```
#[derive(Clone, Debug)]
pub struct AmericanOptionEngine {
    config: EngineConfig,
}

impl AmericanOptionEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Borrow the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Price an American option.
    ///
    /// # Returns
    ///
    /// * `Err(PricingError::UnsupportedRegime)` - degenerate
    ///   classification; pricing cannot proceed
    /// * `Err(PricingError::InvalidParameters)` - a symmetric-put
    ///   transform left the validated parameter domain
    ///
    /// Soft failures (budget exhaustion, discarded roots) are reported
    /// through the result diagnostics, never as errors.
    pub fn price(&self, params: &MarketParameters) -> Result<PricingResult, PricingError> {
        let regime = classify_regime(
            params.rate,
            params.dividend_yield,
            params.volatility,
            params.side,
        );
        // σ* is defined on the put-oriented rate pair.
        let sigma_star = match params.side {
            OptionSide::Put => critical_volatility(params.rate, params.dividend_yield),
            OptionSide::Call => critical_volatility(params.dividend_yield, params.rate),
        };
        debug!("classified {} as {}", params.side, regime);

        let european = bs_price(
            params.side,
            params.spot,
            params.strike,
            params.rate,
            params.dividend_yield,
            params.volatility,
            params.maturity,
        );

        match regime {
            ExerciseRegime::Degenerate => Err(PricingError::UnsupportedRegime(regime)),
            ExerciseRegime::NoEarlyExercise => {
                Ok(PricingResult::european_only(european, regime, sigma_star))
            }
            _ => match params.side {
                OptionSide::Put => self.price_exercisable_put(params, regime, sigma_star, european),
                OptionSide::Call => self.price_exercisable_call(params, regime, sigma_star, european),
            },
        }
    }

    /// Full pipeline for a put in an exercise regime.
    fn price_exercisable_put(
        &self,
        params: &MarketParameters,
        regime: ExerciseRegime,
        sigma_star: Option<f64>,
        european: f64,
    ) -> Result<PricingResult, PricingError> {
        let solve = self.solve_put_boundaries(params, regime)?;
        let upper = BoundaryFunction::from_samples(
            &solve.upper.taus,
            &solve.upper.values,
            params.strike,
            params.rate,
            params.dividend_yield,
        )?;
        let lower = solve
            .lower
            .as_ref()
            .map(|sample| {
                BoundaryFunction::from_samples(
                    &sample.taus,
                    &sample.values,
                    params.strike,
                    params.rate,
                    params.dividend_yield,
                )
            })
            .transpose()?;

        let premium = early_exercise_premium(
            params,
            &upper,
            lower.as_ref(),
            solve.crossing_time,
            &self.config,
        )?;
        debug!("premium {:.6e} on european {:.6e}", premium, european);

        Ok(PricingResult {
            price: european + premium,
            european_price: european,
            early_exercise_premium: premium,
            regime,
            critical_volatility: sigma_star,
            crossing_time: solve.lower.is_some().then_some(solve.crossing_time),
            iterations_used: solve.iterations,
            final_residual: solve.residual,
            converged: solve.converged,
            spurious_root_discarded: solve.spurious_root_discarded,
            upper_boundary: Some(upper),
            lower_boundary: lower,
        })
    }

    /// Calls go through the symmetric put and map back.
    fn price_exercisable_call(
        &self,
        params: &MarketParameters,
        regime: ExerciseRegime,
        sigma_star: Option<f64>,
        european: f64,
    ) -> Result<PricingResult, PricingError> {
        let put_params = params.to_symmetric_put()?;
        let solve = self.solve_put_boundaries(&put_params, regime)?;

        let put_upper = BoundaryFunction::from_samples(
            &solve.upper.taus,
            &solve.upper.values,
            put_params.strike,
            put_params.rate,
            put_params.dividend_yield,
        )?;
        let put_lower = solve
            .lower
            .as_ref()
            .map(|sample| {
                BoundaryFunction::from_samples(
                    &sample.taus,
                    &sample.values,
                    put_params.strike,
                    put_params.rate,
                    put_params.dividend_yield,
                )
            })
            .transpose()?;

        let put_premium = early_exercise_premium(
            &put_params,
            &put_upper,
            put_lower.as_ref(),
            solve.crossing_time,
            &self.config,
        )?;
        let factor = params.spot / params.strike;
        let price = factor
            * (bs_price(
                OptionSide::Put,
                put_params.spot,
                put_params.strike,
                put_params.rate,
                put_params.dividend_yield,
                put_params.volatility,
                put_params.maturity,
            ) + put_premium);

        // B_call(τ) = K²/B_put(τ); the inversion swaps the band edges.
        let k2 = params.strike * params.strike;
        let invert = |sample: &BoundarySample| -> Result<BoundaryFunction, PricingError> {
            let values: Vec<f64> = sample.values.iter().map(|b| k2 / b).collect();
            BoundaryFunction::from_samples(
                &sample.taus,
                &values,
                params.strike,
                params.rate,
                params.dividend_yield,
            )
        };
        let call_lower = invert(&solve.upper)?;
        let call_upper = solve.lower.as_ref().map(&invert).transpose()?;

        Ok(PricingResult {
            price,
            european_price: european,
            early_exercise_premium: price - european,
            regime,
            critical_volatility: sigma_star,
            crossing_time: solve.lower.is_some().then_some(solve.crossing_time),
            iterations_used: solve.iterations,
            final_residual: solve.residual,
            converged: solve.converged,
            spurious_root_discarded: solve.spurious_root_discarded,
            upper_boundary: call_upper,
            lower_boundary: Some(call_lower),
        })
    }

    /// Dispatch the put-oriented boundary solve by regime.
    fn solve_put_boundaries(
        &self,
        params: &MarketParameters,
        regime: ExerciseRegime,
    ) -> Result<BoundarySolve, PricingError> {
        let seeds = approximate_boundaries(params, &self.config)?;
        match regime {
            ExerciseRegime::SingleBoundaryPositive
            | ExerciseRegime::SingleBoundaryNegativeDividend => {
                self.qdplus_profile(params, seeds.spurious_root_discarded)
            }
            ExerciseRegime::DoubleBoundaryNegativeRates => {
                let refined = refine_boundaries(params, &seeds, &self.config)?;
                Ok(BoundarySolve {
                    upper: refined.upper,
                    lower: refined.lower,
                    crossing_time: refined.crossing_time,
                    iterations: refined.iterations,
                    residual: refined.residual,
                    converged: refined.converged,
                    spurious_root_discarded: seeds.spurious_root_discarded,
                })
            }
            _ => Err(PricingError::UnsupportedRegime(regime)),
        }
    }

    /// Boundary time profile from QD+ alone: one root solve per grid
    /// time. The premium integral is first-order insensitive to
    /// boundary error, so the single-boundary regimes skip the Kim
    /// refinement entirely.
    fn qdplus_profile(
        &self,
        params: &MarketParameters,
        seed_spurious: bool,
    ) -> Result<BoundarySolve, PricingError> {
        let taus = collocation_taus(self.config.grid_size, params.maturity);
        let mut values = Vec::with_capacity(taus.len());
        let mut spurious = seed_spurious;
        for &tau in &taus {
            // The grid reaches below the validated maturity floor next
            // to expiry; those nodes take the analytic limit.
            if tau <= 1e-6 {
                values.push(params.strike);
                continue;
            }
            let point_params = params.with_maturity(tau)?;
            let seeds = approximate_boundaries(&point_params, &self.config)?;
            spurious |= seeds.spurious_root_discarded;
            values.push(seeds.upper.min(params.strike));
        }
        // Independent per-point solves do not guarantee monotonicity.
        let values = isotonic_non_decreasing(&values);

        Ok(BoundarySolve {
            upper: BoundarySample { taus, values },
            lower: None,
            crossing_time: params.maturity,
            iterations: 0,
            residual: 0.0,
            converged: true,
            spurious_root_discarded: spurious,
        })
    }
}
