//! Pricing result with convergence diagnostics.

use pricer_boundary::regime::ExerciseRegime;
use pricer_boundary::spectral::BoundaryFunction;

/// Outcome of one American option pricing call.
///
/// Built once at the end of the pipeline and never mutated. Soft
/// failures (exhausted fixed-point budget, discarded spurious roots)
/// do not invalidate the price; they surface through the diagnostic
/// fields so the caller can decide whether the accuracy is acceptable.
#[derive(Clone, Debug)]
pub struct PricingResult {
    /// American option price.
    pub price: f64,
    /// European (Black-Scholes) value of the same contract.
    pub european_price: f64,
    /// Early-exercise premium actually added to the European value.
    pub early_exercise_premium: f64,
    /// Exercise regime the pricing ran under.
    pub regime: ExerciseRegime,
    /// Critical volatility σ*; present only in the negative-rate
    /// double-boundary candidate region.
    pub critical_volatility: Option<f64>,
    /// Time-to-expiry at which the two boundaries merge; present only
    /// for double-boundary solves.
    pub crossing_time: Option<f64>,
    /// Fixed-point iterations spent in the Kim refinement (zero when
    /// the regime needs no refinement).
    pub iterations_used: usize,
    /// Final maximum per-point boundary move, relative to the strike.
    pub final_residual: f64,
    /// Whether every iterative stage met its tolerance.
    pub converged: bool,
    /// True when a QD+ root was discarded by the guard rails and the
    /// closed-form seed used instead.
    pub spurious_root_discarded: bool,
    /// Upper edge of the exercise band. For puts this is the classic
    /// boundary; for single-boundary calls the upper edge is infinite
    /// and stays absent.
    pub upper_boundary: Option<BoundaryFunction>,
    /// Lower edge of the exercise band. Present for calls (their
    /// exercise boundary) and for double-boundary puts.
    pub lower_boundary: Option<BoundaryFunction>,
}

impl PricingResult {
    /// A European-only result for regimes without early exercise.
    pub(crate) fn european_only(
        price: f64,
        regime: ExerciseRegime,
        critical_volatility: Option<f64>,
    ) -> Self {
        Self {
            price,
            european_price: price,
            early_exercise_premium: 0.0,
            regime,
            critical_volatility,
            crossing_time: None,
            iterations_used: 0,
            final_residual: 0.0,
            converged: true,
            spurious_root_discarded: false,
            upper_boundary: None,
            lower_boundary: None,
        }
    }
}
