//! Shared solver configuration.

use num_traits::Float;

/// Tolerance and iteration budget shared by the root finders.
///
/// The interpretation of `tolerance` is solver-specific: the
/// derivative-based solvers stop on `|f(x)| < tolerance`, bisection on
/// the bracket width. Both give up with
/// `SolverError::MaxIterationsExceeded` once the budget runs out.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for the tolerance (e.g., `f64`)
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// // Defaults suit the boundary-refinement root solves.
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
///
/// // Coarse bracketing, e.g. pinning a crossing time.
/// let coarse = SolverConfig::new(5e-3, 100);
/// assert_eq!(coarse.max_iterations, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance; residual-based or bracket-width-based
    /// depending on the solver.
    pub tolerance: T,

    /// Iteration budget before the solver reports
    /// `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Tolerance 1e-10 with a 100-iteration budget.
    ///
    /// Tight enough that a Super-Halley refinement from a closed-form
    /// seed converges well inside the budget.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Build a configuration with an explicit tolerance and budget.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`; both are
    /// programming errors, not data-dependent conditions.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }
}
