//! Super-Halley root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Super-Halley root finder with a Newton fallback step.
///
/// Third-order iteration using the function value and its first two
/// derivatives:
///
/// ```text
/// L = f·f'' / (f')²
/// x ← x − (1 + L / (2(1 − L))) · f / f'
/// ```
///
/// When `|1 − L|` is near zero the correction factor blows up and the
/// iteration degrades to a plain Newton step instead.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Convergence
///
/// Cubic near a simple root, so seed quality matters more than budget:
/// from a closed-form seed a handful of iterations reaches round-off.
/// Like all high-order iterations it can overshoot from a poor seed;
/// [`find_root_bounded`] clamps each iterate into a search band for that
/// case.
///
/// [`find_root_bounded`]: SuperHalleySolver::find_root_bounded
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{SolverConfig, SuperHalleySolver};
///
/// // Solve x² - 2 = 0 (find √2)
/// let solver = SuperHalleySolver::new(SolverConfig::default());
///
/// let root = solver
///     .find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, |_x: f64| 2.0, 1.0)
///     .unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SuperHalleySolver<T: Float> {
    /// Solver configuration
    config: SolverConfig<T>,
}

impl<T: Float> SuperHalleySolver<T> {
    /// Create a new Super-Halley solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` given its first and second derivatives.
    ///
    /// # Arguments
    ///
    /// * `f` - Function to find root of
    /// * `f_prime` - First derivative of f
    /// * `f_second` - Second derivative of f
    /// * `x0` - Initial guess
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance`
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    /// * `Err(SolverError::DerivativeNearZero)` - First derivative too small
    /// * `Err(SolverError::NumericalInstability)` - Iterate became non-finite
    pub fn find_root<F, G, H>(&self, f: F, f_prime: G, f_second: H, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
        H: Fn(T) -> T,
    {
        self.iterate(f, f_prime, f_second, x0, None)
    }

    /// Find a root with every iterate clamped into `[lo, hi]`.
    ///
    /// The band is a search region, not a correctness guarantee: the
    /// converged root may sit on a band edge, and callers are expected to
    /// apply their own acceptance checks afterwards.
    ///
    /// # Arguments
    ///
    /// * `f` - Function to find root of
    /// * `f_prime` - First derivative of f
    /// * `f_second` - Second derivative of f
    /// * `x0` - Initial guess
    /// * `lo` - Lower clamp of the search band
    /// * `hi` - Upper clamp of the search band
    pub fn find_root_bounded<F, G, H>(
        &self,
        f: F,
        f_prime: G,
        f_second: H,
        x0: T,
        lo: T,
        hi: T,
    ) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
        H: Fn(T) -> T,
    {
        self.iterate(f, f_prime, f_second, x0, Some((lo, hi)))
    }

    fn iterate<F, G, H>(
        &self,
        f: F,
        f_prime: G,
        f_second: H,
        x0: T,
        band: Option<(T, T)>,
    ) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
        H: Fn(T) -> T,
    {
        let mut x = x0;
        let epsilon = T::from(1e-30).unwrap();
        let degenerate = T::from(1e-10).unwrap();
        let half = T::from(0.5).unwrap();

        for _iteration in 0..self.config.max_iterations {
            let f_val = f(x);

            // Check for convergence
            if f_val.abs() < self.config.tolerance {
                return Ok(x);
            }

            let f_prime_val = f_prime(x);
            if f_prime_val.abs() < epsilon {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }

            let newton = f_val / f_prime_val;
            let lf = f_val * f_second(x) / (f_prime_val * f_prime_val);
            let one_minus_lf = T::one() - lf;

            // Degenerate curvature: the Super-Halley factor is singular,
            // take the Newton step instead.
            let step = if one_minus_lf.abs() < degenerate {
                newton
            } else {
                (T::one() + half * lf / one_minus_lf) * newton
            };

            x = x - step;
            if let Some((lo, hi)) = band {
                x = x.max(lo).min(hi);
            }

            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Super-Halley iteration produced non-finite value".to_string(),
                ));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_sqrt_2() {
        let solver = SuperHalleySolver::new(SolverConfig::default());

        let root = solver
            .find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, |_x: f64| 2.0, 1.0)
            .unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-12, "got {}", root);
    }

    #[test]
    fn test_find_transcendental_root() {
        let solver = SuperHalleySolver::new(SolverConfig::default());

        // x·eˣ = 1 (the omega constant, ≈ 0.567143).
        let f = |x: f64| x * x.exp() - 1.0;
        let root = solver
            .find_root(
                f,
                |x: f64| (x + 1.0) * x.exp(),
                |x: f64| (x + 2.0) * x.exp(),
                0.5,
            )
            .unwrap();
        assert!((root - 0.567_143_290_409_783_8).abs() < 1e-9, "root {}", root);
    }

    #[test]
    fn test_converges_faster_than_newton_budget() {
        // Cubic convergence: √5 from a rough seed in very few steps.
        let config = SolverConfig::new(1e-14, 6);
        let solver = SuperHalleySolver::new(config);

        let root = solver
            .find_root(|x: f64| x * x - 5.0, |x: f64| 2.0 * x, |_x: f64| 2.0, 3.0)
            .unwrap();
        assert!((root - 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_linear_function_uses_newton_fallback() {
        // f'' = 0 gives L = 0; a single Newton-like step must land exactly.
        let solver = SuperHalleySolver::with_defaults();
        let root = solver
            .find_root(|x: f64| 3.0 * x - 6.0, |_x: f64| 3.0, |_x: f64| 0.0, 100.0)
            .unwrap();
        assert!((root - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_near_zero() {
        let solver = SuperHalleySolver::with_defaults();
        let result = solver.find_root(|x: f64| x * x + 1.0, |_x: f64| 0.0, |_x: f64| 2.0, 0.5);
        assert!(matches!(
            result,
            Err(SolverError::DerivativeNearZero { .. })
        ));
    }

    #[test]
    fn test_max_iterations_exceeded() {
        let config = SolverConfig::new(1e-300, 3); // Impossible tolerance
        let solver = SuperHalleySolver::new(config);
        let result = solver.find_root(
            |x: f64| x.exp() - 2.0,
            |x: f64| x.exp(),
            |x: f64| x.exp(),
            5.0,
        );
        assert!(matches!(
            result,
            Err(SolverError::MaxIterationsExceeded { iterations: 3 })
        ));
    }

    #[test]
    fn test_bounded_iterates_stay_in_band() {
        let solver = SuperHalleySolver::with_defaults();
        // Root at 2; start far away with an aggressive function so an
        // unclamped step would overshoot below zero.
        let root = solver
            .find_root_bounded(
                |x: f64| x * x * x - 8.0,
                |x: f64| 3.0 * x * x,
                |x: f64| 6.0 * x,
                10.0,
                0.5,
                10.0,
            )
            .unwrap();
        assert!((root - 2.0).abs() < 1e-9);
        assert!((0.5..=10.0).contains(&root));
    }

    #[test]
    fn test_config_accessor() {
        let solver = SuperHalleySolver::new(SolverConfig::new(1e-9, 25));
        assert!((solver.config().tolerance - 1e-9).abs() < 1e-16);
        assert_eq!(solver.config().max_iterations, 25);
    }

    #[test]
    fn test_with_f32() {
        let solver: SuperHalleySolver<f32> = SuperHalleySolver::with_defaults();
        let root = solver
            .find_root(|x: f32| x * x - 2.0, |x: f32| 2.0 * x, |_x: f32| 2.0, 1.5_f32)
            .unwrap();
        assert!((root - 2.0_f32.sqrt()).abs() < 1e-5);
    }
}
