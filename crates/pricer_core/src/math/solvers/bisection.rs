//! Bisection root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Plain bisection root finder.
///
/// Guaranteed linear convergence for any continuous function with a
/// valid bracket. Used where robustness matters more than speed, e.g.
/// pinning the crossing time of two boundary profiles to a coarse
/// resolution.
///
/// Unlike the derivative-based solvers, `tolerance` here bounds the
/// bracket **width**, not `|f(x)|`.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{BisectionSolver, SolverConfig};
///
/// let solver = BisectionSolver::new(SolverConfig::new(1e-8, 100));
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct BisectionSolver<T: Float> {
    /// Solver configuration
    config: SolverConfig<T>,
}

impl<T: Float> BisectionSolver<T> {
    /// Create a new bisection solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// Requires that `f(a)` and `f(b)` have opposite signs (a valid
    /// bracket); either endpoint with `f = 0` exactly is returned as is.
    ///
    /// # Arguments
    ///
    /// * `f` - Function to find root of
    /// * `a` - Left bracket endpoint
    /// * `b` - Right bracket endpoint
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Midpoint of a bracket narrower than `tolerance`
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have same sign
    /// * `Err(SolverError::MaxIterationsExceeded)` - Budget exhausted
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let fb = f(b);
        let two = T::from(2.0).unwrap();

        if fa == T::zero() {
            return Ok(a);
        }
        if fb == T::zero() {
            return Ok(b);
        }
        if fa * fb > T::zero() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        for _iteration in 0..self.config.max_iterations {
            let mid = (a + b) / two;
            if (b - a).abs() < self.config.tolerance {
                return Ok(mid);
            }
            let fmid = f(mid);
            if fmid == T::zero() {
                return Ok(mid);
            }
            if fa * fmid < T::zero() {
                b = mid;
            } else {
                a = mid;
                fa = fmid;
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
