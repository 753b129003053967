//! Error taxonomy of the numerical foundation.
//!
//! Three families, one per numerical concern:
//! - `SolverError`: root-finding failures
//! - `QuadratureError`: numerical-integration failures
//! - `InterpolationError`: spectral-fit and evaluation failures
//!
//! All variants carry enough context (iteration counts, abscissae,
//! bracket endpoints) for a caller to log or act on without re-running
//! the computation.

use thiserror::Error;

/// Failures of the root-finding solvers.
///
/// # Variants
/// - `MaxIterationsExceeded`: Iteration budget ran out above tolerance
/// - `DerivativeNearZero`: A derivative-based step would divide by ~0
/// - `NoBracket`: Bisection endpoints do not straddle a sign change
/// - `NumericalInstability`: An iterate left the representable range
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 50 };
/// assert!(format!("{}", err).contains("50 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Iteration budget exhausted without meeting the tolerance.
    #[error("No convergence within {iterations} iterations")]
    MaxIterationsExceeded {
        /// Size of the exhausted budget
        iterations: usize,
    },

    /// First derivative too small for a derivative-based step.
    #[error("Derivative vanishes near x = {x}")]
    DerivativeNearZero {
        /// Iterate at which the derivative vanished
        x: f64,
    },

    /// The bracketing endpoints carry the same sign.
    #[error("No sign change over [{a}, {b}]")]
    NoBracket {
        /// Left endpoint of the attempted bracket
        a: f64,
        /// Right endpoint of the attempted bracket
        b: f64,
    },

    /// An iterate became non-finite or otherwise unusable.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Failures of the numerical integrators.
///
/// # Variants
/// - `InvalidInterval`: Bounds are non-finite or reversed
/// - `ToleranceNotReached`: Subdivision budget exhausted above tolerance
/// - `NonFiniteIntegrand`: The integrand produced NaN or infinity
///
/// # Examples
/// ```
/// use pricer_core::types::QuadratureError;
///
/// let err = QuadratureError::InvalidInterval { a: 1.0, b: 0.0 };
/// assert!(format!("{}", err).contains("[1, 0]"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuadratureError {
    /// Integration interval is empty, reversed, or non-finite.
    #[error("Invalid integration interval [{a}, {b}]")]
    InvalidInterval {
        /// Lower integration bound
        a: f64,
        /// Upper integration bound
        b: f64,
    },

    /// Adaptive refinement exhausted its subdivision budget above tolerance.
    #[error("Tolerance {tolerance:e} not reached (best estimate error {achieved:e})")]
    ToleranceNotReached {
        /// Requested absolute tolerance
        tolerance: f64,
        /// Error estimate of the best available result
        achieved: f64,
    },

    /// The integrand evaluated to a non-finite value.
    #[error("Integrand is not finite at x = {x}")]
    NonFiniteIntegrand {
        /// Abscissa where the integrand failed
        x: f64,
    },
}

/// Failures of the spectral fit and its evaluation.
///
/// # Variants
/// - `OutOfBounds`: Query point outside the fitted interval
/// - `InsufficientData`: Too few samples for the requested fit
/// - `InvalidInput`: Degenerate interval or non-finite samples
///
/// # Examples
/// ```
/// use pricer_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 2.0, min: 0.0, max: 1.0 };
/// assert!(format!("{}", err).contains("outside fitted interval"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside the fitted interval.
    #[error("Point {x} outside fitted interval [{min}, {max}]")]
    OutOfBounds {
        /// Query point
        x: f64,
        /// Lower edge of the fitted interval
        min: f64,
        /// Upper edge of the fitted interval
        max: f64,
    },

    /// Too few samples for the requested fit.
    #[error("Need at least {need} samples, got {got}")]
    InsufficientData {
        /// Number of samples provided
        got: usize,
        /// Minimum number of samples required
        need: usize,
    },

    /// Degenerate interval or non-finite sample values.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
