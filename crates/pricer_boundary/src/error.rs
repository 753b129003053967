//! Error types for boundary computation and pricing.

use crate::regime::ExerciseRegime;
use pricer_core::types::{InterpolationError, QuadratureError, SolverError};
use thiserror::Error;

/// Categorised pricing errors.
///
/// Only terminal failures become errors. Locally recoverable conditions
/// (near-zero denominators, spurious roots, exhausted fixed-point
/// budgets, transient ordering violations) are handled in place by the
/// component that detects them and surface as diagnostics on the result
/// instead.
///
/// # Variants
/// - `InvalidParameters`: Inputs violate economic bounds; never clamped
/// - `UnsupportedRegime`: Degenerate or unimplemented regime combination
/// - `Solver`: A root-finding step failed beyond local recovery
/// - `Quadrature`: Numerical integration failed beyond local recovery
/// - `Interpolation`: Spectral fitting or evaluation failed
///
/// # Examples
/// ```
/// use pricer_boundary::error::PricingError;
///
/// let err = PricingError::InvalidParameters("spot must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid parameters: spot must be positive");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Invalid market parameters or configuration.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Pricing cannot proceed in this exercise regime.
    #[error("Unsupported exercise regime: {0}")]
    UnsupportedRegime(ExerciseRegime),

    /// Root-finding failure that no local fallback could absorb.
    #[error("Solver failure: {0}")]
    Solver(#[from] SolverError),

    /// Quadrature failure that no local fallback could absorb.
    #[error("Quadrature failure: {0}")]
    Quadrature(#[from] QuadratureError),

    /// Spectral fit or evaluation failure.
    #[error("Interpolation failure: {0}")]
    Interpolation(#[from] InterpolationError),
}
