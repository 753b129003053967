//! Root-finding solvers for the boundary engine.
//!
//! This module provides the two root finders the boundary computation
//! needs:
//!
//! - [`SuperHalleySolver`]: third-order iteration (function plus first
//!   and second derivative) for the QD+ characteristic equation, with a
//!   Newton fallback step when the Super-Halley factor degenerates
//! - [`BisectionSolver`]: robust bracketing for coarse targets such as
//!   the boundary crossing time
//!
//! Both share [`SolverConfig`] for tolerance and iteration budget.
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::solvers::{SolverConfig, SuperHalleySolver};
//!
//! let solver = SuperHalleySolver::new(SolverConfig::default());
//!
//! // Solve x² - 2 = 0 (find √2)
//! let root = solver
//!     .find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, |_x: f64| 2.0, 1.0)
//!     .unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod bisection;
mod config;
mod super_halley;

// Re-export public types at module level
pub use bisection::BisectionSolver;
pub use config::SolverConfig;
pub use super_halley::SuperHalleySolver;
