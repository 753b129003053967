//! # pricer_core: Numerical Foundation for Boundary Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Standard normal distribution functions (`math::normal`)
//! - Numerical quadrature: trapezoid, adaptive Gauss-Lobatto with an
//!   adaptive Simpson fallback (`math::quadrature`)
//! - Chebyshev collocation: fit, Clenshaw evaluation, differentiation
//!   (`math::chebyshev`)
//! - Root-finding solvers: Super-Halley and bisection (`math::solvers`)
//! - Isotonic regression via Pool-Adjacent-Violators (`math::isotonic`)
//! - Error types: `SolverError`, `QuadratureError`, `InterpolationError`
//!   (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - statrs: erf/erfc special functions backing the normal CDF
//! - thiserror: Structured error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::normal::{norm_cdf, norm_pdf};
//! use pricer_core::math::solvers::{SolverConfig, SuperHalleySolver};
//!
//! // Normal distribution
//! assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
//! assert!((norm_pdf(0.0) - 0.3989422804014327).abs() < 1e-15);
//!
//! // Cube root of 2 via Super-Halley
//! let solver = SuperHalleySolver::new(SolverConfig::default());
//! let root = solver
//!     .find_root(
//!         |x: f64| x * x * x - 2.0,
//!         |x: f64| 3.0 * x * x,
//!         |x: f64| 6.0 * x,
//!         1.0,
//!     )
//!     .unwrap();
//! assert!((root - 2.0_f64.powf(1.0 / 3.0)).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
