//! Numerical building blocks for the boundary-pricing engine.
//!
//! This module provides:
//! - `normal`: Standard normal pdf/cdf accurate deep into the tails
//! - `quadrature`: Trapezoid and adaptive Gauss-Lobatto integration
//! - `chebyshev`: Chebyshev-Gauss-Lobatto collocation and Clenshaw evaluation
//! - `solvers`: Super-Halley and bisection root finders
//! - `isotonic`: Pool-Adjacent-Violators isotonic regression

pub mod chebyshev;
pub mod isotonic;
pub mod normal;
pub mod quadrature;
pub mod solvers;
