//! # pricer_pricing: American Option Pricing Orchestrator
//!
//! ## Layer 3 (Pricing) Role
//!
//! pricer_pricing composes the boundary engine into prices:
//!
//! - `premium`: early-exercise premium quadrature over the boundary
//!   functions (adaptive Gauss-Lobatto with a Simpson fallback)
//! - `engine`: the `AmericanOptionEngine` orchestrator — classify →
//!   approximate → refine → integrate → assemble a [`PricingResult`]
//! - `greeks`: bump-and-reprice Greeks; every bump is an independent
//!   pricing call, so the sweep runs in parallel with rayon
//! - `result`: immutable pricing result with convergence diagnostics
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_boundary::{EngineConfig, MarketParameters, OptionSide};
//! use pricer_pricing::engine::AmericanOptionEngine;
//!
//! let params =
//!     MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
//! let engine = AmericanOptionEngine::with_defaults();
//! let result = engine.price(&params).unwrap();
//!
//! // The American put dominates its European counterpart.
//! assert!(result.price >= result.european_price);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod engine;
pub mod greeks;
pub mod premium;
pub mod result;

pub use engine::AmericanOptionEngine;
pub use greeks::{compute_greeks, Greeks, GreeksConfig};
pub use result::PricingResult;

// The error type is shared with the boundary layer.
pub use pricer_boundary::PricingError;
