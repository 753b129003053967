//! # pricer_boundary: American Exercise-Boundary Engine
//!
//! ## Layer 2 (Engine) Role
//!
//! pricer_boundary turns market parameters into exercise-boundary
//! functions. American puts and calls under negative rates can carry
//! **two** moving boundaries (an exercise band instead of a half-line),
//! and this crate owns the whole computation:
//!
//! - `regime`: classify (rate, dividend, volatility, side) into one of
//!   five exercise regimes, including the double-boundary negative-rate
//!   regime and its critical volatility
//! - `black_scholes`: closed-form European kernel consumed by both
//!   approximation stages
//! - `qdplus`: closed-form-seeded QD+ estimate of the boundary pair at
//!   valuation, refined by a Super-Halley root finder
//! - `kim`: FP-B′ stabilized fixed-point solution of the Kim integral
//!   equation producing the full time profile of both boundaries
//! - `spectral`: variance-stabilized Chebyshev representation of a
//!   finalized boundary profile
//!
//! The engine works in the put orientation internally; the pricing layer
//! maps calls through put-call symmetry.
//!
//! ## Configuration
//!
//! Every tunable (grid size, tolerances, iteration caps, node counts,
//! damping) lives in [`EngineConfig`] and is threaded explicitly through
//! each call; there is no global state.
//!
//! [`EngineConfig`]: config::EngineConfig

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod black_scholes;
pub mod config;
pub mod error;
pub mod kim;
pub mod params;
pub mod qdplus;
pub mod regime;
pub mod spectral;

pub use config::EngineConfig;
pub use error::PricingError;
pub use kim::{refine_boundaries, BoundarySample, RefinedBoundaries};
pub use params::{MarketParameters, OptionSide};
pub use qdplus::{approximate_boundaries, BoundarySeeds};
pub use regime::{classify_regime, critical_volatility, ExerciseRegime};
pub use spectral::BoundaryFunction;
