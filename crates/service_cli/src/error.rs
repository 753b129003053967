//! CLI error types.

use pricer_pricing::PricingError;
use thiserror::Error;

/// Errors surfaced by the CLI layer.
#[derive(Error, Debug)]
pub enum CliError {
    /// An argument combination the CLI cannot act on.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A pricing-layer failure, passed through unchanged.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Output serialisation failure.
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
