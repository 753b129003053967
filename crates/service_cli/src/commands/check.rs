//! Check command implementation
//!
//! Runs the default engine configuration against a reference case and
//! reports whether the solver stack converges on this machine.

use tracing::info;

use crate::Result;
use pricer_boundary::{EngineConfig, MarketParameters, OptionSide};
use pricer_pricing::engine::AmericanOptionEngine;

/// Run the check command
pub fn run() -> Result<()> {
    info!("Checking engine configuration...");

    let config = EngineConfig::default();
    config.validate()?;
    println!("configuration      ok");

    let engine = AmericanOptionEngine::new(config)?;

    let single =
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put)?;
    let result = engine.price(&single)?;
    println!(
        "single boundary    ok (price {:.6}, converged {})",
        result.price, result.converged
    );

    let double =
        MarketParameters::new(100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put)?;
    let result = engine.price(&double)?;
    println!(
        "double boundary    ok (price {:.6}, {} iterations, residual {:.2e})",
        result.price, result.iterations_used, result.final_residual
    );

    info!("Check complete");
    Ok(())
}
