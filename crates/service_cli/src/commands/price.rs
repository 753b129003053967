//! Price command implementation
//!
//! Prices a single American option through the pricer_pricing engine
//! and renders the result with its convergence diagnostics.

use serde::Serialize;
use tracing::info;

use crate::{CliError, Result};
use pricer_pricing::engine::AmericanOptionEngine;

/// JSON-facing summary of a pricing result.
#[derive(Serialize)]
struct PriceSummary {
    price: f64,
    european_price: f64,
    early_exercise_premium: f64,
    regime: String,
    critical_volatility: Option<f64>,
    crossing_time: Option<f64>,
    iterations_used: usize,
    final_residual: f64,
    converged: bool,
    spurious_root_discarded: bool,
}

/// Run the price command
#[allow(clippy::too_many_arguments)]
pub fn run(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    div_yield: f64,
    vol: f64,
    call: bool,
    format: &str,
) -> Result<()> {
    let params = super::build_params(spot, strike, maturity, rate, div_yield, vol, call)?;
    info!("Pricing {} S={} K={} T={}", params.side, spot, strike, maturity);

    let engine = AmericanOptionEngine::with_defaults();
    let result = engine.price(&params)?;

    let summary = PriceSummary {
        price: result.price,
        european_price: result.european_price,
        early_exercise_premium: result.early_exercise_premium,
        regime: result.regime.to_string(),
        critical_volatility: result.critical_volatility,
        crossing_time: result.crossing_time,
        iterations_used: result.iterations_used,
        final_residual: result.final_residual,
        converged: result.converged,
        spurious_root_discarded: result.spurious_root_discarded,
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "table" => {
            println!("┌──────────────────────────┬──────────────┐");
            println!("│ price                    │ {:>12.6} │", summary.price);
            println!("│ european                 │ {:>12.6} │", summary.european_price);
            println!("│ premium                  │ {:>12.6} │", summary.early_exercise_premium);
            println!("│ regime                   │ {:>12} │", short(&summary.regime));
            println!("│ iterations               │ {:>12} │", summary.iterations_used);
            println!("│ residual                 │ {:>12.2e} │", summary.final_residual);
            println!("│ converged                │ {:>12} │", summary.converged);
            println!("└──────────────────────────┴──────────────┘");
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            )));
        }
    }

    info!("Pricing complete");
    Ok(())
}

/// Abbreviate long regime names for the fixed-width table.
fn short(regime: &str) -> &str {
    match regime {
        "double-boundary-negative-rates" => "double-bdry",
        "single-boundary-negative-dividend" => "single-negq",
        "single-boundary" => "single-bdry",
        "no-early-exercise" => "european",
        other => other,
    }
}
