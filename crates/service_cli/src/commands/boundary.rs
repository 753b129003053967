//! Boundary command implementation
//!
//! Computes the exercise-boundary functions and dumps them on an
//! evenly spaced time grid.

use serde::Serialize;
use tracing::info;

use crate::{CliError, Result};
use pricer_pricing::engine::AmericanOptionEngine;

#[derive(Serialize)]
struct BoundaryRow {
    tau: f64,
    upper: Option<f64>,
    lower: Option<f64>,
}

/// Run the boundary command
#[allow(clippy::too_many_arguments)]
pub fn run(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    div_yield: f64,
    vol: f64,
    call: bool,
    samples: usize,
    format: &str,
) -> Result<()> {
    if samples < 2 {
        return Err(CliError::InvalidArgument(
            "samples must be at least 2".to_string(),
        ));
    }
    let params = super::build_params(spot, strike, maturity, rate, div_yield, vol, call)?;
    info!("Computing boundaries for {} T={}", params.side, maturity);

    let engine = AmericanOptionEngine::with_defaults();
    let result = engine.price(&params)?;

    let live = result.crossing_time.unwrap_or(maturity);
    let mut rows = Vec::with_capacity(samples);
    for i in 0..samples {
        let tau = live * i as f64 / (samples - 1) as f64;
        let upper = result
            .upper_boundary
            .as_ref()
            .and_then(|b| b.evaluate(tau).ok());
        let lower = result
            .lower_boundary
            .as_ref()
            .and_then(|b| b.evaluate(tau).ok());
        rows.push(BoundaryRow { tau, upper, lower });
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        "table" => {
            println!("┌────────────┬────────────┬────────────┐");
            println!("│ tau        │ upper      │ lower      │");
            println!("├────────────┼────────────┼────────────┤");
            for row in &rows {
                println!(
                    "│ {:>10.4} │ {:>10} │ {:>10} │",
                    row.tau,
                    cell(row.upper),
                    cell(row.lower)
                );
            }
            println!("└────────────┴────────────┴────────────┘");
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            )));
        }
    }
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}
