//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod boundary;
pub mod check;
pub mod price;

use pricer_boundary::{MarketParameters, OptionSide};

use crate::Result;

/// Build validated market parameters from raw CLI inputs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_params(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    div_yield: f64,
    vol: f64,
    call: bool,
) -> Result<MarketParameters> {
    let side = if call { OptionSide::Call } else { OptionSide::Put };
    Ok(MarketParameters::new(
        spot, strike, maturity, rate, div_yield, vol, side,
    )?)
}
