//! American CLI - Command Line Operations for Boundary Pricing
//!
//! This is the operational entry point for the American option
//! double-boundary pricing library.
//!
//! # Commands
//!
//! - `american price` - Price one American option and report diagnostics
//! - `american boundary` - Dump the computed exercise-boundary profiles
//! - `american check` - Check the solver configuration on a reference case
//!
//! # Architecture
//!
//! As the service layer, this crate only parses arguments, initialises
//! logging, and renders results; every numerical decision lives in the
//! pricer crates.

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Market inputs shared by the pricing subcommands.
#[derive(Args)]
struct MarketArgs {
    /// Underlying spot price
    #[arg(long)]
    spot: f64,

    /// Strike price
    #[arg(long)]
    strike: f64,

    /// Time to expiry in years
    #[arg(long)]
    maturity: f64,

    /// Risk-free rate (continuously compounded)
    #[arg(long)]
    rate: f64,

    /// Continuous dividend yield
    #[arg(long, default_value = "0.0")]
    div_yield: f64,

    /// Annualised volatility
    #[arg(long)]
    vol: f64,

    /// Price a call instead of a put
    #[arg(long)]
    call: bool,
}

/// American option boundary-pricing CLI
#[derive(Parser)]
#[command(name = "american")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an American option
    Price {
        #[command(flatten)]
        market: MarketArgs,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compute and dump the exercise-boundary profiles
    Boundary {
        #[command(flatten)]
        market: MarketArgs,

        /// Number of output samples per boundary
        #[arg(short, long, default_value = "21")]
        samples: usize,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check solver configuration against a reference case
    Check,
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Price { market, format } => commands::price::run(
            market.spot,
            market.strike,
            market.maturity,
            market.rate,
            market.div_yield,
            market.vol,
            market.call,
            &format,
        ),
        Commands::Boundary {
            market,
            samples,
            format,
        } => commands::boundary::run(
            market.spot,
            market.strike,
            market.maturity,
            market.rate,
            market.div_yield,
            market.vol,
            market.call,
            samples,
            &format,
        ),
        Commands::Check => commands::check::run(),
    }
}
