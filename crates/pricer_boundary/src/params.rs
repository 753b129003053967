//! Market parameters for a single American option pricing request.

use crate::error::PricingError;

/// Option side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionSide {
    /// Right to sell at the strike.
    Put,
    /// Right to buy at the strike.
    Call,
}

impl std::fmt::Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionSide::Put => write!(f, "put"),
            OptionSide::Call => write!(f, "call"),
        }
    }
}

/// Immutable market parameters for one pricing request.
///
/// Constructed once through [`new`], which enforces the economic bounds
/// below and **never** clamps: out-of-range inputs are rejected with
/// [`PricingError::InvalidParameters`].
///
/// | Field | Bounds |
/// |-------|--------|
/// | `spot` | > 0, finite |
/// | `strike` | > 0, finite |
/// | `maturity` | (1e-6, 30] years |
/// | `rate` | [-0.5, 0.5] |
/// | `dividend_yield` | [-0.5, 0.5] |
/// | `volatility` | [0.001, 5.0] |
///
/// The `with_*` helpers rebuild a bumped copy through the same
/// validation, which is what the bump-and-reprice Greeks use.
///
/// # Examples
/// ```
/// use pricer_boundary::params::{MarketParameters, OptionSide};
///
/// let params = MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
/// assert_eq!(params.strike, 40.0);
///
/// let bumped = params.with_spot(36.36).unwrap();
/// assert_eq!(bumped.spot, 36.36);
/// assert_eq!(bumped.strike, params.strike);
/// ```
///
/// [`new`]: MarketParameters::new
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketParameters {
    /// Current underlying price.
    pub spot: f64,
    /// Exercise price.
    pub strike: f64,
    /// Time to expiry in years.
    pub maturity: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Continuous dividend yield.
    pub dividend_yield: f64,
    /// Annualised lognormal volatility.
    pub volatility: f64,
    /// Put or call.
    pub side: OptionSide,
}

impl MarketParameters {
    /// Create validated market parameters.
    ///
    /// # Arguments
    ///
    /// * `spot` - Underlying price (must be positive and finite)
    /// * `strike` - Exercise price (must be positive and finite)
    /// * `maturity` - Time to expiry in years, in (1e-6, 30]
    /// * `rate` - Risk-free rate, in [-0.5, 0.5]
    /// * `dividend_yield` - Dividend yield, in [-0.5, 0.5]
    /// * `volatility` - Volatility, in [0.001, 5.0]
    /// * `side` - Put or call
    ///
    /// # Returns
    ///
    /// * `Err(PricingError::InvalidParameters)` - any bound violated
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        dividend_yield: f64,
        volatility: f64,
        side: OptionSide,
    ) -> Result<Self, PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidParameters(format!(
                "spot must be positive and finite, got {}",
                spot
            )));
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::InvalidParameters(format!(
                "strike must be positive and finite, got {}",
                strike
            )));
        }
        if !(1e-6..=30.0).contains(&maturity) || maturity == 1e-6 {
            return Err(PricingError::InvalidParameters(format!(
                "maturity must be in (1e-6, 30] years, got {}",
                maturity
            )));
        }
        if !(-0.5..=0.5).contains(&rate) {
            return Err(PricingError::InvalidParameters(format!(
                "rate must be in [-0.5, 0.5], got {}",
                rate
            )));
        }
        if !(-0.5..=0.5).contains(&dividend_yield) {
            return Err(PricingError::InvalidParameters(format!(
                "dividend yield must be in [-0.5, 0.5], got {}",
                dividend_yield
            )));
        }
        if !(0.001..=5.0).contains(&volatility) {
            return Err(PricingError::InvalidParameters(format!(
                "volatility must be in [0.001, 5.0], got {}",
                volatility
            )));
        }
        Ok(Self {
            spot,
            strike,
            maturity,
            rate,
            dividend_yield,
            volatility,
            side,
        })
    }

    /// Rebuild with a different spot, revalidating.
    pub fn with_spot(&self, spot: f64) -> Result<Self, PricingError> {
        Self::new(
            spot,
            self.strike,
            self.maturity,
            self.rate,
            self.dividend_yield,
            self.volatility,
            self.side,
        )
    }

    /// Rebuild with a different volatility, revalidating.
    pub fn with_volatility(&self, volatility: f64) -> Result<Self, PricingError> {
        Self::new(
            self.spot,
            self.strike,
            self.maturity,
            self.rate,
            self.dividend_yield,
            volatility,
            self.side,
        )
    }

    /// Rebuild with a different rate, revalidating.
    pub fn with_rate(&self, rate: f64) -> Result<Self, PricingError> {
        Self::new(
            self.spot,
            self.strike,
            self.maturity,
            rate,
            self.dividend_yield,
            self.volatility,
            self.side,
        )
    }

    /// Rebuild with a different maturity, revalidating.
    pub fn with_maturity(&self, maturity: f64) -> Result<Self, PricingError> {
        Self::new(
            self.spot,
            self.strike,
            maturity,
            self.rate,
            self.dividend_yield,
            self.volatility,
            self.side,
        )
    }

    /// The symmetric put problem that prices this call.
    ///
    /// McDonald-Schroder symmetry: `C(S, K, r, q) = (S/K) · P(K²/S, K, q, r)`.
    /// Boundaries map back through `B_call(τ) = K² / B_put(τ)`.
    ///
    /// Returns an error when called on a put, or when the transformed
    /// spot `K²/S` leaves the validated domain.
    pub fn to_symmetric_put(&self) -> Result<Self, PricingError> {
        if self.side != OptionSide::Call {
            return Err(PricingError::InvalidParameters(
                "symmetry transform applies to calls only".to_string(),
            ));
        }
        Self::new(
            self.strike * self.strike / self.spot,
            self.strike,
            self.maturity,
            self.dividend_yield,
            self.rate,
            self.volatility,
            OptionSide::Put,
        )
    }
}
