//! Engine configuration.

use crate::error::PricingError;

/// Tunables for the boundary engine, threaded explicitly through every
/// call.
///
/// There are no process-wide constants: two engines with different
/// configurations can run side by side, and sensitivity sweeps can
/// share one immutable config across threads.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `grid_size` | 32 | Collocation points on the time grid |
/// | `fixed_point_tolerance` | 1e-6 | FP-B′ stopping tolerance (relative to strike) |
/// | `max_fixed_point_iterations` | 100 | FP-B′ iteration budget |
/// | `integration_panels` | 64 | Trapezoid panels inside the Kim integrands |
/// | `premium_tolerance` | 1e-9 | Adaptive quadrature tolerance for the premium |
/// | `damping_threshold` | 0.03 | Max relative per-iteration boundary move |
/// | `crossing_resolution` | 5e-3 | Bisection resolution for the crossing time |
///
/// # Examples
///
/// ```
/// use pricer_boundary::config::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_grid_size(48)
///     .with_fixed_point_tolerance(1e-7);
/// assert_eq!(config.grid_size, 48);
/// config.validate().unwrap();
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of collocation points on the time-to-expiry grid.
    pub grid_size: usize,

    /// Stopping tolerance for the FP-B′ iteration, measured as the
    /// maximum per-point move divided by the strike.
    pub fixed_point_tolerance: f64,

    /// Iteration budget for the FP-B′ loop. Exhaustion is non-fatal:
    /// the best iterate is returned with its residual.
    pub max_fixed_point_iterations: usize,

    /// Trapezoid panels for the integrals inside the Kim fixed-point
    /// expressions.
    pub integration_panels: usize,

    /// Absolute tolerance for the adaptive premium quadrature.
    pub premium_tolerance: f64,

    /// Largest relative move a boundary point may take in one
    /// iteration; larger proposals are capped at this fraction.
    pub damping_threshold: f64,

    /// Time resolution of the bisection refinement of the boundary
    /// crossing time.
    pub crossing_resolution: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 32,
            fixed_point_tolerance: 1e-6,
            max_fixed_point_iterations: 100,
            integration_panels: 64,
            premium_tolerance: 1e-9,
            damping_threshold: 0.03,
            crossing_resolution: 5e-3,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collocation grid size.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Sets the fixed-point stopping tolerance.
    pub fn with_fixed_point_tolerance(mut self, tolerance: f64) -> Self {
        self.fixed_point_tolerance = tolerance;
        self
    }

    /// Sets the fixed-point iteration budget.
    pub fn with_max_fixed_point_iterations(mut self, iterations: usize) -> Self {
        self.max_fixed_point_iterations = iterations;
        self
    }

    /// Sets the trapezoid panel count for the Kim integrands.
    pub fn with_integration_panels(mut self, panels: usize) -> Self {
        self.integration_panels = panels;
        self
    }

    /// Sets the adaptive premium quadrature tolerance.
    pub fn with_premium_tolerance(mut self, tolerance: f64) -> Self {
        self.premium_tolerance = tolerance;
        self
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// * `Err(PricingError::InvalidParameters)` - a tunable is outside
    ///   its workable range
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.grid_size < 8 {
            return Err(PricingError::InvalidParameters(
                "grid_size must be at least 8".to_string(),
            ));
        }
        if self.fixed_point_tolerance <= 0.0 {
            return Err(PricingError::InvalidParameters(
                "fixed_point_tolerance must be positive".to_string(),
            ));
        }
        if self.max_fixed_point_iterations == 0 {
            return Err(PricingError::InvalidParameters(
                "max_fixed_point_iterations must be > 0".to_string(),
            ));
        }
        if self.integration_panels < 50 {
            return Err(PricingError::InvalidParameters(
                "integration_panels must be at least 50".to_string(),
            ));
        }
        if self.premium_tolerance <= 0.0 {
            return Err(PricingError::InvalidParameters(
                "premium_tolerance must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.damping_threshold) || self.damping_threshold == 0.0 {
            return Err(PricingError::InvalidParameters(
                "damping_threshold must be in (0, 1)".to_string(),
            ));
        }
        if self.crossing_resolution <= 0.0 || self.crossing_resolution >= 1e-2 {
            return Err(PricingError::InvalidParameters(
                "crossing_resolution must be in (0, 1e-2)".to_string(),
            ));
        }
        Ok(())
    }
}
