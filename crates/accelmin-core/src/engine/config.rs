use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Step size must be a positive finite number, got {0}")]
    InvalidStepSize(f64),

    #[error("Energy tolerance must be a non-negative finite number, got {0}")]
    InvalidTolerance(f64),

    #[error("An uncapped run needs a positive energy tolerance to terminate")]
    UnboundedWithoutTolerance,

    #[error("Invalid L-BFGS setting '{name}': {reason}")]
    InvalidLbfgs { name: &'static str, reason: String },
}

/// Parameters of one minimization run, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerConfig {
    /// Unitless scale factor applied to the force in first-order rules.
    pub step_size: f64,
    /// Iteration cap. `None` runs until the energy tolerance is met.
    pub max_iterations: Option<usize>,
    /// Stop early once `|E_k - E_{k-1}|` drops below this value.
    pub energy_tolerance: Option<f64>,
}

impl MinimizerConfig {
    /// A plain iteration budget, as used by the momentum rule.
    pub fn fixed_iterations(step_size: f64, iterations: usize) -> Self {
        Self {
            step_size,
            max_iterations: Some(iterations),
            energy_tolerance: None,
        }
    }

    /// Tolerance-driven run; a `max_iterations` of zero means no cap.
    pub fn with_tolerance(step_size: f64, energy_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            step_size,
            max_iterations: (max_iterations > 0).then_some(max_iterations),
            energy_tolerance: Some(energy_tolerance),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(ConfigError::InvalidStepSize(self.step_size));
        }
        if let Some(tol) = self.energy_tolerance {
            if !(tol.is_finite() && tol >= 0.0) {
                return Err(ConfigError::InvalidTolerance(tol));
            }
        }
        // `|dE| < 0` never holds, so a zero tolerance cannot end an uncapped run.
        if self.max_iterations.is_none() && !self.energy_tolerance.is_some_and(|tol| tol > 0.0) {
            return Err(ConfigError::UnboundedWithoutTolerance);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LbfgsConfig {
    /// Number of `(s, y)` correction pairs kept in the history.
    pub memory_size: usize,
    /// The rule reports convergence once the RMS gradient falls below this value.
    pub gradient_rms_tolerance: f64,
    /// Armijo sufficient-decrease parameter.
    pub line_search_c1: f64,
    pub line_search_min_step: f64,
    pub line_search_max_iter: u32,
    /// Largest distance any particle may move on the first line-search trial.
    /// Zero disables the limit.
    pub max_displacement: f64,
}

impl Default for LbfgsConfig {
    fn default() -> Self {
        Self {
            memory_size: 8,
            gradient_rms_tolerance: 1e-4,
            line_search_c1: 1e-4,
            line_search_min_step: 1e-16,
            line_search_max_iter: 40,
            max_displacement: 0.3,
        }
    }
}

impl LbfgsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_size == 0 {
            return Err(ConfigError::InvalidLbfgs {
                name: "memory_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.line_search_c1 > 0.0 && self.line_search_c1 < 1.0) {
            return Err(ConfigError::InvalidLbfgs {
                name: "line_search_c1",
                reason: format!("must lie in (0, 1), got {}", self.line_search_c1),
            });
        }
        if !(self.max_displacement >= 0.0) {
            return Err(ConfigError::InvalidLbfgs {
                name: "max_displacement",
                reason: format!("must be non-negative, got {}", self.max_displacement),
            });
        }
        if !(self.gradient_rms_tolerance >= 0.0) {
            return Err(ConfigError::InvalidLbfgs {
                name: "gradient_rms_tolerance",
                reason: format!("must be non-negative, got {}", self.gradient_rms_tolerance),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MinimizerConfigBuilder {
    step_size: Option<f64>,
    max_iterations: Option<usize>,
    unbounded: bool,
    energy_tolerance: Option<f64>,
}

impl MinimizerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_size(mut self, step_size: f64) -> Self {
        self.step_size = Some(step_size);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self.unbounded = false;
        self
    }
    pub fn unbounded(mut self) -> Self {
        self.max_iterations = None;
        self.unbounded = true;
        self
    }
    pub fn energy_tolerance(mut self, tolerance: f64) -> Self {
        self.energy_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<MinimizerConfig, ConfigError> {
        let max_iterations = if self.unbounded {
            None
        } else {
            Some(
                self.max_iterations
                    .ok_or(ConfigError::MissingParameter("max_iterations"))?,
            )
        };
        let config = MinimizerConfig {
            step_size: self
                .step_size
                .ok_or(ConfigError::MissingParameter("step_size"))?,
            max_iterations,
            energy_tolerance: self.energy_tolerance,
        };
        config.validate()?;
        Ok(config)
    }
}
