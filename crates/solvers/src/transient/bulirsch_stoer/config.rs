use thiserror::Error;

/// Configuration for the Bulirsch–Stoer integrator.
///
/// The defaults are the tolerances and starting step used by the double
/// pendulum simulation: `1e-14` absolute and relative error, a `0.01` initial
/// step guess, and at most 500 consecutive rejected trial steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    abs_tol: f64,
    rel_tol: f64,
    initial_step: f64,
    max_rejected_steps: usize,
}

/// Errors that can occur when validating a Bulirsch–Stoer config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("abs_tol must be finite and non-negative")]
    AbsTol,

    #[error("rel_tol must be finite and non-negative")]
    RelTol,

    #[error("initial_step must be finite and positive")]
    InitialStep,

    #[error("max_rejected_steps must be at least 1")]
    MaxRejectedSteps,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abs_tol: 1.0e-14,
            rel_tol: 1.0e-14,
            initial_step: 0.01,
            max_rejected_steps: 500,
        }
    }
}

impl Config {
    /// Creates a new config with validated tolerances and step settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite, if the
    /// initial step is not a positive finite number, or if
    /// `max_rejected_steps` is zero.
    pub fn new(
        abs_tol: f64,
        rel_tol: f64,
        initial_step: f64,
        max_rejected_steps: usize,
    ) -> Result<Self, ConfigError> {
        if !abs_tol.is_finite() || abs_tol < 0.0 {
            return Err(ConfigError::AbsTol);
        }
        if !rel_tol.is_finite() || rel_tol < 0.0 {
            return Err(ConfigError::RelTol);
        }
        if !initial_step.is_finite() || initial_step <= 0.0 {
            return Err(ConfigError::InitialStep);
        }
        if max_rejected_steps == 0 {
            return Err(ConfigError::MaxRejectedSteps);
        }

        Ok(Self {
            abs_tol,
            rel_tol,
            initial_step,
            max_rejected_steps,
        })
    }

    /// Returns the absolute error tolerance.
    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Returns the relative error tolerance.
    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Returns the magnitude of the first trial step.
    #[must_use]
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    /// Returns how many consecutive rejected trial steps are tolerated before
    /// the integration gives up.
    #[must_use]
    pub fn max_rejected_steps(&self) -> usize {
        self.max_rejected_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        let rebuilt = Config::new(
            config.abs_tol(),
            config.rel_tol(),
            config.initial_step(),
            config.max_rejected_steps(),
        );
        assert_eq!(rebuilt, Ok(config));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(Config::new(-1.0, 1e-6, 0.1, 10), Err(ConfigError::AbsTol));
        assert_eq!(Config::new(1e-6, f64::NAN, 0.1, 10), Err(ConfigError::RelTol));
        assert_eq!(Config::new(1e-6, 1e-6, 0.0, 10), Err(ConfigError::InitialStep));
        assert_eq!(
            Config::new(1e-6, 1e-6, f64::INFINITY, 10),
            Err(ConfigError::InitialStep)
        );
        assert_eq!(
            Config::new(1e-6, 1e-6, 0.1, 0),
            Err(ConfigError::MaxRejectedSteps)
        );
    }
}
