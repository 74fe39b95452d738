//! Optimizer hyperparameters.
//!
//! Defaults match the parameter set the scheduling dashboard ships
//! with: a small population over a 30-day horizon with bounds exactly
//! bracketing the shift-code domain.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Water Wave Optimization hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WwoConfig {
    /// Number of waves in the population.
    pub population: usize,
    /// Number of optimization iterations.
    pub iterations: usize,
    /// Initial wave height: consecutive non-improving iterations
    /// tolerated before refraction.
    pub hmax: u32,
    /// Initial wavelength (propagation step-size coefficient).
    pub lambda: f64,
    /// Base of the end-of-iteration wavelength update.
    pub alpha: f64,
    /// Smoothing term guarding zero denominators.
    pub epsilon: f64,
    /// Breaking perturbation scale at iteration 0.
    pub beta_max: f64,
    /// Breaking perturbation scale at the final iteration.
    pub beta_min: f64,
    /// Exclusive upper bound on the breaking dimension count.
    pub k_max: usize,
    /// Upper coordinate bound; must sit at or above the top shift code.
    pub upper_bound: f64,
    /// Lower coordinate bound; must sit at or below the bottom shift code.
    pub lower_bound: f64,
}

impl Default for WwoConfig {
    fn default() -> Self {
        Self {
            population: 10,
            iterations: 10,
            hmax: 6,
            lambda: 0.5,
            alpha: 1.001,
            epsilon: 1e-31,
            beta_max: 0.01,
            beta_min: 0.001,
            k_max: 12,
            upper_bound: 3.0,
            lower_bound: 0.0,
        }
    }
}

impl WwoConfig {
    /// Sets the population size.
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the initial wave height.
    pub fn with_hmax(mut self, hmax: u32) -> Self {
        self.hmax = hmax;
        self
    }

    /// Sets the initial wavelength.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the breaking perturbation scale range.
    pub fn with_beta_range(mut self, beta_min: f64, beta_max: f64) -> Self {
        self.beta_min = beta_min;
        self.beta_max = beta_max;
        self
    }

    /// Span of the coordinate domain.
    #[inline]
    pub fn bound_span(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Fails fast on malformed hyperparameters.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.population == 0 {
            return Err(ScheduleError::configuration("population must be positive"));
        }
        if self.iterations == 0 {
            return Err(ScheduleError::configuration("iterations must be positive"));
        }
        if self.hmax == 0 {
            return Err(ScheduleError::configuration("hmax must be positive"));
        }
        if self.lambda <= 0.0 {
            return Err(ScheduleError::configuration("lambda must be positive"));
        }
        if self.alpha <= 0.0 {
            return Err(ScheduleError::configuration("alpha must be positive"));
        }
        if self.epsilon <= 0.0 {
            return Err(ScheduleError::configuration("epsilon must be positive"));
        }
        if self.beta_min < 0.0 || self.beta_min > self.beta_max {
            return Err(ScheduleError::configuration(format!(
                "beta range must satisfy 0 <= beta_min <= beta_max, got [{}, {}]",
                self.beta_min, self.beta_max
            )));
        }
        if self.k_max < 2 {
            return Err(ScheduleError::configuration("k_max must be at least 2"));
        }
        if self.upper_bound <= self.lower_bound {
            return Err(ScheduleError::configuration(format!(
                "bounds must satisfy lower < upper, got [{}, {}]",
                self.lower_bound, self.upper_bound
            )));
        }
        // The bounds must bracket the 0-3 code domain or the decode
        // step can never reach every shift.
        if self.lower_bound > 0.0 || self.upper_bound < 3.0 {
            return Err(ScheduleError::configuration(format!(
                "bounds [{}, {}] do not bracket the shift code domain [0, 3]",
                self.lower_bound, self.upper_bound
            )));
        }
        Ok(())
    }
}
