//! Annealing schedule.

use crate::error::{QuboError, Result};

/// Geometric annealing schedule: `T_{k+1} = alpha * T_k`, with
/// `iterations_per_temperature` proposals at every level.
///
/// # Examples
///
/// ```
/// use u_qubo::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(10.0)
///     .with_min_temperature(0.01)
///     .with_alpha(0.9)
///     .with_iterations_per_temperature(20);
/// assert!(config.validate().is_ok());
/// assert!(config.with_alpha(1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SaConfig {
    /// Temperature of the first level.
    pub initial_temperature: f64,

    /// Annealing stops once the temperature falls to or below this value.
    pub min_temperature: f64,

    /// Cooling factor in (0, 1).
    pub alpha: f64,

    /// Proposals evaluated at each temperature level.
    pub iterations_per_temperature: usize,

    /// Hard budget on proposals. 0 = no limit.
    pub max_iterations: usize,

    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            alpha: 0.95,
            iterations_per_temperature: 100,
            max_iterations: 0,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of temperature levels the schedule visits, ignoring the
    /// iteration budget.
    pub fn levels(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut levels = 0;
        while t > self.min_temperature {
            levels += 1;
            t *= self.alpha;
        }
        levels
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(QuboError::InvalidConfig(msg));
        if !(self.min_temperature > 0.0) {
            return invalid(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            ));
        }
        if !(self.initial_temperature > self.min_temperature) {
            return invalid(format!(
                "initial_temperature {} must exceed min_temperature {}",
                self.initial_temperature, self.min_temperature
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return invalid(format!("alpha must be in (0, 1), got {}", self.alpha));
        }
        if self.iterations_per_temperature == 0 {
            return invalid("iterations_per_temperature must be at least 1".into());
        }
        Ok(())
    }
}
