//! Sampler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{QuboError, Result};

/// Configuration for the [`SimulatedAnnealingSampler`](super::SimulatedAnnealingSampler).
///
/// # Examples
///
/// ```
/// use u_qubo::sampler::SamplerConfig;
///
/// let config = SamplerConfig::default()
///     .with_num_reads(100)
///     .with_num_sweeps(50_000)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// assert_eq!(SamplerConfig::default().num_sweeps, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of independent annealing runs; each yields one record.
    pub num_reads: usize,

    /// Number of temperature levels; each level performs one sweep
    /// (`n` single-bit-flip proposals for an `n`-variable QUBO).
    pub num_sweeps: usize,

    /// Inverse temperatures `(hot, cold)`.
    ///
    /// `None` derives the range from the QUBO coefficients.
    pub beta_range: Option<(f64, f64)>,

    /// Base seed; read `r` uses `seed + r`. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Whether to run reads in parallel using rayon.
    pub parallel: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            num_reads: 1,
            num_sweeps: 1000,
            beta_range: None,
            seed: None,
            parallel: true,
        }
    }
}

impl SamplerConfig {
    pub fn with_num_reads(mut self, n: usize) -> Self {
        self.num_reads = n;
        self
    }

    pub fn with_num_sweeps(mut self, n: usize) -> Self {
        self.num_sweeps = n;
        self
    }

    pub fn with_beta_range(mut self, hot: f64, cold: f64) -> Self {
        self.beta_range = Some((hot, cold));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_reads == 0 {
            return Err(QuboError::InvalidConfig("num_reads must be at least 1".into()));
        }
        if self.num_sweeps == 0 {
            return Err(QuboError::InvalidConfig("num_sweeps must be at least 1".into()));
        }
        if let Some((hot, cold)) = self.beta_range {
            if !(hot.is_finite() && cold.is_finite() && hot > 0.0 && hot < cold) {
                return Err(QuboError::InvalidConfig(format!(
                    "beta_range must satisfy 0 < hot < cold, got ({hot}, {cold})"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.num_reads, 1);
        assert_eq!(config.num_sweeps, 1000);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_reads_rejected() {
        assert!(SamplerConfig::default().with_num_reads(0).validate().is_err());
        assert!(SamplerConfig::default().with_num_sweeps(0).validate().is_err());
    }

    #[test]
    fn test_beta_range_order() {
        assert!(SamplerConfig::default().with_beta_range(0.1, 5.0).validate().is_ok());
        assert!(SamplerConfig::default().with_beta_range(5.0, 0.1).validate().is_err());
        assert!(SamplerConfig::default().with_beta_range(0.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config: SamplerConfig = toml::from_str(
            r#"
            num_reads = 100
            beta_range = [0.01, 3.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.num_reads, 100);
        assert_eq!(config.num_sweeps, 1000);
        assert_eq!(config.beta_range, Some((0.01, 3.0)));
    }
}
