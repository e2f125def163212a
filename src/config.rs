//! Application configuration.
//!
//! Every section is optional; missing fields fall back to the built-in
//! problem instances.
//!
//! ```toml
//! [sampler]
//! seed = 7
//! parallel = false
//!
//! [tsp]
//! num_reads = 50
//! weight_const1 = 200.0
//!
//! [tsp_search]
//! num_sweeps = [1000]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::problems::idle_time::IdleTimeProblem;
use crate::problems::lunch::LunchConfig;
use crate::problems::tsp::{TspConfig, WeightSearch};
use crate::sampler::SamplerConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shared sampler settings; problems override reads and sweeps.
    pub sampler: SamplerConfig,
    pub idle_time: IdleTimeProblem,
    pub lunch: LunchConfig,
    pub tsp: TspConfig,
    pub tsp_search: WeightSearch,
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string and validates the sampler
    /// and idle-time sections.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.sampler.validate()?;
        config.idle_time.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuboError;

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.sampler.num_reads, 1);
        assert_eq!(config.idle_time.budget, 45.0);
        assert_eq!(config.lunch.categories.len(), 4);
        assert_eq!(config.tsp.cities.len(), 5);
        assert_eq!(config.tsp_search.num_reads, 100);
    }

    #[test]
    fn test_sections_override_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            [sampler]
            seed = 7
            parallel = false

            [idle_time]
            sweeps = [10, 20]

            [lunch]
            input = "menu.csv"
            preference_weight = 0.5

            [tsp]
            num_reads = 50
            weight_const1 = 200.0

            [tsp_search]
            num_sweeps = [1000]
            "#,
        )
        .unwrap();
        assert_eq!(config.sampler.seed, Some(7));
        assert!(!config.sampler.parallel);
        assert_eq!(config.idle_time.sweeps, vec![10, 20]);
        assert_eq!(config.idle_time.num_reads, 100);
        assert_eq!(config.lunch.input, "menu.csv");
        assert_eq!(config.lunch.preference_weight, 0.5);
        assert_eq!(config.tsp.num_reads, 50);
        assert_eq!(config.tsp.weight_const1, 200.0);
        assert_eq!(config.tsp.weight_const2, 1000.0);
        assert_eq!(config.tsp_search.num_sweeps, vec![1000]);
    }

    #[test]
    fn test_invalid_sampler_rejected() {
        let err = AppConfig::from_toml_str("[sampler]\nnum_reads = 0\n").unwrap_err();
        assert!(matches!(err, QuboError::InvalidConfig(_)));
    }

    #[test]
    fn test_misspelled_required_activity_rejected() {
        let err = AppConfig::from_toml_str("[idle_time]\nrequired = [\"anime\", \"netflx\"]\n")
            .unwrap_err();
        assert!(matches!(err, QuboError::InvalidConfig(ref m) if m.contains("netflx")));
    }

    #[test]
    fn test_malformed_toml() {
        let err = AppConfig::from_toml_str("[sampler\n").unwrap_err();
        assert!(matches!(err, QuboError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, QuboError::Io(_)));
    }
}
