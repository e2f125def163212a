//! Idle-time budgeting.
//!
//! Pick the activities that fill a gap of `budget` minutes as exactly as
//! possible: `H = P(sukima1) * (budget - sum_k minutes_k * x_k)^2`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{QuboError, Result};
use crate::qubo::{Expr, FeedDict, Model, Qubo};
use crate::sampler::{SampleSet, SampleView, SamplerConfig};
use crate::tts::{measure_tts, TtsPoint};

/// Placeholder weighting the budget constraint.
pub const WEIGHT_PLACEHOLDER: &str = "sukima1";

/// A candidate activity and its length in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub minutes: f64,
}

impl Activity {
    pub fn new(name: impl Into<String>, minutes: f64) -> Self {
        Self {
            name: name.into(),
            minutes,
        }
    }
}

/// Idle-time budgeting problem and its TTS study settings.
///
/// # Examples
///
/// ```
/// use u_qubo::problems::idle_time::IdleTimeProblem;
///
/// let problem = IdleTimeProblem::default();
/// let qubo = problem.create_qubo().unwrap();
/// // anime + youtube + amazon + netflix = 42 minutes, 3 short of 45
/// assert_eq!(qubo.energy(&[1, 1, 1, 1, 0]) + qubo.offset(), 9.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleTimeProblem {
    /// Length of the gap in minutes.
    pub budget: f64,
    pub activities: Vec<Activity>,
    /// Activities that must all be selected for a read to count as a success.
    pub required: Vec<String>,
    /// Value fed to the [`WEIGHT_PLACEHOLDER`].
    pub weight: f64,
    /// Sweep counts of the TTS study.
    pub sweeps: Vec<usize>,
    /// Reads per sweep count.
    pub num_reads: usize,
}

impl Default for IdleTimeProblem {
    fn default() -> Self {
        Self {
            budget: 45.0,
            activities: vec![
                Activity::new("anime", 30.0),
                Activity::new("youtube", 5.0),
                Activity::new("amazon", 4.0),
                Activity::new("netflix", 3.0),
                Activity::new("dorama", 60.0),
            ],
            required: ["anime", "youtube", "amazon", "netflix"]
                .map(String::from)
                .to_vec(),
            weight: 1.0,
            sweeps: vec![10, 100, 1000, 10000],
            num_reads: 100,
        }
    }
}

impl IdleTimeProblem {
    pub fn hamiltonian(&self) -> Expr {
        let used: Expr = self
            .activities
            .iter()
            .map(|a| a.minutes * Expr::binary(a.name.as_str()))
            .sum();
        Expr::placeholder(WEIGHT_PLACEHOLDER) * (self.budget - used).pow(2)
    }

    pub fn feed_dict(&self) -> FeedDict {
        FeedDict::new().with(WEIGHT_PLACEHOLDER, self.weight)
    }

    /// Checks that activity names are unique and non-empty, and that every
    /// required name is one of them.
    ///
    /// # Errors
    ///
    /// [`QuboError::InvalidConfig`] naming the offending activity.
    pub fn validate(&self) -> Result<()> {
        if self.activities.is_empty() {
            return Err(QuboError::InvalidConfig("idle_time needs at least one activity".into()));
        }
        let mut names = HashSet::new();
        for a in &self.activities {
            if !names.insert(a.name.as_str()) {
                return Err(QuboError::InvalidConfig(format!(
                    "duplicate idle_time activity `{}`",
                    a.name
                )));
            }
        }
        if let Some(unknown) = self.required.iter().find(|r| !names.contains(r.as_str())) {
            return Err(QuboError::InvalidConfig(format!(
                "required activity `{unknown}` is not among the idle_time activities"
            )));
        }
        Ok(())
    }

    pub fn compile(&self) -> Result<Model> {
        self.validate()?;
        self.hamiltonian().compile()
    }

    pub fn create_qubo(&self) -> Result<Qubo> {
        self.compile()?.to_qubo(&self.feed_dict())
    }

    /// True when every required activity is selected.
    pub fn is_success(&self, sample: &SampleView<'_>) -> bool {
        self.required
            .iter()
            .all(|name| sample.get(name) == Some(1))
    }

    /// Number of records satisfying [`is_success`](Self::is_success).
    pub fn count_successes(&self, set: &SampleSet) -> usize {
        set.data().filter(|view| self.is_success(view)).count()
    }

    /// Runs the TTS study: one sampling per configured sweep count.
    ///
    /// `sampler` supplies seed and parallelism; reads and sweeps come from
    /// the problem.
    pub fn run_tts_study(&self, sampler: &SamplerConfig) -> Result<Vec<TtsPoint>> {
        let qubo = self.create_qubo()?;
        let base = sampler.clone().with_num_reads(self.num_reads);
        info!(
            budget = self.budget,
            activities = self.activities.len(),
            "idle-time TTS study"
        );
        measure_tts(&qubo, &base, &self.sweeps, |view| self.is_success(view))
    }
}
