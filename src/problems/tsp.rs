//! Traveling salesman routing.
//!
//! `x[t][i] = 1` means city `i` is visited at step `t`. The tour cost sums
//! the distance of every consecutive pair (wrapping around), and two
//! one-hot constraints force a permutation matrix:
//!
//! ```text
//! H = sum_t sum_i sum_j Q[i][j] x[t][i] x[t+1][j]
//!   + P(weight_const1) * Constraint(sum_t (sum_i x[t][i] - 1)^2, "H_const1")
//!   + P(weight_const2) * Constraint(sum_i (sum_t x[t][i] - 1)^2, "H_const2")
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{QuboError, Result};
use crate::qubo::{BinaryArray, Expr, FeedDict, Model};
use crate::sampler::{SampleSet, SampleView, SamplerConfig, SimulatedAnnealingSampler};

/// Weight placeholder of the one-city-per-step constraint.
pub const WEIGHT_CONST1: &str = "weight_const1";
/// Weight placeholder of the one-visit-per-city constraint.
pub const WEIGHT_CONST2: &str = "weight_const2";

const LENGTH_EPS: f64 = 1e-9;

/// TSP instance and run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TspConfig {
    pub cities: Vec<String>,
    /// `distances[i][j]`: cost of travelling from city `i` to city `j`.
    /// The diagonal acts as a penalty for staying put.
    pub distances: Vec<Vec<f64>>,
    /// Known optimal tour length; reads reaching it count as successes.
    pub best_length: f64,
    pub weight_const1: f64,
    pub weight_const2: f64,
    pub num_reads: usize,
    pub num_sweeps: usize,
}

impl Default for TspConfig {
    /// Five cities, optimum A -> B -> E -> D -> C -> A = 90.
    fn default() -> Self {
        Self {
            cities: ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
            distances: vec![
                vec![1000.0, 20.0, 20.0, 50.0, 40.0],
                vec![30.0, 1000.0, 10.0, 30.0, 20.0],
                vec![20.0, 10.0, 1000.0, 30.0, 20.0],
                vec![50.0, 30.0, 20.0, 1000.0, 10.0],
                vec![40.0, 20.0, 20.0, 10.0, 1000.0],
            ],
            best_length: 90.0,
            weight_const1: 1000.0,
            weight_const2: 1000.0,
            num_reads: 100,
            num_sweeps: 50_000,
        }
    }
}

/// Per-read evaluation of a TSP sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct TspOutcome {
    /// Tour length of every record (energy order); `None` when the
    /// assignment is not a permutation matrix.
    pub lengths: Vec<Option<f64>>,
    /// Records whose length equals the known optimum.
    pub success_count: usize,
}

impl TspOutcome {
    pub fn valid_count(&self) -> usize {
        self.lengths.iter().filter(|l| l.is_some()).count()
    }
}

/// A TSP instance with its compiled model.
#[derive(Debug, Clone)]
pub struct TspProblem {
    config: TspConfig,
    x: BinaryArray,
    model: Model,
}

impl TspProblem {
    /// # Errors
    ///
    /// [`QuboError::InvalidConfig`] when the distance matrix is not square
    /// with one row per city.
    pub fn new(config: TspConfig) -> Result<Self> {
        let n = config.cities.len();
        if n < 2 {
            return Err(QuboError::InvalidConfig("a tour needs at least two cities".into()));
        }
        if config.distances.len() != n || config.distances.iter().any(|row| row.len() != n) {
            return Err(QuboError::InvalidConfig(format!(
                "distance matrix must be {n}x{n}"
            )));
        }
        let x = BinaryArray::new("x", n, n);
        let model = Self::hamiltonian(&config.distances, &x).compile()?;
        Ok(Self { config, x, model })
    }

    fn hamiltonian(distances: &[Vec<f64>], x: &BinaryArray) -> Expr {
        let n = distances.len();

        let mut cost = Vec::with_capacity(n * n * n);
        for t in 0..n {
            for (i, row) in distances.iter().enumerate() {
                for (j, &d) in row.iter().enumerate() {
                    cost.push(d * x.get(t, i) * x.get((t + 1) % n, j));
                }
            }
        }
        let h_cost: Expr = cost.into_iter().sum();

        let h_const1: Expr = (0..n).map(|t| (x.row(t).sum::<Expr>() - 1.0).pow(2)).sum();
        let h_const2: Expr = (0..n)
            .map(|i| (x.column(i).sum::<Expr>() - 1.0).pow(2))
            .sum();

        h_cost
            + Expr::placeholder(WEIGHT_CONST1) * Expr::constraint(h_const1, "H_const1")
            + Expr::placeholder(WEIGHT_CONST2) * Expr::constraint(h_const2, "H_const2")
    }

    pub fn config(&self) -> &TspConfig {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn feed_dict(&self, weight_const1: f64, weight_const2: f64) -> FeedDict {
        FeedDict::new()
            .with(WEIGHT_CONST1, weight_const1)
            .with(WEIGHT_CONST2, weight_const2)
    }

    /// Visit order encoded by a sample, or `None` if it is not a permutation
    /// matrix.
    pub fn decode_tour(&self, sample: &SampleView<'_>) -> Option<Vec<usize>> {
        let n = self.config.cities.len();
        let mut tour = Vec::with_capacity(n);
        let mut seen = vec![false; n];
        for t in 0..n {
            let mut visited = (0..n).filter(|&i| sample.get(&self.x.label(t, i)) == Some(1));
            let city = visited.next()?;
            if visited.next().is_some() || seen[city] {
                return None;
            }
            seen[city] = true;
            tour.push(city);
        }
        Some(tour)
    }

    /// Closed tour length, returning to the first city.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        let d = &self.config.distances;
        (0..tour.len())
            .map(|t| d[tour[t]][tour[(t + 1) % tour.len()]])
            .sum()
    }

    /// City names of a tour, closed back to the start.
    pub fn tour_names(&self, tour: &[usize]) -> Vec<&str> {
        tour.iter()
            .chain(tour.first())
            .map(|&c| self.config.cities[c].as_str())
            .collect()
    }

    pub fn evaluate(&self, set: &SampleSet) -> TspOutcome {
        let lengths: Vec<Option<f64>> = set
            .data()
            .map(|view| self.decode_tour(&view).map(|tour| self.tour_length(&tour)))
            .collect();
        let success_count = lengths
            .iter()
            .flatten()
            .filter(|&&len| (len - self.config.best_length).abs() < LENGTH_EPS)
            .count();
        TspOutcome {
            lengths,
            success_count,
        }
    }

    /// Samples with explicit weights and sweep count.
    pub fn sample_with(
        &self,
        sampler: &SamplerConfig,
        weight_const1: f64,
        weight_const2: f64,
        num_sweeps: usize,
        num_reads: usize,
    ) -> Result<(SampleSet, TspOutcome)> {
        let qubo = self
            .model
            .to_qubo(&self.feed_dict(weight_const1, weight_const2))?;
        let config = sampler
            .clone()
            .with_num_reads(num_reads)
            .with_num_sweeps(num_sweeps);
        let set = SimulatedAnnealingSampler::new(config).sample_qubo(&qubo)?;
        let outcome = self.evaluate(&set);
        Ok((set, outcome))
    }

    /// Samples with the configured weights, reads and sweeps.
    pub fn solve(&self, sampler: &SamplerConfig) -> Result<(SampleSet, TspOutcome)> {
        info!(
            cities = self.config.cities.len(),
            num_reads = self.config.num_reads,
            num_sweeps = self.config.num_sweeps,
            "solving TSP"
        );
        self.sample_with(
            sampler,
            self.config.weight_const1,
            self.config.weight_const2,
            self.config.num_sweeps,
            self.config.num_reads,
        )
    }
}

/// Grid search over constraint weights and sweep counts.
///
/// The model is compiled once; every trial re-feeds the placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightSearch {
    pub weight_const1: Vec<f64>,
    pub weight_const2: Vec<f64>,
    pub num_sweeps: Vec<usize>,
    pub num_reads: usize,
}

impl Default for WeightSearch {
    fn default() -> Self {
        Self {
            weight_const1: vec![100.0, 200.0, 500.0, 1000.0],
            weight_const2: vec![100.0, 200.0, 500.0, 1000.0],
            num_sweeps: vec![1000, 10_000],
            num_reads: 100,
        }
    }
}

/// One evaluated hyperparameter combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTrial {
    pub weight_const1: f64,
    pub weight_const2: f64,
    pub num_sweeps: usize,
    pub success_count: usize,
    pub valid_count: usize,
}

/// All trials of a search and the index of the best one.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub trials: Vec<SearchTrial>,
    pub best: Option<usize>,
}

impl SearchOutcome {
    pub fn best_trial(&self) -> Option<&SearchTrial> {
        self.best.map(|i| &self.trials[i])
    }
}

impl WeightSearch {
    /// Evaluates every combination in `const1 x const2 x sweeps` order.
    ///
    /// The best trial has the highest success count; ties go to the earliest.
    pub fn run(&self, problem: &TspProblem, sampler: &SamplerConfig) -> Result<SearchOutcome> {
        let total = self.weight_const1.len() * self.weight_const2.len() * self.num_sweeps.len();
        info!(trials = total, num_reads = self.num_reads, "TSP weight search");

        let mut trials: Vec<SearchTrial> = Vec::with_capacity(total);
        let mut best: Option<usize> = None;
        for &w1 in &self.weight_const1 {
            for &w2 in &self.weight_const2 {
                for &sweeps in &self.num_sweeps {
                    let (_, outcome) = problem.sample_with(sampler, w1, w2, sweeps, self.num_reads)?;
                    let trial = SearchTrial {
                        weight_const1: w1,
                        weight_const2: w2,
                        num_sweeps: sweeps,
                        success_count: outcome.success_count,
                        valid_count: outcome.valid_count(),
                    };
                    debug!(?trial, "trial finished");
                    let better = best.is_none_or(|b| trial.success_count > trials[b].success_count);
                    if better {
                        best = Some(trials.len());
                    }
                    trials.push(trial);
                }
            }
        }

        if let Some(b) = best {
            let t: &SearchTrial = &trials[b];
            info!(
                weight_const1 = t.weight_const1,
                weight_const2 = t.weight_const2,
                num_sweeps = t.num_sweeps,
                success_count = t.success_count,
                "best trial"
            );
        }
        Ok(SearchOutcome { trials, best })
    }
}
