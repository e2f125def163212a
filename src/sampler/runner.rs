//! Simulated annealing over QUBOs.
//!
//! Every read is an independent [`SaRunner`] trajectory over single-bit
//! flips. The temperature follows a geometric schedule between the two ends
//! of the beta range, with one sweep (`n` proposals) per temperature level.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use super::config::SamplerConfig;
use super::sampleset::SampleSet;
use crate::error::Result;
use crate::qubo::Qubo;
use crate::sa::{SaConfig, SaProblem, SaRunner};

/// Samples low-energy assignments of a [`Qubo`].
///
/// # Examples
///
/// ```
/// use u_qubo::qubo::Qubo;
/// use u_qubo::sampler::{SamplerConfig, SimulatedAnnealingSampler};
///
/// // minimum at a = 1, b = 0
/// let qubo = Qubo::from_triplets([("a", "a", -1.0), ("b", "b", 1.0), ("a", "b", 2.0)], 0.0);
/// let sampler = SimulatedAnnealingSampler::new(
///     SamplerConfig::default().with_num_reads(4).with_num_sweeps(100).with_seed(3),
/// );
/// let set = sampler.sample_qubo(&qubo).unwrap();
/// let best = set.first().unwrap();
/// assert_eq!(best.get("a"), Some(1));
/// assert_eq!(best.get("b"), Some(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealingSampler {
    config: SamplerConfig,
}

impl SimulatedAnnealingSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Runs `num_reads` annealing trajectories and collects their best states.
    ///
    /// # Errors
    ///
    /// [`QuboError::InvalidConfig`](crate::QuboError::InvalidConfig) when the
    /// sampler configuration is invalid.
    pub fn sample_qubo(&self, qubo: &Qubo) -> Result<SampleSet> {
        self.config.validate()?;
        let num_reads = self.config.num_reads;

        if qubo.is_empty() {
            warn!("sampling an empty QUBO");
            let samples = (0..num_reads).map(|_| (Vec::new(), 0.0)).collect();
            return Ok(SampleSet::from_samples(Vec::new(), samples));
        }

        let problem = QuboProblem::new(qubo);
        let (hot, cold) = self
            .config
            .beta_range
            .unwrap_or_else(|| problem.default_beta_range());
        let schedule = schedule(qubo.len(), self.config.num_sweeps, hot, cold);
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        info!(
            variables = qubo.len(),
            num_reads,
            num_sweeps = self.config.num_sweeps,
            beta_hot = hot,
            beta_cold = cold,
            "sampling QUBO"
        );

        let run_read = |read: usize| -> Result<(Vec<u8>, f64)> {
            let config = schedule.clone().with_seed(base_seed.wrapping_add(read as u64));
            let result = SaRunner::run(&problem, &config)?;
            // recompute: accumulated deltas drift
            let energy = qubo.energy(&result.best);
            debug!(read, energy, accepted = result.accepted_moves, "read finished");
            Ok((result.best, energy))
        };

        let samples = if self.config.parallel {
            (0..num_reads)
                .into_par_iter()
                .map(run_read)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..num_reads).map(run_read).collect::<Result<Vec<_>>>()?
        };

        Ok(SampleSet::from_samples(qubo.variables().to_vec(), samples))
    }
}

/// Geometric schedule visiting `num_sweeps` temperatures from `1/hot` down
/// to `1/cold`, one sweep each.
fn schedule(n: usize, num_sweeps: usize, hot: f64, cold: f64) -> SaConfig {
    let t_hot = 1.0 / hot;
    let t_cold = 1.0 / cold;
    let steps = num_sweeps.saturating_sub(1).max(1);
    let alpha = (t_cold / t_hot).powf(1.0 / steps as f64);
    trace!(t_hot, t_cold, alpha, levels = num_sweeps, "temperature schedule");
    SaConfig::default()
        .with_initial_temperature(t_hot)
        // strictly between the last level and the one after it
        .with_min_temperature(t_cold * alpha.sqrt())
        .with_alpha(alpha)
        .with_iterations_per_temperature(n)
        .with_max_iterations(n * num_sweeps)
}

/// Single-bit-flip view of a QUBO for the SA runner.
struct QuboProblem<'a> {
    qubo: &'a Qubo,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl<'a> QuboProblem<'a> {
    fn new(qubo: &'a Qubo) -> Self {
        Self {
            qubo,
            adjacency: qubo.adjacency(),
        }
    }

    /// Hot end: the most constrained bit flips with probability 1/2.
    /// Cold end: the least constrained bit flips with probability 1/100.
    fn default_beta_range(&self) -> (f64, f64) {
        let linear = self.qubo.linear();
        let max_delta = (0..self.qubo.len())
            .map(|i| {
                linear[i].abs() + self.adjacency[i].iter().map(|(_, b)| b.abs()).sum::<f64>()
            })
            .fold(0.0, f64::max);
        let min_delta = linear
            .iter()
            .chain(self.qubo.quadratic().values())
            .map(|v| v.abs())
            .filter(|&v| v > 0.0)
            .fold(f64::INFINITY, f64::min);

        if max_delta == 0.0 {
            warn!("QUBO has no non-zero coefficients; using a unit beta range");
            return (0.1, 1.0);
        }
        (2f64.ln() / max_delta, 100f64.ln() / min_delta)
    }

    /// Energy change of flipping bit `i`.
    fn flip_delta(&self, bits: &[u8], i: usize) -> f64 {
        let field = self.qubo.linear()[i]
            + self.adjacency[i]
                .iter()
                .filter(|(j, _)| bits[*j] == 1)
                .map(|(_, b)| b)
                .sum::<f64>();
        if bits[i] == 0 {
            field
        } else {
            -field
        }
    }
}

impl SaProblem for QuboProblem<'_> {
    type Solution = Vec<u8>;
    type Move = usize;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        (0..self.qubo.len()).map(|_| rng.random_range(0..2)).collect()
    }

    fn cost(&self, bits: &Vec<u8>) -> f64 {
        self.qubo.energy(bits)
    }

    fn propose<R: Rng>(&self, _bits: &Vec<u8>, rng: &mut R) -> usize {
        rng.random_range(0..self.qubo.len())
    }

    fn delta(&self, bits: &Vec<u8>, &i: &usize) -> f64 {
        self.flip_delta(bits, i)
    }

    fn apply(&self, bits: &mut Vec<u8>, i: usize) {
        bits[i] ^= 1;
    }
}
