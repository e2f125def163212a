//! TTS formula and sweep-count measurements.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::qubo::Qubo;
use crate::sampler::{SampleView, SamplerConfig, SimulatedAnnealingSampler};

/// Target probability of having seen the solution at least once.
pub const TARGET_PROBABILITY: f64 = 0.99;

/// Time-to-solution: expected wall time to observe a success with
/// probability [`TARGET_PROBABILITY`].
///
/// `tau * ln(1 - 0.99) / ln(1 - ps)` with `ps = correct / num_reads`.
/// Returns 0 when no success was observed (or no trial was run).
///
/// The `ps == 100` branch compares a ratio against a percentage and is only
/// reached when `correct == 100 * num_reads`. With `ps == 1` the formula
/// divides by `ln(0) = -inf` and yields 0.
///
/// # Examples
///
/// ```
/// use u_qubo::tts::time_to_solution;
///
/// assert_eq!(time_to_solution(0, 100, 0.5), 0.0);
/// let tts = time_to_solution(50, 100, 1.0);
/// assert!((tts - 0.01f64.ln() / 0.5f64.ln()).abs() < 1e-12);
/// ```
pub fn time_to_solution(correct: usize, num_reads: usize, tau: f64) -> f64 {
    let ps = if num_reads == 0 {
        0.0
    } else {
        correct as f64 / num_reads as f64
    };

    if ps == 0.0 {
        0.0
    } else if ps == 100.0 {
        tau
    } else {
        tau * ((1.0 - TARGET_PROBABILITY).ln() / (1.0 - ps).ln())
    }
}

/// One measurement of the TTS series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsPoint {
    pub num_sweeps: usize,
    pub num_reads: usize,
    /// Wall time per read, in seconds.
    pub tau: f64,
    pub success_count: usize,
    /// TTS in seconds.
    pub tts: f64,
}

impl TtsPoint {
    /// Success rate in percent.
    pub fn success_rate(&self) -> f64 {
        if self.num_reads == 0 {
            0.0
        } else {
            100.0 * self.success_count as f64 / self.num_reads as f64
        }
    }
}

/// Samples `qubo` once per sweep count and measures TTS.
///
/// `base` supplies every sampler setting except `num_sweeps`. The elapsed
/// time of the whole `sample_qubo` call is divided by `num_reads` to get
/// `tau`.
pub fn measure_tts<F>(
    qubo: &Qubo,
    base: &SamplerConfig,
    sweeps: &[usize],
    is_success: F,
) -> Result<Vec<TtsPoint>>
where
    F: Fn(&SampleView<'_>) -> bool,
{
    let mut points = Vec::with_capacity(sweeps.len());
    for &num_sweeps in sweeps {
        let sampler = SimulatedAnnealingSampler::new(base.clone().with_num_sweeps(num_sweeps));

        let started = Instant::now();
        let set = sampler.sample_qubo(qubo)?;
        let elapsed = started.elapsed().as_secs_f64();

        let num_reads = base.num_reads;
        let tau = elapsed / num_reads as f64;
        let success_count = set.data().filter(|view| is_success(view)).count();
        let tts = time_to_solution(success_count, num_reads, tau);

        info!(num_sweeps, tau, success_count, tts, "tts measured");
        points.push(TtsPoint {
            num_sweeps,
            num_reads,
            tau,
            success_count,
            tts,
        });
    }
    Ok(points)
}
