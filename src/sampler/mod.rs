//! Simulated annealing sampler for QUBOs.
//!
//! [`SimulatedAnnealingSampler::sample_qubo`] turns a [`Qubo`](crate::qubo::Qubo)
//! into a [`SampleSet`]: one record per read, sorted by energy.

mod config;
mod runner;
mod sampleset;

pub use config::SamplerConfig;
pub use runner::SimulatedAnnealingSampler;
pub use sampleset::{SampleRecord, SampleSet, SampleView};
