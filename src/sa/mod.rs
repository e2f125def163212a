//! Simulated Annealing (SA).
//!
//! Single-trajectory annealing with Metropolis acceptance and a geometric
//! temperature schedule. Each [QUBO sampler](crate::sampler) read is one
//! [`SaRunner::run`].
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;
mod types;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
pub use types::SaProblem;
