//! QUBO formulation and simulated-annealing sampling.
//!
//! - **QUBO modeling** ([`qubo`]): binary variables, placeholders and
//!   labelled constraints expanded into a quadratic model whose weights are
//!   fed at conversion time.
//! - **Simulated annealing** ([`sa`]): generic single-solution trajectory
//!   optimization with pluggable cooling schedules.
//! - **Sampling** ([`sampler`]): independent annealing reads over a
//!   [`qubo::Qubo`], collected into an energy-ordered sample set.
//! - **Time-to-solution** ([`tts`]): the TTS metric and report exporters.
//! - **Problems** ([`problems`]): idle-time budgeting, school-lunch menu
//!   selection and a 5-city TSP with a weight search.
//! - **Sorting** ([`sort`]): bubble and selection sort.

pub mod config;
pub mod error;
pub mod logging;
pub mod problems;
pub mod qubo;
pub mod sa;
pub mod sampler;
pub mod sort;
pub mod tts;

pub use error::{QuboError, Result};
