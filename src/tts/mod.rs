//! Time-to-solution (TTS).
//!
//! TTS estimates the wall time an annealer needs to return the target
//! solution at least once with 99% probability, given the success ratio
//! `ps` observed over `num_reads` reads and the time `tau` spent per read.
//!
//! # References
//!
//! - Rønnow et al. (2014), "Defining and detecting quantum speedup"

mod metric;
mod report;

pub use metric::{measure_tts, time_to_solution, TtsPoint, TARGET_PROBABILITY};
pub use report::TtsReport;
