//! Problem formulations.
//!
//! - [`idle_time`]: fill an idle-time gap with activities; TTS study.
//! - [`lunch`]: one option per category for every dish of a menu table.
//! - [`tsp`]: 5-city traveling salesman with a weight search.

pub mod idle_time;
pub mod lunch;
pub mod tsp;
