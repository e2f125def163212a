//! Tracing setup for the command-line tool.
//!
//! ## Log Levels
//!
//! - **INFO**: Problem and sampling lifecycle
//! - **DEBUG**: Per-read energies and per-trial results
//! - **TRACE**: Derived temperature schedules
//!
//! `RUST_LOG` overrides the level chosen from the verbosity flag.

use std::io;
use std::sync::OnceLock;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Maps a `-v` count to the crate's log level.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber writing to stderr.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init(verbosity: u8) {
    INIT.get_or_init(|| {
        let directive = format!("u_qubo={}", level_for(verbosity));
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init();
    });
}
