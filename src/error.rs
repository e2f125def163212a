//! Crate-wide error type.

use thiserror::Error;

/// Errors raised while building, compiling, sampling, or loading input.
#[derive(Debug, Error)]
pub enum QuboError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A placeholder used in the expression has no value in the feed dict.
    #[error("no value given for placeholder `{0}`")]
    MissingPlaceholder(String),

    /// The expanded expression contains a term that is not quadratic.
    #[error("term `{term}` has degree {degree}; only degree <= 2 can be compiled to a QUBO")]
    DegreeTooHigh { degree: usize, term: String },

    /// A variable label is not part of the model or sample set.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// Malformed CSV input.
    #[error("CSV line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Shorthand for results carrying a [`QuboError`].
pub type Result<T> = std::result::Result<T, QuboError>;
