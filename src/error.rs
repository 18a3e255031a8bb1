//! Error types for the priority tuner

use thiserror::Error;

/// Main error type for the priority tuner crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state space for ranges {ranges:?} exceeds the limit of {limit} states")]
    StateSpaceTooLarge { ranges: Vec<usize>, limit: usize },

    #[error("performance reading {reading} at cycle {cycle} is not finite")]
    NonFiniteReading { cycle: u64, reading: f64 },

    #[error("invalid update rule '{input}'. Expected one of: {expected}")]
    ParseUpdateRule { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
