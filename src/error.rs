//! Error types for simulation and analysis.

use thiserror::Error;

/// Errors produced while configuring, simulating or analysing cohorts.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed parameters: non-stochastic matrix, unknown therapy, bad horizon.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A statistic was requested on too few observations.
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData {
        /// Minimum number of observations the statistic requires.
        needed: usize,
        /// Number of observations supplied.
        got: usize,
    },

    /// A ratio or interval is undefined for the supplied values.
    #[error("numeric error: {0}")]
    Numeric(String),

    /// The cohort run was cancelled between patients.
    #[error("simulation cancelled after {completed} patients")]
    Cancelled {
        /// Patients that had finished when cancellation was observed.
        completed: usize,
    },

    /// Parameter table could not be parsed or a result could not be written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn insufficient(needed: usize, got: usize) -> Self {
        Error::InsufficientData { needed, got }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
