//! Errors.
//!
//! Only structural violations surface as errors: an inverted random range
//! (a configuration bug) or a session task that fails to join. Search
//! misses and empty per-session aggregates are ordinary outcomes and are
//! represented as `Option`s at the APIs that produce them.

use thiserror::Error;

/// An error that occurred while running a simulation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SimError {
    /// A random draw was requested over an inverted range.
    ///
    /// Configuration bug. Unrecoverable.
    #[error("invalid random range: min {min} > max {max}")]
    InvalidRange {
        /// Lower bound of the requested range.
        min: u64,
        /// Upper bound of the requested range.
        max: u64,
    },

    /// A session task never completed.
    ///
    /// Means a task panicked or was cancelled before the session drained
    /// its queue. Unrecoverable.
    #[error("session task failed to join")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for simulation operations.
pub type SimResult<T> = std::result::Result<T, SimError>;
