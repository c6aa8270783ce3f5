//! Layered error types
//!
//! Core failures ([`SlugError`]) pass through unchanged; everything else is
//! about running a batch: thread pools, worker processes and cancellation.

use slugline_core::{ConfigError, ErrorKind, SlugError};
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input or configuration error from the core
    #[error(transparent)]
    Slug(#[from] SlugError),

    /// The rayon thread pool could not be built
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// No worker executable could be located
    #[error("worker program not found: {0}")]
    WorkerUnavailable(String),

    /// The worker executable could not be started
    #[error("failed to spawn worker {program}: {reason}")]
    WorkerSpawn {
        /// Program that was launched
        program: String,
        /// Underlying OS error
        reason: String,
    },

    /// A worker died, reported an error or its pipe broke
    #[error("worker failed: {0}")]
    WorkerFailed(String),

    /// A worker sent something other than the expected frame
    #[error("worker protocol error: {0}")]
    Protocol(String),

    /// The caller cancelled the batch
    #[error("batch cancelled")]
    Cancelled,

    /// A result slot was never filled
    #[error("missing result for item {index}")]
    Incomplete {
        /// Index of the first unfilled slot
        index: usize,
    },
}

impl EngineError {
    /// Kind of the underlying core error, if this wraps one
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EngineError::Slug(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Slug(SlugError::Config(err))
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
