//! Batch options

use crate::error::Result;
use slugline_core::ConfigError;
use slugline_engine::{EngineConfig, ExecutionMode, DEFAULT_CHUNK_SIZE};
use std::path::PathBuf;

/// Default async concurrency limit
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// How a batch is executed
///
/// Options never change slugs, only how they are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchOptions {
    /// Execution mode
    pub mode: ExecutionMode,
    /// Threads or processes (None = `min(32, cpus + 4)`)
    pub workers: Option<usize>,
    /// Items per chunk
    pub chunk_size: usize,
    /// Cache capacity (None = default, Some(0) = disabled)
    pub cache_size: Option<usize>,
    /// Worker executable for process mode
    pub worker_program: Option<PathBuf>,
    /// Concurrent jobs for async calls
    pub max_in_flight: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Serial,
            workers: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_size: None,
            worker_program: None,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl BatchOptions {
    /// Default options: serial mode with a cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread pool options
    pub fn threaded() -> Self {
        Self::new().mode(ExecutionMode::Thread)
    }

    /// Worker process options
    pub fn process() -> Self {
        Self::new().mode(ExecutionMode::Process)
    }

    /// Set the execution mode
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the chunk size
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the cache capacity; zero disables caching
    pub fn cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = Some(cache_size);
        self
    }

    /// Set the worker executable for process mode
    pub fn worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.worker_program = Some(program.into());
        self
    }

    /// Set the async concurrency limit
    pub fn max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Validate and convert to an engine configuration
    pub fn to_engine_config(&self) -> Result<EngineConfig> {
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroConcurrency.into());
        }
        let config = EngineConfig {
            mode: self.mode,
            workers: self.workers,
            chunk_size: self.chunk_size,
            cache_size: self.cache_size,
            worker_program: self.worker_program.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}
