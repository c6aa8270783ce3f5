//! Configuration types for the engine

use crate::ExecutionMode;
use serde::{Deserialize, Serialize};
use slugline_core::{ConfigError, DEFAULT_CACHE_SIZE};
use std::path::PathBuf;

/// Default number of items per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Upper bound on the default worker count
const MAX_DEFAULT_WORKERS: usize = 32;

/// Worker count used when none is configured: `min(32, cpus + 4)`
pub fn default_workers() -> usize {
    (num_cpus::get() + 4).min(MAX_DEFAULT_WORKERS)
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Execution mode selector
    pub mode: ExecutionMode,
    /// Number of threads or processes (None = auto)
    pub workers: Option<usize>,
    /// Items per chunk
    pub chunk_size: usize,
    /// Cache capacity (None = default, Some(0) = no cache)
    pub cache_size: Option<usize>,
    /// Worker executable for process mode (None = search)
    pub worker_program: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Serial,
            workers: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_size: None,
            worker_program: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Single context, cache on
    pub fn serial() -> Self {
        Self::default()
    }

    /// Thread pool sized to the machine, shared cache
    pub fn threaded() -> Self {
        Self {
            mode: ExecutionMode::Thread,
            ..Self::default()
        }
    }

    /// Worker processes, no cache
    pub fn process() -> Self {
        Self {
            mode: ExecutionMode::Process,
            ..Self::default()
        }
    }

    /// Resolved worker count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_workers)
    }

    /// Resolved cache capacity
    pub fn cache_capacity(&self) -> usize {
        self.cache_size.unwrap_or(DEFAULT_CACHE_SIZE)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the execution mode
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the worker count (None = auto)
    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the number of items per chunk
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Set the cache capacity (None = default, Some(0) = disabled)
    pub fn cache_size(mut self, cache_size: Option<usize>) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    /// Set the worker executable used in process mode
    pub fn worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.worker_program = Some(program.into());
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(EngineConfig::serial().mode, ExecutionMode::Serial);
        assert_eq!(EngineConfig::threaded().mode, ExecutionMode::Thread);
        assert_eq!(EngineConfig::process().mode, ExecutionMode::Process);
        assert_eq!(EngineConfig::default().chunk_size, 1000);
        assert_eq!(EngineConfig::default().cache_capacity(), 2048);
    }

    #[test]
    fn test_default_workers_bounds() {
        let workers = default_workers();
        assert!(workers >= 5);
        assert!(workers <= 32);
        assert_eq!(EngineConfig::default().worker_count(), workers);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            EngineConfig::builder().chunk_size(0).build().unwrap_err(),
            ConfigError::ZeroChunkSize
        );
        assert_eq!(
            EngineConfig::builder().workers(Some(0)).build().unwrap_err(),
            ConfigError::ZeroWorkers
        );
        let config = EngineConfig::builder()
            .mode(ExecutionMode::Thread)
            .workers(Some(2))
            .cache_size(Some(0))
            .build()
            .unwrap();
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.cache_capacity(), 0);
    }
}
