//! Execution strategies for batches

use crate::{assembler::ChunkOutput, chunker::Chunk, error::Result};
use serde::{Deserialize, Serialize};
use slugline_core::{ConfigError, SlugConfig};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod process;
pub mod serial;
pub mod thread;

// Re-export executors
pub use process::ProcessExecutor;
pub use serial::SerialExecutor;
pub use thread::ThreadExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One context in the calling thread
    Serial,
    /// A thread pool sharing one cache
    Thread,
    /// Separate worker processes, no cache
    Process,
}

impl ExecutionMode {
    /// Lowercase mode name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Serial => "serial",
            ExecutionMode::Thread => "thread",
            ExecutionMode::Process => "process",
        }
    }

    /// Whether this mode can use a slug cache
    pub fn supports_cache(&self) -> bool {
        !matches!(self, ExecutionMode::Process)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(ExecutionMode::Serial),
            "thread" => Ok(ExecutionMode::Thread),
            "process" => Ok(ExecutionMode::Process),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

/// Runs chunks of a batch through the pipeline
pub trait Executor: Send + Sync {
    /// Slugify every chunk; outputs may come back in any order
    fn execute(&self, chunks: &[Chunk<'_>], config: &Arc<SlugConfig>) -> Result<Vec<ChunkOutput>>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}
