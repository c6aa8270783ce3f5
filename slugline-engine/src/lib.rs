//! Batch execution for slug generation
//!
//! This crate provides execution modes, chunking, result assembly and the
//! async coordinator on top of `slugline-core`. Process mode needs the
//! `slugline-worker` binary built from this crate.

#![warn(missing_docs)]

pub mod assembler;
pub mod chunker;
pub mod config;
#[cfg(feature = "async")]
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod worker;

// Re-export key types
pub use assembler::{ChunkOutput, ResultAssembler};
pub use chunker::{Chunk, ChunkManager};
pub use config::{default_workers, EngineConfig, EngineConfigBuilder, DEFAULT_CHUNK_SIZE};
#[cfg(feature = "async")]
pub use coordinator::{AsyncCoordinator, InFlightGate, DEFAULT_MAX_IN_FLIGHT};
pub use dispatcher::BatchDispatcher;
pub use error::{EngineError, Result};
pub use executor::{ExecutionMode, Executor};

// Re-export from core for convenience
pub use slugline_core::{ErrorKind, SlugCache, SlugConfig, SlugError, SlugInput};
