//! Thread pool execution strategy

use crate::{
    assembler::ChunkOutput,
    chunker::Chunk,
    error::{EngineError, Result},
    executor::{serial::slugger_for, ExecutionMode, Executor},
};
use rayon::prelude::*;
use slugline_core::{SlugCache, SlugConfig};
use std::sync::Arc;

/// Multi-threaded executor backed by a dedicated rayon pool
///
/// Idle threads steal chunks, so uneven chunks still balance. All threads
/// share one cache.
pub struct ThreadExecutor {
    pool: rayon::ThreadPool,
    cache: Option<Arc<SlugCache>>,
}

impl ThreadExecutor {
    /// Create an executor with `workers` threads
    pub fn new(workers: usize, cache: Option<Arc<SlugCache>>) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("slugline-{i}"))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        Ok(Self { pool, cache })
    }

    /// Number of pool threads
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, chunks: &[Chunk<'_>], config: &Arc<SlugConfig>) -> Result<Vec<ChunkOutput>> {
        let slugger = slugger_for(config, self.cache.as_ref());

        let outputs = self.pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| ChunkOutput {
                    start: chunk.start,
                    slugs: slugger.slugify_all(chunk.items),
                })
                .collect()
        });

        Ok(outputs)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Thread
    }
}

impl std::fmt::Debug for ThreadExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadExecutor")
            .field("workers", &self.workers())
            .field("cache", &self.cache)
            .finish()
    }
}
