//! Serial execution strategy

use crate::{
    assembler::ChunkOutput,
    chunker::Chunk,
    error::Result,
    executor::{ExecutionMode, Executor},
};
use slugline_core::{SlugCache, SlugConfig, Slugger};
use std::sync::Arc;

/// Single-context executor running in the calling thread
#[derive(Debug, Clone, Default)]
pub struct SerialExecutor {
    cache: Option<Arc<SlugCache>>,
}

impl SerialExecutor {
    /// Create a serial executor, optionally backed by `cache`
    pub fn new(cache: Option<Arc<SlugCache>>) -> Self {
        Self { cache }
    }
}

impl Executor for SerialExecutor {
    fn execute(&self, chunks: &[Chunk<'_>], config: &Arc<SlugConfig>) -> Result<Vec<ChunkOutput>> {
        let slugger = slugger_for(config, self.cache.as_ref());
        Ok(chunks
            .iter()
            .map(|chunk| ChunkOutput {
                start: chunk.start,
                slugs: slugger.slugify_all(chunk.items),
            })
            .collect())
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Serial
    }
}

pub(crate) fn slugger_for(config: &Arc<SlugConfig>, cache: Option<&Arc<SlugCache>>) -> Slugger {
    match cache {
        Some(cache) => Slugger::with_cache(config.clone(), cache.clone()),
        None => Slugger::new(config.clone()),
    }
}
