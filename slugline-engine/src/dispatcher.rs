//! Batch dispatcher
//!
//! Picks an executor for the configured mode, chunks the batch, and puts
//! the results back into input order.

use crate::{
    assembler::ResultAssembler,
    chunker::ChunkManager,
    config::EngineConfig,
    error::Result,
    executor::{
        serial::slugger_for, ExecutionMode, Executor, ProcessExecutor, SerialExecutor,
        ThreadExecutor,
    },
};
use serde_json::Value;
use slugline_core::{collect_texts, collect_value_texts, SlugCache, SlugConfig, SlugInput};
use std::sync::Arc;

/// Runs batches in one execution mode
///
/// In serial and thread mode the dispatcher owns a cache that lives as long
/// as it does. Process mode has none.
pub struct BatchDispatcher {
    config: EngineConfig,
    chunker: ChunkManager,
    executor: Box<dyn Executor>,
    cache: Option<Arc<SlugCache>>,
}

impl BatchDispatcher {
    /// Create a dispatcher for `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let cache = match config.mode {
            ExecutionMode::Process => None,
            _ if config.cache_capacity() == 0 => None,
            _ => Some(Arc::new(SlugCache::new(config.cache_capacity()))),
        };

        let executor: Box<dyn Executor> = match config.mode {
            ExecutionMode::Serial => Box::new(SerialExecutor::new(cache.clone())),
            ExecutionMode::Thread => {
                Box::new(ThreadExecutor::new(config.worker_count(), cache.clone())?)
            }
            ExecutionMode::Process => {
                if config.cache_size.is_some_and(|size| size > 0) {
                    log::warn!("caching is not available in process mode; cache_size is ignored");
                }
                Box::new(ProcessExecutor::new(
                    config.worker_program.clone(),
                    config.worker_count(),
                ))
            }
        };

        Ok(Self {
            chunker: ChunkManager::new(config.chunk_size),
            config,
            executor,
            cache,
        })
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execution mode in use
    pub fn mode(&self) -> ExecutionMode {
        self.executor.mode()
    }

    /// The dispatcher's cache, absent in process mode or when disabled
    pub fn cache(&self) -> Option<&Arc<SlugCache>> {
        self.cache.as_ref()
    }

    /// Slugify validated texts, one output per input, in input order
    pub fn dispatch(&self, texts: &[&str], config: &Arc<SlugConfig>) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = self.chunker.partition(texts);
        log::debug!(
            "dispatching {} items in {} chunks ({} mode)",
            texts.len(),
            chunks.len(),
            self.mode()
        );

        let outputs = self.executor.execute(&chunks, config)?;
        let mut assembler = ResultAssembler::new(texts.len());
        for output in outputs {
            assembler.place_output(output)?;
        }
        assembler.finish()
    }

    /// Validate every item, then dispatch
    ///
    /// A single non-text item aborts the batch before any work is done.
    pub fn dispatch_inputs<T: SlugInput>(
        &self,
        items: &[T],
        config: &Arc<SlugConfig>,
    ) -> Result<Vec<String>> {
        let texts = collect_texts(items)?;
        self.dispatch(&texts, config)
    }

    /// Dispatch a JSON array of strings
    pub fn dispatch_values(&self, batch: &Value, config: &Arc<SlugConfig>) -> Result<Vec<String>> {
        let texts = collect_value_texts(batch)?;
        self.dispatch(&texts, config)
    }

    /// Slugify one text in the calling thread, using the dispatcher's cache
    pub fn slugify_one(&self, text: &str, config: &Arc<SlugConfig>) -> String {
        slugger_for(config, self.cache.as_ref()).slugify(text)
    }
}

impl std::fmt::Debug for BatchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDispatcher")
            .field("config", &self.config)
            .field("mode", &self.mode())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serial_dispatch() {
        let dispatcher = BatchDispatcher::new(EngineConfig::serial()).unwrap();
        let config = Arc::new(SlugConfig::default());
        let slugs = dispatcher
            .dispatch(&["Hello, world!", "Привет мир"], &config)
            .unwrap();
        assert_eq!(slugs, vec!["hello-world", "privet-mir"]);
        assert!(dispatcher.cache().is_some());
    }

    #[test]
    fn test_cache_disabled() {
        let config = EngineConfig::builder().cache_size(Some(0)).build().unwrap();
        let dispatcher = BatchDispatcher::new(config).unwrap();
        assert!(dispatcher.cache().is_none());
    }

    #[test]
    fn test_process_mode_owns_no_cache() {
        let config = EngineConfig {
            cache_size: Some(128),
            ..EngineConfig::process()
        };
        let dispatcher = BatchDispatcher::new(config).unwrap();
        assert!(dispatcher.cache().is_none());
        assert_eq!(dispatcher.mode(), ExecutionMode::Process);
        // nothing to do, nothing spawned
        let slugs = dispatcher
            .dispatch(&[], &Arc::new(SlugConfig::default()))
            .unwrap();
        assert!(slugs.is_empty());
    }

    #[test]
    fn test_dispatch_inputs_rejects_whole_batch() {
        let dispatcher = BatchDispatcher::new(EngineConfig::serial()).unwrap();
        let config = Arc::new(SlugConfig::default());
        let err = dispatcher
            .dispatch_inputs(&[json!("ok"), json!(null), json!(1)], &config)
            .unwrap_err();
        assert_eq!(err.to_string(), "expected text at index 1, found null");
        // rejected before anything was slugified
        assert_eq!(dispatcher.cache().unwrap().len(), 0);
    }

    #[test]
    fn test_dispatch_values() {
        let dispatcher = BatchDispatcher::new(EngineConfig::serial()).unwrap();
        let config = Arc::new(SlugConfig::default());
        assert_eq!(
            dispatcher.dispatch_values(&json!(["A B"]), &config).unwrap(),
            vec!["a-b"]
        );
        assert!(dispatcher.dispatch_values(&json!("A B"), &config).is_err());
    }

    #[test]
    fn test_invalid_engine_config() {
        let config = EngineConfig {
            chunk_size: 0,
            ..EngineConfig::default()
        };
        assert!(BatchDispatcher::new(config).is_err());
    }
}
