//! URL slug generation
//!
//! `slugline` converts text into URL-safe slugs, one at a time or in
//! batches run serially, on a thread pool or across worker processes.
//!
//! ```
//! use slugline::{batch_slugify, slugify, BatchOptions, SlugConfig};
//!
//! let config = SlugConfig::default();
//! assert_eq!(slugify("Café déjà vu!", &config).unwrap(), "cafe-deja-vu");
//!
//! let options = BatchOptions::new();
//! let slugs = batch_slugify(&["Hello, world!", "Привет мир"], &config, &options).unwrap();
//! assert_eq!(slugs, vec!["hello-world", "privet-mir"]);
//! ```
//!
//! Every free function call builds its own cache. To reuse a cache across
//! calls, keep a [`Slugifier`]. The free async functions all count against
//! one process-wide limit of [`DEFAULT_MAX_IN_FLIGHT`] running jobs.

#![warn(missing_docs)]

pub mod config;
pub mod error;

use slugline_core::{collect_texts, require_text, Pipeline, StepTrace};
use slugline_engine::BatchDispatcher;
use std::sync::Arc;

// Re-export key types
pub use config::{BatchOptions, DEFAULT_MAX_IN_FLIGHT};
pub use error::{ApiError, Result};
pub use slugline_core::{
    CacheStats, ConfigError, CustomMap, ErrorKind, SlugConfig, SlugConfigBuilder, SlugError,
    SlugInput, DEFAULT_CACHE_SIZE,
};
pub use slugline_engine::ExecutionMode;

#[cfg(feature = "async")]
use slugline_engine::{AsyncCoordinator, EngineConfig, InFlightGate};
#[cfg(feature = "async")]
use std::sync::OnceLock;

#[cfg(feature = "async")]
static ASYNC_GATE: OnceLock<InFlightGate> = OnceLock::new();

#[cfg(feature = "async")]
fn async_gate() -> &'static InFlightGate {
    ASYNC_GATE.get_or_init(InFlightGate::default)
}

/// Jobs currently running for [`async_slugify`] and [`async_batch_slugify`]
#[cfg(feature = "async")]
pub fn async_in_flight() -> usize {
    async_gate().in_flight()
}

/// Slugify one value
///
/// Fails with a type error if `input` is not text.
pub fn slugify<T: SlugInput + ?Sized>(input: &T, config: &SlugConfig) -> Result<String> {
    Ok(slugline_core::slugify(input, config)?)
}

/// Slugify a batch, one output per item, in input order
///
/// Every item is checked before any work starts; one non-text item fails
/// the whole batch and the error names its index.
pub fn batch_slugify<T: SlugInput>(
    items: &[T],
    config: &SlugConfig,
    options: &BatchOptions,
) -> Result<Vec<String>> {
    let engine = options.to_engine_config()?;
    let texts = collect_texts(items)?;
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let dispatcher = BatchDispatcher::new(engine)?;
    Ok(dispatcher.dispatch(&texts, &Arc::new(config.clone()))?)
}

/// Slugify a JSON array of strings
#[cfg(feature = "serde")]
pub fn batch_slugify_json(
    batch: &serde_json::Value,
    config: &SlugConfig,
    options: &BatchOptions,
) -> Result<Vec<String>> {
    let texts = slugline_core::collect_value_texts(batch)?;
    batch_slugify(&texts, config, options)
}

/// Slugify one value on tokio's blocking pool
///
/// Must be called from within a tokio runtime.
#[cfg(feature = "async")]
pub async fn async_slugify<T: SlugInput + ?Sized>(
    input: &T,
    config: &SlugConfig,
) -> Result<String> {
    let text = require_text(input)?;
    let engine = EngineConfig {
        cache_size: Some(0),
        ..EngineConfig::serial()
    };
    let dispatcher = Arc::new(BatchDispatcher::new(engine)?);
    let coordinator = AsyncCoordinator::with_gate(dispatcher, async_gate().clone());
    Ok(coordinator.slugify(text, &Arc::new(config.clone())).await?)
}

/// Slugify a batch without blocking the async scheduler
///
/// Same results, order and errors as [`batch_slugify`]. The batch keeps at
/// most `options.max_in_flight` jobs outstanding, within the shared limit.
#[cfg(feature = "async")]
pub async fn async_batch_slugify<T: SlugInput>(
    items: &[T],
    config: &SlugConfig,
    options: &BatchOptions,
) -> Result<Vec<String>> {
    let engine = options.to_engine_config()?;
    let texts = collect_texts(items)?;
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let dispatcher = Arc::new(BatchDispatcher::new(engine)?);
    let coordinator = AsyncCoordinator::with_gate(dispatcher, async_gate().clone())
        .limit_batch(options.max_in_flight)?;
    Ok(coordinator
        .batch_slugify(&texts, &Arc::new(config.clone()))
        .await?)
}

/// Reusable slug generator
///
/// Owns one dispatcher, and with it one cache that persists across calls.
/// Async calls go through one coordinator, so every caller shares the
/// `max_in_flight` limit. Clones share the dispatcher and the coordinator.
#[derive(Debug, Clone)]
pub struct Slugifier {
    config: Arc<SlugConfig>,
    options: BatchOptions,
    dispatcher: Arc<BatchDispatcher>,
    #[cfg(feature = "async")]
    coordinator: AsyncCoordinator,
}

impl Slugifier {
    /// Create a slugifier with default batch options
    pub fn new(config: SlugConfig) -> Result<Self> {
        Self::with_options(config, BatchOptions::default())
    }

    /// Create a slugifier with explicit batch options
    pub fn with_options(config: SlugConfig, options: BatchOptions) -> Result<Self> {
        let dispatcher = Arc::new(BatchDispatcher::new(options.to_engine_config()?)?);
        #[cfg(feature = "async")]
        let coordinator = AsyncCoordinator::from_shared(dispatcher.clone(), options.max_in_flight)?;
        log::debug!("slugifier ready ({} mode)", options.mode);
        Ok(Self {
            config: Arc::new(config),
            options,
            dispatcher,
            #[cfg(feature = "async")]
            coordinator,
        })
    }

    /// The slug configuration
    pub fn config(&self) -> &SlugConfig {
        &self.config
    }

    /// The batch options
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Slugify one value using the shared cache
    pub fn slugify<T: SlugInput + ?Sized>(&self, input: &T) -> Result<String> {
        let text = require_text(input)?;
        Ok(self.dispatcher.slugify_one(text, &self.config))
    }

    /// Slugify a batch
    pub fn batch<T: SlugInput>(&self, items: &[T]) -> Result<Vec<String>> {
        Ok(self.dispatcher.dispatch_inputs(items, &self.config)?)
    }

    /// Slugify one value without blocking the async scheduler
    #[cfg(feature = "async")]
    pub async fn async_slugify<T: SlugInput + ?Sized>(&self, input: &T) -> Result<String> {
        let text = require_text(input)?;
        Ok(self.coordinator.slugify(text, &self.config).await?)
    }

    /// Slugify a batch without blocking the async scheduler
    #[cfg(feature = "async")]
    pub async fn async_batch<T: SlugInput>(&self, items: &[T]) -> Result<Vec<String>> {
        Ok(self
            .coordinator
            .batch_slugify_inputs(items, &self.config)
            .await?)
    }

    /// Async jobs currently running for this slugifier and its clones
    #[cfg(feature = "async")]
    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    /// Output after each pipeline step, for debugging
    pub fn trace(&self, text: &str) -> Vec<StepTrace> {
        Pipeline::standard().trace(text, &self.config)
    }

    /// Hit and miss counts of the shared cache, if there is one
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.dispatcher.cache().map(|cache| cache.stats())
    }

    /// Drop every cached slug
    pub fn clear_cache(&self) {
        if let Some(cache) = self.dispatcher.cache() {
            cache.clear();
        }
    }
}
