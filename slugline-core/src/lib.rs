//! Slug generation core
//!
//! This crate turns arbitrary text into URL-safe slugs. It contains the
//! validated [`SlugConfig`], the fixed ten-step [`Pipeline`], a bounded
//! [`SlugCache`] and the [`Slugger`] that binds the two together.
//!
//! Nothing here spawns threads or holds global state; batch execution lives
//! in `slugline-engine`.
//!
//! # Example
//!
//! ```
//! use slugline_core::{slugify, SlugConfig};
//!
//! let config = SlugConfig::default();
//! assert_eq!(slugify("Hello, world!", &config).unwrap(), "hello-world");
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod slugger;
pub mod steps;

pub use cache::{CacheKey, CacheStats, SlugCache, DEFAULT_CACHE_SIZE};
pub use config::{CustomMap, SlugConfig, SlugConfigBuilder, WordPattern};
pub use error::{ConfigError, ErrorKind, Result, SlugError};
pub use input::{collect_texts, collect_value_texts, require_text, SlugInput};
pub use pipeline::{Pipeline, StepTrace};
pub use slugger::Slugger;
pub use steps::PipelineStep;

/// Slugify one value without caching
///
/// Non-text input is rejected before any step runs.
pub fn slugify<T: SlugInput + ?Sized>(input: &T, config: &SlugConfig) -> Result<String> {
    let text = require_text(input)?;
    Ok(Pipeline::standard().run(text, config))
}
