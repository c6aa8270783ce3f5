//! Configured slug generator for one execution context

use crate::cache::SlugCache;
use crate::config::SlugConfig;
use crate::error::Result;
use crate::input::{require_text, SlugInput};
use crate::pipeline::Pipeline;
use std::sync::Arc;

/// A configuration bound to an optional cache
///
/// Cloning is cheap; clones share the same config and cache.
#[derive(Debug, Clone)]
pub struct Slugger {
    config: Arc<SlugConfig>,
    cache: Option<Arc<SlugCache>>,
    pipeline: Pipeline,
}

impl Slugger {
    /// Create a slugger without a cache
    pub fn new(config: Arc<SlugConfig>) -> Self {
        Self {
            config,
            cache: None,
            pipeline: Pipeline::standard(),
        }
    }

    /// Create a slugger backed by `cache`
    pub fn with_cache(config: Arc<SlugConfig>, cache: Arc<SlugCache>) -> Self {
        Self {
            config,
            cache: Some(cache),
            pipeline: Pipeline::standard(),
        }
    }

    /// The bound configuration
    pub fn config(&self) -> &Arc<SlugConfig> {
        &self.config
    }

    /// The bound cache, if any
    pub fn cache(&self) -> Option<&Arc<SlugCache>> {
        self.cache.as_ref()
    }

    /// Slugify text
    pub fn slugify(&self, text: &str) -> String {
        self.pipeline
            .run_cached(text, &self.config, self.cache.as_deref())
    }

    /// Slugify a value after checking that it is text
    pub fn slugify_input<T: SlugInput + ?Sized>(&self, input: &T) -> Result<String> {
        let text = require_text(input)?;
        Ok(self.slugify(text))
    }

    /// Slugify a run of already validated texts, in order
    pub fn slugify_all(&self, texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| self.slugify(text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slugger_uses_cache() {
        let cache = Arc::new(SlugCache::new(8));
        let slugger = Slugger::with_cache(Arc::new(SlugConfig::default()), cache.clone());

        let slugs = slugger.slugify_all(&["Hello World", "Hello World", "Other"]);
        assert_eq!(slugs, vec!["hello-world", "hello-world", "other"]);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_slugger_rejects_non_text() {
        let slugger = Slugger::new(Arc::new(SlugConfig::default()));
        assert!(slugger.slugify_input(&json!(42)).is_err());
        assert_eq!(slugger.slugify_input(&json!("A B")).unwrap(), "a-b");
    }
}
