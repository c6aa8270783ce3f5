//! The slug pipeline
//!
//! The step order is fixed. Normalization runs first and on its own because
//! its output is half of the cache key; the remaining steps only run on a
//! cache miss.

use crate::cache::{CacheKey, SlugCache};
use crate::config::SlugConfig;
use crate::steps::{
    CollapseSeparators, CustomMapSubstitution, EmojiSubstitution, Lowercase, Normalize,
    PipelineStep, RemoveStopwords, StripDisallowed, Transliterate, TrimSeparators, Truncate,
};
use serde::Serialize;

static NORMALIZE: Normalize = Normalize;

static TRANSFORMS: [&dyn PipelineStep; 9] = [
    &CustomMapSubstitution,
    &EmojiSubstitution,
    &Transliterate,
    &Lowercase,
    &StripDisallowed,
    &CollapseSeparators,
    &RemoveStopwords,
    &Truncate,
    &TrimSeparators,
];

/// Output of one step, as recorded by [`Pipeline::trace`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepTrace {
    /// Step name
    pub step: &'static str,
    /// Text after the step ran
    pub output: String,
}

/// The standard ten-step pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    _private: (),
}

impl Pipeline {
    /// The one step order every slug goes through
    pub fn standard() -> Self {
        Self::default()
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps().map(|step| step.name()).collect()
    }

    fn steps(&self) -> impl Iterator<Item = &'static dyn PipelineStep> {
        std::iter::once(&NORMALIZE as &dyn PipelineStep).chain(TRANSFORMS.iter().copied())
    }

    /// Run every step without caching
    pub fn run(&self, text: &str, config: &SlugConfig) -> String {
        let normalized = NORMALIZE.apply(text.to_string(), config);
        self.transform(normalized, config)
    }

    /// Run the pipeline, consulting `cache` after normalization
    ///
    /// Hits return the stored slug unchanged; misses run steps 2 through 10
    /// and store the result.
    pub fn run_cached(&self, text: &str, config: &SlugConfig, cache: Option<&SlugCache>) -> String {
        let normalized = NORMALIZE.apply(text.to_string(), config);

        let cache = match cache {
            Some(cache) if cache.is_enabled() => cache,
            _ => return self.transform(normalized, config),
        };

        let key = CacheKey::new(config.fingerprint().clone(), normalized);
        if let Some(slug) = cache.get(&key) {
            return slug;
        }

        let slug = self.transform(key.text().to_string(), config);
        cache.put(key, slug.clone());
        slug
    }

    /// Record the output of every step
    pub fn trace(&self, text: &str, config: &SlugConfig) -> Vec<StepTrace> {
        let mut current = text.to_string();
        let mut traces = Vec::with_capacity(TRANSFORMS.len() + 1);

        for step in self.steps() {
            current = step.apply(current, config);
            log::trace!("step {:<13} -> {:?}", step.name(), current);
            traces.push(StepTrace {
                step: step.name(),
                output: current.clone(),
            });
        }

        traces
    }

    fn transform(&self, normalized: String, config: &SlugConfig) -> String {
        TRANSFORMS
            .iter()
            .fold(normalized, |text, step| step.apply(text, config))
    }
}
