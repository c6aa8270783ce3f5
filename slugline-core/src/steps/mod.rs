//! Pipeline steps
//!
//! Each step is a pure function from text to text. Steps hold no state and
//! never mutate the configuration, so one step table serves every thread.

pub mod emoji;
pub mod normalize;
pub mod tokens;
pub mod transliterate;
pub mod truncate;

use crate::config::SlugConfig;

/// A single text transform in the slug pipeline
pub trait PipelineStep: Send + Sync {
    /// Stable step name, used in traces and logs
    fn name(&self) -> &'static str;

    /// Transform `text` under `config`
    fn apply(&self, text: String, config: &SlugConfig) -> String;
}

/// Step 1: entity decoding and Unicode normalization
#[derive(Debug, Clone, Copy)]
pub struct Normalize;

impl PipelineStep for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        let decoded = normalize::decode_html_entities_and_refs(
            &text,
            config.decode_entities(),
            config.decode_decimal(),
            config.decode_hexadecimal(),
        );
        normalize::normalize_unicode(&decoded)
    }
}

/// Step 2: custom map substitution
#[derive(Debug, Clone, Copy)]
pub struct CustomMapSubstitution;

impl PipelineStep for CustomMapSubstitution {
    fn name(&self) -> &'static str {
        "custom_map"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        if config.custom_map().is_empty() {
            return text;
        }
        config.custom_map().apply(&text).into_owned()
    }
}

/// Step 3: emoji to name, when enabled
#[derive(Debug, Clone, Copy)]
pub struct EmojiSubstitution;

impl PipelineStep for EmojiSubstitution {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        if !config.process_emoji() {
            return text;
        }
        emoji::convert_emojis(&text)
    }
}

/// Step 4: transliteration to ASCII
#[derive(Debug, Clone, Copy)]
pub struct Transliterate;

impl PipelineStep for Transliterate {
    fn name(&self) -> &'static str {
        "transliterate"
    }

    fn apply(&self, text: String, _config: &SlugConfig) -> String {
        if text.is_ascii() {
            return text;
        }
        transliterate::transliterate_text(&text)
    }
}

/// Step 5: case folding, when enabled
#[derive(Debug, Clone, Copy)]
pub struct Lowercase;

impl PipelineStep for Lowercase {
    fn name(&self) -> &'static str {
        "lowercase"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        if !config.lowercase() {
            return text;
        }
        tokens::to_lowercase(&text)
    }
}

/// Step 6: drop characters outside the token alphabet
#[derive(Debug, Clone, Copy)]
pub struct StripDisallowed;

impl PipelineStep for StripDisallowed {
    fn name(&self) -> &'static str {
        "strip"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        tokens::strip_disallowed(&text, config.separator())
    }
}

/// Step 7: collapse whitespace and punctuation runs into one separator
///
/// With a `word_regex`, only the words it matches are kept.
#[derive(Debug, Clone, Copy)]
pub struct CollapseSeparators;

impl PipelineStep for CollapseSeparators {
    fn name(&self) -> &'static str {
        "collapse"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        match config.word_regex() {
            Some(pattern) => tokens::collapse_matched_words(&text, pattern, config.separator()),
            None => tokens::collapse_separators(&text, config.separator()),
        }
    }
}

/// Step 8: stopword removal
#[derive(Debug, Clone, Copy)]
pub struct RemoveStopwords;

impl PipelineStep for RemoveStopwords {
    fn name(&self) -> &'static str {
        "stopwords"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        if config.stopwords().is_empty() {
            return text;
        }
        tokens::filter_stopwords(&text, config.separator(), config.stopwords())
    }
}

/// Step 9: truncation to `max_length`
#[derive(Debug, Clone, Copy)]
pub struct Truncate;

impl PipelineStep for Truncate {
    fn name(&self) -> &'static str {
        "truncate"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        match config.max_length() {
            Some(max) => {
                truncate::truncate_slug(&text, max, config.separator(), config.word_boundary())
            }
            None => text,
        }
    }
}

/// Step 10: trim leading and trailing separators
#[derive(Debug, Clone, Copy)]
pub struct TrimSeparators;

impl PipelineStep for TrimSeparators {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn apply(&self, text: String, config: &SlugConfig) -> String {
        tokens::strip_separators(&text, config.separator()).to_string()
    }
}
