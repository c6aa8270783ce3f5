//! Slug configuration
//!
//! [`SlugConfig`] is validated once, at construction, and is read-only
//! afterwards. Every pipeline step receives it by reference, and batch
//! executors share it behind an `Arc`.

use crate::error::ConfigError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Default configuration constants
pub mod defaults {
    /// Default token separator
    pub const SEPARATOR: &str = "-";
}

/// Case-sensitive replacement table applied before transliteration
///
/// Keys are NFKC-normalized so they line up with normalized input. When keys
/// overlap, the longest one wins.
#[derive(Clone, Default)]
pub struct CustomMap {
    entries: BTreeMap<String, String>,
    matcher: Option<Regex>,
}

impl CustomMap {
    /// Build a custom map from key/replacement pairs
    pub fn new<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut normalized = BTreeMap::new();
        for (key, value) in entries {
            let key: String = key.into();
            if key.is_empty() {
                return Err(ConfigError::EmptyCustomMapKey);
            }
            normalized.insert(key.nfkc().collect::<String>(), value.into());
        }

        if normalized.is_empty() {
            return Ok(Self::default());
        }

        let mut keys: Vec<&String> = normalized.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let pattern = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let matcher =
            Regex::new(&pattern).map_err(|e| ConfigError::InvalidCustomMap(e.to_string()))?;

        Ok(Self {
            entries: normalized,
            matcher: Some(matcher),
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replacement for `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every key occurrence in `text`
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.matcher {
            Some(matcher) => matcher.replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                self.entries
                    .get(matched)
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            }),
            None => Cow::Borrowed(text),
        }
    }
}

impl fmt::Debug for CustomMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl PartialEq for CustomMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for CustomMap {}

/// Regular expression selecting the words that make up a slug
///
/// Compiled once, when the configuration is built. Two patterns are equal
/// when their source text is.
#[derive(Clone)]
pub struct WordPattern {
    regex: Regex,
}

impl WordPattern {
    /// Compile `pattern`
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidWordRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Source text of the pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Non-overlapping matches in `text`, left to right
    pub fn find_words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(text).map(|m| m.as_str())
    }
}

impl fmt::Debug for WordPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WordPattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for WordPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for WordPattern {}

/// Wire and builder representation of a configuration, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct ConfigRepr {
    separator: String,
    custom_map: BTreeMap<String, String>,
    stopwords: BTreeSet<String>,
    process_emoji: bool,
    lowercase: bool,
    max_length: Option<usize>,
    word_boundary: bool,
    word_regex: Option<String>,
    decode_entities: bool,
    decode_decimal: bool,
    decode_hexadecimal: bool,
}

impl Default for ConfigRepr {
    fn default() -> Self {
        Self {
            separator: defaults::SEPARATOR.to_string(),
            custom_map: BTreeMap::new(),
            stopwords: BTreeSet::new(),
            process_emoji: false,
            lowercase: true,
            max_length: None,
            word_boundary: true,
            word_regex: None,
            decode_entities: true,
            decode_decimal: true,
            decode_hexadecimal: true,
        }
    }
}

/// Validated, immutable slug configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "ConfigRepr", into = "ConfigRepr")]
pub struct SlugConfig {
    separator: String,
    custom_map: CustomMap,
    stopwords: BTreeSet<String>,
    process_emoji: bool,
    lowercase: bool,
    max_length: Option<usize>,
    word_boundary: bool,
    word_regex: Option<WordPattern>,
    decode_entities: bool,
    decode_decimal: bool,
    decode_hexadecimal: bool,
    fingerprint: Arc<str>,
}

impl SlugConfig {
    /// Create a configuration builder
    pub fn builder() -> SlugConfigBuilder {
        SlugConfigBuilder::default()
    }

    /// Token separator
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Custom replacement table
    pub fn custom_map(&self) -> &CustomMap {
        &self.custom_map
    }

    /// Lowercased stopwords
    pub fn stopwords(&self) -> &BTreeSet<String> {
        &self.stopwords
    }

    /// Whether emoji are replaced by their names
    pub fn process_emoji(&self) -> bool {
        self.process_emoji
    }

    /// Whether output is case-folded
    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    /// Maximum slug length in characters
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Whether truncation respects separator boundaries
    pub fn word_boundary(&self) -> bool {
        self.word_boundary
    }

    /// Pattern selecting slug words, if words are matched rather than split
    pub fn word_regex(&self) -> Option<&WordPattern> {
        self.word_regex.as_ref()
    }

    /// Whether named HTML entities are decoded
    pub fn decode_entities(&self) -> bool {
        self.decode_entities
    }

    /// Whether decimal character references are decoded
    pub fn decode_decimal(&self) -> bool {
        self.decode_decimal
    }

    /// Whether hexadecimal character references are decoded
    pub fn decode_hexadecimal(&self) -> bool {
        self.decode_hexadecimal
    }

    /// Canonical encoding of every field that affects the output
    ///
    /// Equal fingerprints imply equal slugs for equal input.
    pub fn fingerprint(&self) -> &Arc<str> {
        &self.fingerprint
    }

    fn to_repr(&self) -> ConfigRepr {
        ConfigRepr {
            separator: self.separator.clone(),
            custom_map: self.custom_map.entries.clone(),
            stopwords: self.stopwords.clone(),
            process_emoji: self.process_emoji,
            lowercase: self.lowercase,
            max_length: self.max_length,
            word_boundary: self.word_boundary,
            word_regex: self.word_regex.as_ref().map(|p| p.as_str().to_string()),
            decode_entities: self.decode_entities,
            decode_decimal: self.decode_decimal,
            decode_hexadecimal: self.decode_hexadecimal,
        }
    }
}

impl Default for SlugConfig {
    fn default() -> Self {
        let repr = ConfigRepr::default();
        let fingerprint = Arc::from(format!("{repr:?}"));
        Self {
            separator: repr.separator,
            custom_map: CustomMap::default(),
            stopwords: repr.stopwords,
            process_emoji: repr.process_emoji,
            lowercase: repr.lowercase,
            max_length: repr.max_length,
            word_boundary: repr.word_boundary,
            word_regex: None,
            decode_entities: repr.decode_entities,
            decode_decimal: repr.decode_decimal,
            decode_hexadecimal: repr.decode_hexadecimal,
            fingerprint,
        }
    }
}

impl TryFrom<ConfigRepr> for SlugConfig {
    type Error = ConfigError;

    fn try_from(mut repr: ConfigRepr) -> Result<Self, Self::Error> {
        if repr.separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        if repr.separator.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::AlphanumericSeparator(repr.separator));
        }
        if repr.max_length == Some(0) {
            return Err(ConfigError::ZeroMaxLength);
        }

        let custom_map = CustomMap::new(repr.custom_map.clone())?;
        let word_regex = repr
            .word_regex
            .as_deref()
            .map(WordPattern::new)
            .transpose()?;
        repr.custom_map = custom_map.entries.clone();
        repr.stopwords = repr
            .stopwords
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let fingerprint = Arc::from(format!("{repr:?}"));

        Ok(Self {
            separator: repr.separator,
            custom_map,
            stopwords: repr.stopwords,
            process_emoji: repr.process_emoji,
            lowercase: repr.lowercase,
            max_length: repr.max_length,
            word_boundary: repr.word_boundary,
            word_regex,
            decode_entities: repr.decode_entities,
            decode_decimal: repr.decode_decimal,
            decode_hexadecimal: repr.decode_hexadecimal,
            fingerprint,
        })
    }
}

impl From<SlugConfig> for ConfigRepr {
    fn from(config: SlugConfig) -> Self {
        config.to_repr()
    }
}

impl fmt::Debug for SlugConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlugConfig")
            .field("separator", &self.separator)
            .field("custom_map", &self.custom_map)
            .field("stopwords", &self.stopwords)
            .field("process_emoji", &self.process_emoji)
            .field("lowercase", &self.lowercase)
            .field("max_length", &self.max_length)
            .field("word_boundary", &self.word_boundary)
            .field("word_regex", &self.word_regex)
            .field("decode_entities", &self.decode_entities)
            .field("decode_decimal", &self.decode_decimal)
            .field("decode_hexadecimal", &self.decode_hexadecimal)
            .finish()
    }
}

impl PartialEq for SlugConfig {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for SlugConfig {}

/// Fluent builder for [`SlugConfig`]
#[derive(Debug, Default)]
pub struct SlugConfigBuilder {
    repr: ConfigRepr,
}

impl SlugConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.repr.separator = separator.into();
        self
    }

    /// Replace the custom map
    pub fn custom_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.repr.custom_map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Add one custom map entry
    pub fn map_char(mut self, key: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.repr.custom_map.insert(key.into(), replacement.into());
        self
    }

    /// Replace the stopword set
    pub fn stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repr.stopwords = words.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable emoji-to-name substitution
    pub fn process_emoji(mut self, enabled: bool) -> Self {
        self.repr.process_emoji = enabled;
        self
    }

    /// Enable or disable case folding
    pub fn lowercase(mut self, enabled: bool) -> Self {
        self.repr.lowercase = enabled;
        self
    }

    /// Set the maximum slug length (None = unlimited)
    pub fn max_length(mut self, max: Option<usize>) -> Self {
        self.repr.max_length = max;
        self
    }

    /// Choose whether truncation respects separator boundaries
    pub fn word_boundary(mut self, enabled: bool) -> Self {
        self.repr.word_boundary = enabled;
        self
    }

    /// Match words with `pattern` instead of splitting on punctuation
    pub fn word_regex(mut self, pattern: impl Into<String>) -> Self {
        self.repr.word_regex = Some(pattern.into());
        self
    }

    /// Enable or disable named HTML entity decoding
    pub fn decode_entities(mut self, enabled: bool) -> Self {
        self.repr.decode_entities = enabled;
        self
    }

    /// Enable or disable decimal character reference decoding
    pub fn decode_decimal(mut self, enabled: bool) -> Self {
        self.repr.decode_decimal = enabled;
        self
    }

    /// Enable or disable hexadecimal character reference decoding
    pub fn decode_hexadecimal(mut self, enabled: bool) -> Self {
        self.repr.decode_hexadecimal = enabled;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<SlugConfig, ConfigError> {
        SlugConfig::try_from(self.repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SlugConfig::default();
        assert_eq!(config.separator(), "-");
        assert!(config.lowercase());
        assert!(!config.process_emoji());
        assert!(config.word_boundary());
        assert_eq!(config.max_length(), None);
        assert!(config.custom_map().is_empty());
        assert_eq!(config, SlugConfig::builder().build().unwrap());
    }

    #[test]
    fn test_separator_validation() {
        assert_eq!(
            SlugConfig::builder().separator("").build().unwrap_err(),
            ConfigError::EmptySeparator
        );
        assert_eq!(
            SlugConfig::builder().separator("x").build().unwrap_err(),
            ConfigError::AlphanumericSeparator("x".to_string())
        );
        assert!(SlugConfig::builder().separator("__").build().is_ok());
    }

    #[test]
    fn test_max_length_validation() {
        assert_eq!(
            SlugConfig::builder().max_length(Some(0)).build().unwrap_err(),
            ConfigError::ZeroMaxLength
        );
    }

    #[test]
    fn test_custom_map_validation() {
        assert_eq!(
            SlugConfig::builder().map_char("", "x").build().unwrap_err(),
            ConfigError::EmptyCustomMapKey
        );
    }

    #[test]
    fn test_custom_map_longest_match() {
        let map = CustomMap::new([("a", "1"), ("ab", "2")]).unwrap();
        assert_eq!(map.apply("abc a"), "2c 1");
        assert_eq!(map.apply("xyz"), "xyz");
    }

    #[test]
    fn test_custom_map_is_case_sensitive() {
        let map = CustomMap::new([("ä", "ae")]).unwrap();
        assert_eq!(map.apply("ä Ä"), "ae Ä");
    }

    #[test]
    fn test_custom_map_keys_are_normalized() {
        // "a" followed by a combining diaeresis composes to "ä"
        let map = CustomMap::new([("a\u{0308}", "ae")]).unwrap();
        assert_eq!(map.get("ä"), Some("ae"));
    }

    #[test]
    fn test_stopwords_are_lowercased() {
        let config = SlugConfig::builder()
            .stopwords(["The", " AND ", ""])
            .build()
            .unwrap();
        let words: Vec<_> = config.stopwords().iter().map(String::as_str).collect();
        assert_eq!(words, vec!["and", "the"]);
    }

    #[test]
    fn test_fingerprint_distinguishes_separator() {
        let dash = SlugConfig::default();
        let underscore = SlugConfig::builder().separator("_").build().unwrap();
        assert_ne!(dash.fingerprint(), underscore.fingerprint());
        assert_eq!(dash.fingerprint(), SlugConfig::default().fingerprint());
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let config = SlugConfig::builder()
            .separator("_")
            .stopwords(["a"])
            .max_length(Some(12))
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: SlugConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);

        let bad = serde_json::from_str::<SlugConfig>(r#"{"separator": ""}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_word_regex() {
        let config = SlugConfig::builder()
            .word_regex("[A-Z][a-z]+")
            .build()
            .unwrap();
        let pattern = config.word_regex().unwrap();
        let words: Vec<_> = pattern.find_words("The Quick brown Fox").collect();
        assert_eq!(words, vec!["The", "Quick", "Fox"]);
        assert_ne!(config.fingerprint(), SlugConfig::default().fingerprint());

        let json = serde_json::to_string(&config).unwrap();
        let back: SlugConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.word_regex(), Some(pattern));

        let err = SlugConfig::builder()
            .word_regex("[unclosed")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWordRegex { .. }));
        assert_eq!(crate::SlugError::from(err).kind(), crate::ErrorKind::Config);
    }
}
