//! Core error types
//!
//! Two kinds of failure exist at this layer: input that is not text, and
//! configuration that fails validation. Both are raised before any
//! transformation runs.

use thiserror::Error;

/// Broad classification of a [`SlugError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input was not a textual value
    Type,
    /// Configuration was malformed
    Config,
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Separator is the empty string
    #[error("separator must not be empty")]
    EmptySeparator,

    /// Separator contains letters or digits
    #[error("separator {0:?} must not contain ASCII letters or digits")]
    AlphanumericSeparator(String),

    /// A custom map entry has an empty key
    #[error("custom map keys must not be empty")]
    EmptyCustomMapKey,

    /// The custom map could not be compiled into a matcher
    #[error("invalid custom map: {0}")]
    InvalidCustomMap(String),

    /// The word pattern is not a valid regular expression
    #[error("invalid word_regex {pattern:?}: {reason}")]
    InvalidWordRegex {
        /// Pattern as given
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// `max_length` was zero
    #[error("max_length must be greater than 0")]
    ZeroMaxLength,

    /// Batch chunk size was zero
    #[error("chunk_size must be greater than 0")]
    ZeroChunkSize,

    /// Worker count was zero
    #[error("workers must be greater than 0")]
    ZeroWorkers,

    /// Concurrency limit was zero
    #[error("max_in_flight must be greater than 0")]
    ZeroConcurrency,

    /// Unknown execution mode name
    #[error("unknown execution mode {0:?} (expected serial, thread or process)")]
    InvalidMode(String),
}

/// Errors surfaced by slug generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// Input is not a textual value
    #[error("expected text{}, found {found}", at_index(.index))]
    Type {
        /// Position of the offending item within a batch
        index: Option<usize>,
        /// Name of the type that was supplied instead
        found: &'static str,
    },

    /// A batch was not a sequence of values
    #[error("expected a sequence of text, found {found}")]
    NotSequence {
        /// Name of the type that was supplied instead
        found: &'static str,
    },

    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SlugError {
    /// Create a type error for a single (non-batch) input
    pub fn not_text(found: &'static str) -> Self {
        SlugError::Type { index: None, found }
    }

    /// Create a type error for the batch item at `index`
    pub fn not_text_at(index: usize, found: &'static str) -> Self {
        SlugError::Type {
            index: Some(index),
            found,
        }
    }

    /// Which kind of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlugError::Type { .. } | SlugError::NotSequence { .. } => ErrorKind::Type,
            SlugError::Config(_) => ErrorKind::Config,
        }
    }

    /// Batch index that triggered the failure, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            SlugError::Type { index, .. } => *index,
            SlugError::NotSequence { .. } | SlugError::Config(_) => None,
        }
    }
}

fn at_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at index {i}"),
        None => String::new(),
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, SlugError>;
