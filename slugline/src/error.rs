//! API error types

use slugline_core::{ConfigError, ErrorKind, SlugError};
use slugline_engine::EngineError;
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-text input or invalid configuration
    #[error(transparent)]
    Slug(SlugError),

    /// Batch execution failed
    #[error("engine error: {0}")]
    Engine(EngineError),
}

impl ApiError {
    /// Type or config classification, for input and configuration errors
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Slug(err) => Some(err.kind()),
            ApiError::Engine(err) => err.kind(),
        }
    }

    /// Batch index that triggered the failure, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            ApiError::Slug(err) => err.index(),
            ApiError::Engine(_) => None,
        }
    }
}

impl From<SlugError> for ApiError {
    fn from(err: SlugError) -> Self {
        ApiError::Slug(err)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Slug(SlugError::Config(err))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Slug(err) => ApiError::Slug(err),
            other => ApiError::Engine(other),
        }
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
