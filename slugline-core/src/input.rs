//! Input validation
//!
//! Slug generation only accepts text. Values arriving from dynamic sources
//! (JSON payloads, optional fields) go through [`SlugInput`], which reports
//! non-text values as type errors instead of stringifying them.

use crate::error::{Result, SlugError};
use serde_json::Value;
use std::borrow::Cow;

/// A value that may or may not be text
pub trait SlugInput {
    /// The text, if this value is textual
    fn as_text(&self) -> Option<&str>;

    /// Name of the value's type, used in error messages
    fn type_name(&self) -> &'static str;
}

impl SlugInput for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "text"
    }
}

impl SlugInput for String {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "text"
    }
}

impl SlugInput for Box<str> {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "text"
    }
}

impl SlugInput for Cow<'_, str> {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "text"
    }
}

impl<T: SlugInput + ?Sized> SlugInput for &T {
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

impl<T: SlugInput> SlugInput for Option<T> {
    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(SlugInput::as_text)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Some(inner) => inner.type_name(),
            None => "none",
        }
    }
}

impl SlugInput for Value {
    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "text",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Require a single input to be text
pub fn require_text<T: SlugInput + ?Sized>(input: &T) -> Result<&str> {
    input
        .as_text()
        .ok_or_else(|| SlugError::not_text(input.type_name()))
}

/// Validate every batch item up front
///
/// Fails on the first non-text item, naming its index. Nothing is returned
/// for the items that did validate.
pub fn collect_texts<T: SlugInput>(items: &[T]) -> Result<Vec<&str>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_text()
                .ok_or_else(|| SlugError::not_text_at(index, item.type_name()))
        })
        .collect()
}

/// Validate a JSON batch, which must be an array of strings
pub fn collect_value_texts(batch: &Value) -> Result<Vec<&str>> {
    match batch {
        Value::Array(items) => collect_texts(items),
        other => Err(SlugError::NotSequence {
            found: other.type_name(),
        }),
    }
}
