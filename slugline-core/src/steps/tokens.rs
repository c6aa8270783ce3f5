//! Case folding, character filtering and separator handling
//!
//! After [`collapse_separators`] a slug is a sequence of ASCII alphanumeric
//! tokens joined by the separator. Since a valid separator contains no
//! alphanumerics, splitting on it recovers the tokens exactly.

use crate::config::WordPattern;
use std::collections::BTreeSet;

/// Lowercase text
pub fn to_lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Drop characters outside the token alphabet
///
/// Kept: ASCII alphanumerics, ASCII whitespace and punctuation (future
/// boundaries), and characters of the separator itself.
pub fn strip_disallowed(text: &str, separator: &str) -> String {
    text.chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric()
                || c.is_ascii_whitespace()
                || c.is_ascii_punctuation()
                || separator.contains(c)
        })
        .collect()
}

/// Replace every run of non-alphanumeric characters by one separator
pub fn collapse_separators(text: &str, separator: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending {
                out.push_str(separator);
                pending = false;
            }
            out.push(c);
        } else {
            pending = true;
        }
    }

    if pending {
        out.push_str(separator);
    }
    out
}

/// Join the words `pattern` finds in `text`, each collapsed to slug form
///
/// Text between matches is dropped, as are matches with no alphanumerics.
pub fn collapse_matched_words(text: &str, pattern: &WordPattern, separator: &str) -> String {
    let words: Vec<String> = pattern
        .find_words(text)
        .map(|word| strip_separators(&collapse_separators(word, separator), separator).to_string())
        .filter(|word| !word.is_empty())
        .collect();
    join_words(&words, separator)
}

/// Split a collapsed slug into its words, skipping empty edges
pub fn extract_words<'a>(slug: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    slug.split(separator).filter(|w| !w.is_empty())
}

/// Join words with the separator
pub fn join_words<S: AsRef<str>>(words: &[S], separator: &str) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(word.as_ref());
    }
    out
}

/// Remove whole tokens that appear in `stopwords`
///
/// Matching is case-insensitive; `stopwords` is expected lowercase.
pub fn filter_stopwords(slug: &str, separator: &str, stopwords: &BTreeSet<String>) -> String {
    let kept: Vec<&str> = slug
        .split(separator)
        .filter(|token| token.is_empty() || !stopwords.contains(&token.to_lowercase()))
        .collect();
    join_words(&kept, separator)
}

/// Strip leading and trailing separators
pub fn strip_separators<'a>(slug: &'a str, separator: &str) -> &'a str {
    slug.trim_start_matches(separator)
        .trim_end_matches(separator)
}
