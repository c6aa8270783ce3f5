//! Length truncation

use super::tokens::{extract_words, strip_separators};

/// Truncate a slug to at most `max_length` characters
///
/// With `word_boundary`, whole words are kept while they fit; if not even the
/// first word fits it is cut at `max_length`. Without it, the slug is cut at
/// `max_length` and any dangling separator fragment is removed. A
/// `max_length` of zero yields the empty string. Edge separators are trimmed
/// before measuring, so they never count against the length.
pub fn truncate_slug(
    slug: &str,
    max_length: usize,
    separator: &str,
    word_boundary: bool,
) -> String {
    if max_length == 0 {
        return String::new();
    }
    let slug = strip_separators(slug, separator);
    if slug.chars().count() <= max_length {
        return slug.to_string();
    }

    if !word_boundary {
        let cut: String = slug.chars().take(max_length).collect();
        let cut = cut.trim_end_matches(|c: char| separator.contains(c));
        return strip_separators(cut, separator).to_string();
    }

    let separator_len = separator.chars().count();
    let mut out = String::with_capacity(max_length);
    let mut out_len = 0;
    let mut first_word = None;

    for word in extract_words(slug, separator) {
        first_word.get_or_insert(word);
        let word_len = word.chars().count();
        let needed = if out.is_empty() {
            word_len
        } else {
            out_len + separator_len + word_len
        };
        if needed > max_length {
            break;
        }
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(word);
        out_len = needed;
    }

    if out.is_empty() {
        if let Some(word) = first_word {
            return word.chars().take(max_length).collect();
        }
    }
    out
}
