//! HTML reference decoding and Unicode normalization

use unicode_normalization::{is_nfkc_quick, IsNormalized, UnicodeNormalization};

/// Apply NFKC normalization
///
/// Compatibility composition folds presentation forms (`ﬁ`, full-width
/// letters, circled digits) into plain characters and composes accents so
/// custom map keys match.
pub fn normalize_unicode(text: &str) -> String {
    if is_nfkc_quick(text.chars()) == IsNormalized::Yes {
        return text.to_string();
    }
    text.nfkc().collect()
}

/// Decode HTML entities and numeric character references
///
/// Decoding follows the HTML5 rules: the full named entity set, legacy names
/// without a trailing `;`, and replacement characters for invalid code
/// points. Each kind can be switched off independently; a reference of a
/// disabled kind is left as written.
pub fn decode_html_entities_and_refs(
    text: &str,
    decode_entities: bool,
    decode_decimal: bool,
    decode_hexadecimal: bool,
) -> String {
    if !(decode_entities || decode_decimal || decode_hexadecimal) || !text.contains('&') {
        return text.to_string();
    }
    if decode_entities && decode_decimal && decode_hexadecimal {
        return htmlize::unescape(text).into_owned();
    }

    // escape the ampersand of every disabled reference so it decodes to itself
    let mut guarded = String::with_capacity(text.len() + 16);
    for (i, c) in text.char_indices() {
        let enabled = || {
            reference_enabled(&text[i + 1..], decode_entities, decode_decimal, decode_hexadecimal)
        };
        if c == '&' && !enabled() {
            guarded.push_str("&amp;");
        } else {
            guarded.push(c);
        }
    }
    htmlize::unescape(guarded).into_owned()
}

fn reference_enabled(
    tail: &str,
    decode_entities: bool,
    decode_decimal: bool,
    decode_hexadecimal: bool,
) -> bool {
    match tail.strip_prefix('#') {
        Some(numeric) if numeric.starts_with(['x', 'X']) => decode_hexadecimal,
        Some(_) => decode_decimal,
        None => decode_entities,
    }
}
