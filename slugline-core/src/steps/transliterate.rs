//! Transliteration of non-ASCII scripts

use super::emoji;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Replace non-ASCII graphemes with ASCII approximations
///
/// Emoji still present at this point are dropped rather than spelled out;
/// naming them is the job of the emoji step. Characters with no known
/// approximation are removed.
pub fn transliterate_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for grapheme in text.graphemes(true) {
        if grapheme.is_ascii() {
            out.push_str(grapheme);
            continue;
        }
        if emoji::is_emoji(grapheme) {
            out.push(' ');
            continue;
        }
        for c in grapheme.chars() {
            if c.is_ascii() {
                out.push(c);
            } else if let Some(ascii) = modern_greek(c) {
                out.push_str(ascii);
            } else if let Some(ascii) = deunicode::deunicode_char(c) {
                out.push_str(ascii);
            }
        }
    }

    out
}

/// Modern Greek readings that differ from the generic table
///
/// Eta is read as `i` in every accented form, so the base letter decides.
fn modern_greek(c: char) -> Option<&'static str> {
    match std::iter::once(c).nfd().next()? {
        'η' => Some("i"),
        'Η' => Some("I"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate_cyrillic() {
        assert_eq!(transliterate_text("Привет мир"), "Privet mir");
        assert_eq!(transliterate_text("Москва"), "Moskva");
        assert_eq!(transliterate_text(""), "");
    }

    #[test]
    fn test_transliterate_latin_accents() {
        assert_eq!(transliterate_text("Café déjà vu"), "Cafe deja vu");
        assert_eq!(transliterate_text("naïve façade"), "naive facade");
    }

    #[test]
    fn test_transliterate_greek() {
        assert_eq!(transliterate_text("Γειά σου Κόσμε"), "Geia sou Kosme");
        assert_eq!(transliterate_text("Αθήνα"), "Athina");
        assert_eq!(transliterate_text("Ηλιος ἡ"), "Ilios i");
    }

    #[test]
    fn test_transliterate_drops_emoji() {
        assert_eq!(transliterate_text("hello 🚀").trim(), "hello");
    }
}
