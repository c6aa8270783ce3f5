//! Emoji lookup and substitution
//!
//! Emoji are matched per extended grapheme cluster, so ZWJ sequences,
//! skin-tone variants and flag pairs resolve as one emoji.

use unicode_segmentation::UnicodeSegmentation;

const VARIATION_SELECTOR_16: char = '\u{fe0f}';

/// Descriptive name for an emoji grapheme
///
/// Flag names lose their `flag: ` prefix, so `🇯🇵` is `Japan`.
pub fn emoji_name(grapheme: &str) -> Option<&'static str> {
    if grapheme.is_ascii() {
        return None;
    }

    let emoji = emojis::get(grapheme).or_else(|| {
        let bare: String = grapheme
            .chars()
            .filter(|&c| c != VARIATION_SELECTOR_16)
            .collect();
        emojis::get(&bare)
    })?;

    let name = emoji.name();
    Some(name.strip_prefix("flag: ").unwrap_or(name))
}

/// Whether a grapheme is an emoji
pub fn is_emoji(grapheme: &str) -> bool {
    emoji_name(grapheme).is_some()
}

/// Replace every emoji with its name, padded with spaces
pub fn convert_emojis(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 16);
    for grapheme in text.graphemes(true) {
        match emoji_name(grapheme) {
            Some(name) => {
                out.push(' ');
                out.push_str(name);
                out.push(' ');
            }
            None => out.push_str(grapheme),
        }
    }
    out
}
