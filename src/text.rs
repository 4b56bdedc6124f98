//! Transcript normalization shared by all corpus scanners.

use deunicode::deunicode;

use crate::types::Transcript;

/// Clean a transcript for use as a training label.
///
/// - Transliterate non-ASCII characters to their closest ASCII equivalents.
/// - Strip surrounding whitespace.
/// - Convert to lower case.
/// - Remove all ASCII punctuation except `'` (apostrophe), which carries
///   linguistic meaning in contractions.
pub fn clean(text: &str) -> Transcript {
    let text = deunicode(text);
    let text = text.trim().to_lowercase();
    let stripped: String = text
        .chars()
        .filter(|&ch| !(ch.is_ascii_punctuation() && ch != '\''))
        .collect();
    // Punctuation removal can expose edge whitespace ("nice ." -> "nice ").
    stripped.trim().to_string()
}
