//! Text normalization for ingredient and food class names.

/// Lowercase `text` and drop every character that is not a letter, digit or space.
///
/// Word boundaries are kept as spaces. Consecutive spaces are not collapsed; use [`words`]
/// to split without producing empty words.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split normalized text into its non-empty words.
pub fn words(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
