//! Tokenizer adapter: raw text to word-like tokens.

/// Split text into word-like tokens on every non-alphanumeric character.
///
/// Contractions come apart here ("don't" -> "don", "t"), which is why the
/// stop-word list carries those bound fragments.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}
