/// Split text into lowercase index terms.
///
/// A term is a maximal run of word characters: Unicode alphanumerics and
/// `_`. Everything else separates terms. Documents and queries go through
/// this same function so their terms line up during scoring.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
