//! Text normalization shared by queries and record names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decompose, drop diacritics, lowercase and collapse whitespace.
///
/// ```rust
/// use cnpj_core::search::normalize_text;
///
/// assert_eq!(normalize_text("  Açúcar   União  "), "acucar uniao");
/// ```
pub fn normalize_text(input: &str) -> String {
    let folded: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-delimited tokens of already normalized text.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}
