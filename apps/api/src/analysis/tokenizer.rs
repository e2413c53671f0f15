//! Tokenizer: lowercases text, strips punctuation and drops stop words.
//!
//! Hyphens survive normalization because technical terms use them
//! (`ci-cd`, `front-end`). Output keeps source order so the keyword
//! extractor can build phrases from adjacent tokens.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Tokens this short or shorter are dropped.
const MAX_DROPPED_LEN: usize = 2;

/// Common English function words plus job-posting filler.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now",
    "old", "see", "two", "who", "whom", "did", "let", "put", "say", "she", "too", "use", "way",
    "with", "this", "that", "from", "they", "will", "have", "been", "were", "said", "each",
    "which", "their", "there", "what", "when", "where", "while", "would", "could", "should",
    "about", "into", "than", "them", "then", "these", "those", "some", "such", "only", "over",
    "also", "just", "more", "most", "other", "very", "well", "your", "yours", "ours", "within",
    "upon", "able", "must", "need", "needs", "like", "make", "made", "many", "much", "here",
    "both", "same", "own", "why", "does", "doing", "done", "being", "because", "before",
    "after", "above", "below", "between", "through", "during", "under", "again", "further",
    "once", "few", "nor", "off", "per", "via", "etc", "including", "include", "includes",
    "across", "among", "around", "every", "either", "whether", "yet", "ago", "least", "less",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Returns true when `word` (already lowercase) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Lowercases `text` and blanks out every character outside `[a-z0-9\s-]`.
///
/// Shared with the domain vocabulary so configured terms are compared in the
/// same shape as extracted tokens.
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Splits `text` into normalized tokens, in source order, without dedup.
pub fn normalize(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .filter(|token| token.len() > MAX_DROPPED_LEN)
        // a run of bare hyphens carries no content
        .filter(|token| token.chars().any(|c| c.is_ascii_alphanumeric()))
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// True when `needle` occurs in `haystack` as a contiguous run of whole tokens.
pub fn contains_token_run<A, B>(haystack: &[A], needle: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack
            .windows(needle.len())
            .any(|window| window.iter().zip(needle).all(|(a, b)| a.as_ref() == b.as_ref()))
}
