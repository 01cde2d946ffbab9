//! Bag-of-words intent scorer used when no dispatch route matches

use clinic_core::{Intent, IntentCorpus};

/// Reply when no intent scores above zero
pub const FALLBACK_REPLY: &str = "Sorry, I didn't understand that.";

/// Lower-case, strip ASCII punctuation and split on whitespace
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Two words are similar when either starts with the other's first two characters.
///
/// This is deliberately crude: "at" is similar to "age", "cat" to "car".
pub fn word_similarity(a: &str, b: &str) -> bool {
    a.starts_with(prefix2(b)) || b.starts_with(prefix2(a))
}

fn prefix2(word: &str) -> &str {
    match word.char_indices().nth(2) {
        Some((end, _)) => &word[..end],
        None => word,
    }
}

/// Count (pattern word, user word) pairs that are equal or similar
pub fn pattern_score(pattern_words: &[String], user_words: &[String]) -> usize {
    pattern_words
        .iter()
        .map(|pw| {
            user_words
                .iter()
                .filter(|uw| pw == *uw || word_similarity(pw, uw))
                .count()
        })
        .sum()
}

/// Highest-scoring intent for a message, with its score.
///
/// Only a strictly greater score replaces the current best, so the first
/// intent reaching the top score wins. Returns `None` when nothing scores.
pub fn best_intent<'a>(corpus: &'a IntentCorpus, message: &str) -> Option<(&'a Intent, usize)> {
    let user_words = tokenize(message);
    let mut best = None;
    let mut best_score = 0;

    for intent in &corpus.intents {
        for pattern in &intent.patterns {
            let score = pattern_score(&tokenize(pattern), &user_words);
            if score > best_score {
                best_score = score;
                best = Some(intent);
            }
        }
    }

    best.map(|intent| (intent, best_score))
}
