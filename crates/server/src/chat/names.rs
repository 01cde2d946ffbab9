//! Patient name extraction from free text

use clinic_core::User;

/// Finds which known user a message talks about.
///
/// Implementations return the stored spelling of the user's name.
pub trait NameMatcher: Send + Sync {
    fn extract(&self, text: &str, users: &[User]) -> Option<String>;
}

/// Returns the first whitespace-separated word equal to a user name, ignoring case.
///
/// Multi-word names never match and punctuation stays attached to words,
/// so "Sasmita?" is not recognised.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTokenMatcher;

impl NameMatcher for ExactTokenMatcher {
    fn extract(&self, text: &str, users: &[User]) -> Option<String> {
        text.split_whitespace().find_map(|word| {
            let word = word.to_lowercase();
            users
                .iter()
                .find(|u| u.name.to_lowercase() == word)
                .map(|u| u.name.clone())
        })
    }
}

/// Matches whole names, including multi-word ones, as runs of words.
///
/// Surrounding punctuation is ignored. At each position the longest matching
/// name wins; the earliest position in the text wins overall.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseMatcher;

impl NameMatcher for PhraseMatcher {
    fn extract(&self, text: &str, users: &[User]) -> Option<String> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
            .collect();

        let names: Vec<(Vec<String>, &User)> = users
            .iter()
            .map(|u| {
                let parts: Vec<String> = u.name.split_whitespace().map(str::to_lowercase).collect();
                (parts, u)
            })
            .filter(|(parts, _)| !parts.is_empty())
            .collect();

        for start in 0..words.len() {
            let best = names
                .iter()
                .filter(|(parts, _)| words[start..].starts_with(parts))
                .max_by_key(|(parts, _)| parts.len());
            if let Some((_, user)) = best {
                return Some(user.name.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(names: &[&str]) -> Vec<User> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| User {
                user_id: i as u32 + 1,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_exact_token_is_case_insensitive() {
        let users = users(&["Sasmita", "Rahul"]);
        let matcher = ExactTokenMatcher;

        assert_eq!(
            matcher.extract("what is RAHUL's age or rahul age", &users),
            Some("Rahul".to_string())
        );
        assert_eq!(
            matcher.extract("profile sasmita", &users),
            Some("Sasmita".to_string())
        );
    }

    #[test]
    fn test_exact_token_first_word_wins() {
        let users = users(&["Sasmita", "Rahul"]);
        assert_eq!(
            ExactTokenMatcher.extract("rahul and sasmita", &users),
            Some("Rahul".to_string())
        );
    }

    #[test]
    fn test_exact_token_misses_punctuation_and_multi_word_names() {
        let users = users(&["Sasmita", "Anita Rao"]);
        let matcher = ExactTokenMatcher;

        assert_eq!(matcher.extract("age of Sasmita?", &users), None);
        assert_eq!(matcher.extract("age of anita rao", &users), None);
        assert_eq!(matcher.extract("", &users), None);
    }

    #[test]
    fn test_phrase_matches_multi_word_names() {
        let users = users(&["Anita", "Anita Rao", "Sasmita"]);
        let matcher = PhraseMatcher;

        assert_eq!(
            matcher.extract("contact of Anita Rao, please", &users),
            Some("Anita Rao".to_string())
        );
        assert_eq!(
            matcher.extract("age of anita?", &users),
            Some("Anita".to_string())
        );
        assert_eq!(
            matcher.extract("Sasmita and Anita Rao", &users),
            Some("Sasmita".to_string())
        );
        assert_eq!(matcher.extract("nobody here", &users), None);
    }
}
