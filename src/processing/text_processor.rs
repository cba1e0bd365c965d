//! Text normalization for skill and project fields

use regex::Regex;
use std::sync::OnceLock;

fn non_alpha_regex() -> &'static Regex {
    static NON_ALPHA: OnceLock<Regex> = OnceLock::new();
    NON_ALPHA.get_or_init(|| Regex::new(r"[^a-zA-Z\s]").expect("Invalid non-alphabetic regex"))
}

/// Turn free text into lowercase alphabetic tokens.
///
/// Every occurrence of `category_word` is removed first so a section heading
/// such as "Skills" never becomes a token of its own. Digits, punctuation and
/// symbols are deleted without a separator, so `"c3po"` becomes `"cpo"`.
pub fn normalize(text: &str, category_word: &str) -> Vec<String> {
    let stripped = if category_word.is_empty() {
        text.to_string()
    } else {
        text.replace(category_word, "")
    };

    clean_text(&stripped)
}

/// Drop non-alphabetic characters, lowercase and split on whitespace.
pub fn clean_text(text: &str) -> Vec<String> {
    non_alpha_regex()
        .replace_all(text, "")
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Single-space join used as the matching blob for scoring.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_strips_category_word_and_symbols() {
        let result = normalize("skills: Rust, Python3 & SQL!", "skills");
        assert_eq!(result, tokens(&["rust", "python", "sql"]));
    }

    #[test]
    fn test_category_word_is_case_sensitive() {
        let result = normalize("Skills rust", "skills");
        assert_eq!(result, tokens(&["skills", "rust"]));
    }

    #[test]
    fn test_removed_digits_merge_neighbours() {
        assert_eq!(clean_text("c3po r2-d2"), tokens(&["cpo", "rd"]));
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert!(normalize("", "skills").is_empty());
        assert!(normalize("123 -- 456 !!", "skills").is_empty());
        assert!(normalize("skills", "skills").is_empty());
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(clean_text("  Machine\tLearning\n\nDocker "), tokens(&["machine", "learning", "docker"]));
    }

    #[test]
    fn test_idempotent_on_lowercase_words() {
        let words = tokens(&["inventory", "system", "rest", "api", "inventory"]);
        assert_eq!(normalize(&join_tokens(&words), "projects"), words);
    }
}
