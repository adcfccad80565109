// Document tokenization for topic inference.
//
// Mirrors the preprocessing the dictionary was built with: ASCII punctuation
// runs become spaces, text is lowercased, tokens are maximal runs of
// non-digit word characters between 2 and 15 characters long, and English
// stop words are dropped. Output order follows the input left to right.

use std::collections::HashSet;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Shortest token kept.
pub const MIN_TOKEN_LEN: usize = 2;
/// Longest token kept.
pub const MAX_TOKEN_LEN: usize = 15;

/// Runs of ASCII punctuation (the same set as Python's `string.punctuation`).
const PUNCTUATION: &str = r"[!-/:-@\[-`{-~]+";

pub struct Tokenizer {
    stop_words: HashSet<String>,
    punctuation: Regex,
}

impl Tokenizer {
    /// Tokenizer with the NLTK English stop word list.
    pub fn english() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(stop_words)
    }

    /// Tokenizer with a caller-supplied stop word list.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.into().to_lowercase())
                .collect(),
            punctuation: Regex::new(PUNCTUATION).expect("punctuation pattern is valid"),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Replace every run of ASCII punctuation with a single space.
    pub fn strip_punctuation(&self, text: &str) -> String {
        self.punctuation.replace_all(text, " ").into_owned()
    }

    /// Split a document into lowercase, stop-word-free tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = self.strip_punctuation(text.trim()).to_lowercase();

        word_runs(&cleaned)
            .into_iter()
            .filter(|token| {
                let len = token.chars().count();
                (MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&len) && !token.starts_with('_')
            })
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }
}

/// Maximal runs of word characters that are not digits.
fn word_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        let is_word = (c.is_alphanumeric() || c == '_') && !c.is_numeric();
        match (is_word, start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                runs.push(&text[s..idx]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(&text[s..]);
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::with_stop_words(["the", "is", "a", "my", "on", "to"])
    }

    #[test]
    fn test_tokenize_lowercases_and_drops_stop_words() {
        let tokens = tokenizer().tokenize("The Driver is BROKEN on my Laptop");
        assert_eq!(tokens, vec!["driver", "broken", "laptop"]);
    }

    #[test]
    fn test_punctuation_splits_words() {
        let tokens = tokenizer().tokenize("apt-get install,then:reboot!!");
        assert_eq!(tokens, vec!["apt", "get", "install", "then", "reboot"]);
    }

    #[test]
    fn test_digits_break_tokens() {
        // "ubuntu10" -> "ubuntu"; "x86" -> "x" (too short) and nothing else
        let tokens = tokenizer().tokenize("ubuntu10 x86 grub2rocks");
        assert_eq!(tokens, vec!["ubuntu", "grub", "rocks"]);
    }

    #[test]
    fn test_length_bounds() {
        let tokens = tokenizer().tokenize("i ok abcdefghijklmno abcdefghijklmnop");
        assert_eq!(tokens, vec!["ok", "abcdefghijklmno"]);
    }

    #[test]
    fn test_underscores_are_punctuation() {
        let tokens = tokenizer().tokenize("__init__ snake_case");
        assert_eq!(tokens, vec!["init", "snake", "case"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("   \t\n ").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_kept() {
        let tokens = tokenizer().tokenize("Café ÜBER");
        assert_eq!(tokens, vec!["café", "über"]);
    }

    #[test]
    fn test_english_list_drops_common_words() {
        let tokens = Tokenizer::english().tokenize("the kernel and the driver");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"and".to_string()));
        assert!(tokens.contains(&"kernel".to_string()));
    }

    #[test]
    fn test_english_list_keeps_support_vocabulary() {
        let tokens =
            Tokenizer::english().tokenize("system problem computer help work ubuntu install file");
        assert_eq!(
            tokens,
            vec!["system", "problem", "computer", "help", "work", "ubuntu", "install", "file"]
        );
    }

    #[test]
    fn test_replacement_character_splits_words() {
        let tokens = tokenizer().tokenize("caf\u{fffd}e ubuntu");
        assert_eq!(tokens, vec!["caf", "ubuntu"]);
    }
}
