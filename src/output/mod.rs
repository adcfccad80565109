// Output formatting: plain-text topic reports.

pub mod terminal;

/// Separator placed between a topic's words.
pub const WORD_SEPARATOR: &str = " | ";

/// Join a topic's words for display.
pub fn join_words(words: &[String]) -> String {
    words.join(WORD_SEPARATOR)
}
