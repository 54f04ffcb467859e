//! Default `clean_text` strategy

use crate::error::{ConfigurationError, TermRankResult};
use crate::extension::{Cleaner, Flow, StageContext};
use regex_lite::Regex;

/// Character-class body of the default cleaner.
pub const ASCII_ALPHABET: &str = "a-z";

/// Lowercases the text, replaces every character outside the alphabet with a
/// space, then collapses runs of spaces.
#[derive(Debug, Clone)]
pub struct AlphabetCleaner {
    alphabet: String,
    disallowed: Regex,
    spaces: Regex,
}

impl AlphabetCleaner {
    /// Cleaner keeping only `a-z`.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::with_alphabet(ASCII_ALPHABET)
    }

    /// Cleaner keeping the characters of a regex class body such as
    /// `a-záéíóúüñ`. The space character is always kept.
    pub fn with_alphabet(alphabet: &str) -> Result<Self, ConfigurationError> {
        if alphabet.is_empty() {
            return Err(ConfigurationError::InvalidAlphabet {
                alphabet: alphabet.to_string(),
                reason: "alphabet is empty".to_string(),
            });
        }
        let disallowed =
            Regex::new(&format!("[^{alphabet} ]")).map_err(|e| ConfigurationError::InvalidAlphabet {
                alphabet: alphabet.to_string(),
                reason: e.to_string(),
            })?;
        let spaces = Regex::new(" +").map_err(|e| ConfigurationError::InvalidAlphabet {
            alphabet: alphabet.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            alphabet: alphabet.to_string(),
            disallowed,
            spaces,
        })
    }

    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    /// Clean `text` and return the result.
    pub fn apply(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let kept = self.disallowed.replace_all(&lowered, " ");
        self.spaces.replace_all(&kept, " ").into_owned()
    }
}

impl Cleaner for AlphabetCleaner {
    fn clean(&self, text: &mut String, _ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        *text = self.apply(text);
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_lowercase_ascii_letters() {
        let cleaner = AlphabetCleaner::new().unwrap();
        assert_eq!(cleaner.apply("Hello, World!  42 times"), "hello world times");
    }

    #[test]
    fn punctuation_between_words_becomes_one_space() {
        let cleaner = AlphabetCleaner::new().unwrap();
        assert_eq!(cleaner.apply("cat--sat...mat"), "cat sat mat");
    }

    #[test]
    fn ascii_cleaner_splits_accented_words() {
        let cleaner = AlphabetCleaner::new().unwrap();
        assert_eq!(cleaner.apply("petróleo"), "petr leo");
    }

    #[test]
    fn widened_alphabet_keeps_accents() {
        let cleaner = AlphabetCleaner::with_alphabet("a-záéíóúüñ").unwrap();
        assert_eq!(
            cleaner.apply("El Petróleo, señaló: ¡1.600 metros!"),
            "el petróleo señaló metros "
        );
    }

    #[test]
    fn edges_keep_a_single_space() {
        let cleaner = AlphabetCleaner::new().unwrap();
        assert_eq!(cleaner.apply("  ...cat  "), " cat ");
    }

    #[test]
    fn invalid_alphabet_is_a_configuration_error() {
        assert!(matches!(
            AlphabetCleaner::with_alphabet(""),
            Err(ConfigurationError::InvalidAlphabet { .. })
        ));
        assert!(matches!(
            AlphabetCleaner::with_alphabet("z-a"),
            Err(ConfigurationError::InvalidAlphabet { .. })
        ));
    }

    #[test]
    fn cleans_in_place() {
        let cleaner = AlphabetCleaner::new().unwrap();
        let mut text = "A B".to_string();
        let flow = cleaner.clean(&mut text, &StageContext::default()).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(text, "a b");
    }
}
