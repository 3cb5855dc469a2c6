//! The config module holds the rules of a session and the errors that can be raised while putting
//! a session together.
//!
//! Nothing in here is checked while playing. Every constraint the round engine relies on to stop
//! retrying a random pick is validated once, when the engine is built, and reported as a
//! [`ConfigError`].

use std::io;

use tracing::warn;

use crate::words::WordList;

/// The number of rounds in a session of the terminal game.
pub const MAX_WORDS: usize = 10;

/// The number of points awarded for each correctly unscrambled word.
pub const SCORE_INCREASE: u32 = 20;

/// This enum holds every reason for which a word list or a set of rules may be rejected before a
/// session starts.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "The variants follow the order in which the checks are run."
)]
#[expect(
    clippy::module_name_repetitions,
    reason = "The error is re-exported at the crate root, where the bare name would be unclear."
)]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The word list has no entries at all.
    #[error("the word list is empty")]
    EmptyWordList,
    /// An entry holds something other than letters.
    #[error("the word {0:?} should be made up of letters only")]
    InvalidWord(String),
    /// An entry has no permutation other than itself, so it can never be scrambled.
    #[error("the word {0:?} needs at least two different letters to be scrambled")]
    Unscramblable(String),
    /// An entry shows up more than once, ignoring case.
    #[error("the word {0:?} appears more than once in the word list")]
    DuplicateWord(String),
    /// A session was asked to run for zero rounds.
    #[error("a session needs at least one round")]
    NoRounds,
    /// A session was asked to run for more rounds than there are distinct words.
    #[error("a session of {rounds} rounds needs as many distinct words, but only {available} are available")]
    TooManyRounds {
        /// The number of rounds requested.
        rounds: usize,
        /// The number of words in the list.
        available: usize,
    },
    /// The word list file could not be read.
    #[error("the word list could not be read")]
    Io(#[from] io::Error),
    /// The pattern used to validate words failed to compile.
    #[error("the word pattern failed to compile")]
    Pattern(#[from] regex::Error),
}

/// This struct holds the two numbers that shape a session: how many rounds it lasts and how much
/// each correct guess is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// The number of words dealt before the session is over.
    pub max_words: usize,
    /// The points added to the score on each correct guess.
    pub score_increase: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_words: MAX_WORDS,
            score_increase: SCORE_INCREASE,
        }
    }
}

impl Rules {
    /// Checks that a session under these rules can be played with the given word list without ever
    /// running out of fresh words.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRounds`] when `max_words` is zero and
    /// [`ConfigError::TooManyRounds`] when there are fewer words than rounds.
    pub fn check(&self, words: &WordList) -> Result<(), ConfigError> {
        if self.max_words == 0 {
            warn!("rejected rules with zero rounds");
            return Err(ConfigError::NoRounds);
        }

        if self.max_words > words.len() {
            warn!(
                rounds = self.max_words,
                available = words.len(),
                "rejected rules with more rounds than words"
            );
            return Err(ConfigError::TooManyRounds {
                rounds: self.max_words,
                available: words.len(),
            });
        }

        Ok(())
    }
}

/// Tests for the default rules and their checks against a word list.
#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::missing_assert_message,
    reason = "A failed unwrap or bare assertion is the test failure itself."
)]
mod tests {
    use super::*;

    /// Builds a validated word list out of literals.
    fn words(list: &[&str]) -> WordList {
        WordList::new(list.iter().map(|word| (*word).to_owned())).unwrap()
    }

    #[test]
    fn default_rules_match_constants() {
        let rules = Rules::default();
        assert_eq!(rules.max_words, 10);
        assert_eq!(rules.score_increase, 20);
    }

    #[test]
    fn default_rules_fit_builtin_list() {
        let list = WordList::builtin().unwrap();
        assert!(Rules::default().check(&list).is_ok());
    }

    #[test]
    fn zero_rounds_rejected() {
        let rules = Rules {
            max_words: 0,
            score_increase: 20,
        };
        let result = rules.check(&words(&["cat", "dog"]));
        assert!(matches!(result, Err(ConfigError::NoRounds)));
    }

    #[test]
    fn more_rounds_than_words_rejected() {
        let rules = Rules {
            max_words: 3,
            score_increase: 20,
        };
        let result = rules.check(&words(&["cat", "dog"]));
        assert!(matches!(
            result,
            Err(ConfigError::TooManyRounds {
                rounds: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn rounds_equal_to_words_accepted() {
        let rules = Rules {
            max_words: 2,
            score_increase: 5,
        };
        assert!(rules.check(&words(&["cat", "dog"])).is_ok());
    }
}
