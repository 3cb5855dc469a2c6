//! The words module contains the list of candidate answers the round engine draws from.
//!
//! A [`WordList`] can only be built through validation, so every list in circulation is non-empty,
//! holds no duplicates and has no entry that is impossible to scramble.

use std::collections::HashSet;
use std::fs;
use std::iter::Map;
use std::path::Path;
use std::slice;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::ConfigError;

/// The pattern every word, and every guess typed at the prompt, has to match.
pub(crate) const LETTERS: &str = r"\A\p{Alphabetic}+\z";

/// The words shipped with the game.
const BUILTIN: &[&str] = &[
    "animal", "auto", "anecdote", "alphabet", "all", "awesome", "arise", "balloon", "basket",
    "bench", "best", "birthday", "book", "briefcase", "camera", "camping", "candle", "cat",
    "cauliflower", "chat", "children", "class", "classic", "classroom", "coffee", "colorful",
    "cookie", "creative", "cruise", "dance", "daytime", "dinosaur", "doorknob", "dine", "dream",
    "dusk", "eating", "elephant", "emerald", "eerie", "electric", "finish", "flowers", "follow",
    "fox", "frame", "free", "frequent", "funnel", "green", "guitar", "grocery", "glass", "great",
    "giggle", "haircut", "half", "homemade", "happen", "honey", "hurry", "hundred", "ice", "igloo",
    "invest", "invite", "icon", "introduce", "joke", "jovial", "journal", "jump", "join",
    "kangaroo", "keyboard", "kitchen", "koala", "kind", "kaleidoscope", "landscape", "late",
    "laugh", "learning", "lemon", "letter", "lily", "magazine", "marine", "marshmallow", "maze",
    "meditate", "melody", "minute", "monument", "moon", "motorcycle", "mountain", "music", "north",
    "nose", "night", "name", "never", "negotiate", "number", "opposite", "octopus", "oak", "order",
    "open", "polar", "pack", "painting", "person", "picnic", "pillow", "pizza", "podcast",
    "presentation", "puppy", "puzzle", "recipe", "release", "restaurant", "revolve", "rewind",
    "room", "run", "secret", "seed", "ship", "shirt", "should", "small", "spaceship", "stargazing",
    "skill", "street", "style", "sunrise", "taxi", "tidy", "timer", "together", "tooth", "tourist",
    "travel", "truck", "under", "useful", "unicorn", "unique", "uplift", "uniform", "vase",
    "violin", "visitor", "vision", "volume", "view", "walrus", "wander", "world", "winter", "well",
    "whirlwind", "xylophone", "yoga", "yogurt", "yoyo", "you", "year", "yummy", "zebra", "zigzag",
    "zoology", "zone", "zeal",
];

/// This struct holds a validated list of words to deal from during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    /// The entries, in the order they were given.
    words: Vec<String>,
}

impl WordList {
    /// Validates and wraps a list of words.
    ///
    /// Entries must be made up of letters only, must have at least two different characters so a
    /// scramble different from the word exists, and must not repeat once case is ignored the way
    /// [`eq_ignore_case`] ignores it.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] variant matching the first entry that fails a check, or
    /// [`ConfigError::EmptyWordList`] when there are no entries.
    pub fn new<I>(words: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let pattern = Regex::new(LETTERS)?;
        let mut seen = HashSet::new();
        let mut list = Vec::new();

        for word in words {
            if !pattern.is_match(&word) {
                warn!(word = %word, "rejected a word with non-letter characters");
                return Err(ConfigError::InvalidWord(word));
            }

            if !has_distinct_permutation(&word) {
                warn!(word = %word, "rejected a word that cannot be scrambled");
                return Err(ConfigError::Unscramblable(word));
            }

            if !seen.insert(folded(&word)) {
                warn!(word = %word, "rejected a duplicated word");
                return Err(ConfigError::DuplicateWord(word));
            }

            list.push(word);
        }

        if list.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }

        debug!(count = list.len(), "word list ready");
        Ok(Self { words: list })
    }

    /// Returns the list of words shipped with the game.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded list itself is malformed, which the tests rule out.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(BUILTIN.iter().copied().map(str::to_owned))
    }

    /// Reads a word list from a text file with one word per line. Surrounding whitespace is
    /// trimmed, and blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read, or any of the errors of
    /// [`WordList::new`] for its contents.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading word list");

        Self::parse(&contents)
    }

    /// Parses the contents of a word list file.
    fn parse(contents: &str) -> Result<Self, ConfigError> {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_owned),
        )
    }

    /// Returns whether the given word is in the list, comparing exactly. The game itself never asks;
    /// this is here for front ends that want to check a word against the list.
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|entry| entry == word)
    }

    /// Returns the word at the given position, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Returns whether the list has no entries. A validated list never does.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the words in their original order, for front ends that want to show or
    /// export the list.
    pub fn iter(&self) -> Words<'_> {
        self.into_iter()
    }

    /// Returns the number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }
}

impl<'list> IntoIterator for &'list WordList {
    type Item = &'list str;
    type IntoIter = Words<'list>;

    fn into_iter(self) -> Self::IntoIter {
        let as_str: fn(&String) -> &str = String::as_str;
        self.words.iter().map(as_str)
    }
}

/// The iterator over the words of a [`WordList`].
pub type Words<'list> = Map<slice::Iter<'list, String>, fn(&String) -> &str>;

/// Compares two words ignoring case, one character at a time. Two characters match when their
/// uppercase forms are equal, or when the lowercase forms of those uppercase forms are.
///
/// Only one-to-one case mappings take part, so `'\u{df}'` does not match `"ss"`, while the dotted
/// capital I matches a plain `'i'` and both Greek sigmas match each other.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars().map(fold_char).eq(right.chars().map(fold_char))
}

/// Folds every character of a word, giving the key under which words equal by [`eq_ignore_case`]
/// collide.
fn folded(word: &str) -> String {
    word.chars().map(fold_char).collect()
}

/// Maps a character to its simple uppercase form, then that to its simple lowercase form.
fn fold_char(ch: char) -> char {
    simple_lowercase(simple_uppercase(ch))
}

/// Returns the uppercase form of a character when it is a single character, or the character
/// itself when uppercasing expands it, as with `'\u{df}'`.
fn simple_uppercase(ch: char) -> char {
    let mut upper = ch.to_uppercase();

    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// Returns the leading character of the lowercase form. The dotted capital I is the only character
/// that lowercases to more than one, and its simple lowercase form is that leading `'i'`.
fn simple_lowercase(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// A word has a permutation other than itself as soon as two of its characters differ.
fn has_distinct_permutation(word: &str) -> bool {
    let mut chars = word.chars();

    chars
        .next()
        .is_some_and(|first| chars.any(|ch| ch != first))
}

/// Tests for validating, loading and comparing words.
#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::missing_assert_message,
    reason = "A failed unwrap or bare assertion is the test failure itself."
)]
mod tests {
    use std::io::Write as _;

    use super::*;

    /// Turns a slice of literals into the owned words `WordList::new` takes.
    fn owned(list: &[&str]) -> Vec<String> {
        list.iter().map(|word| (*word).to_owned()).collect()
    }

    #[test]
    fn builtin_list_is_valid() {
        let list = WordList::builtin().unwrap();
        assert_eq!(list.len(), BUILTIN.len());
        assert!(!list.is_empty());
    }

    #[test]
    fn builtin_words_are_lowercase_letters() {
        let list = WordList::builtin().unwrap();
        for word in &list {
            assert!(
                word.chars().all(|ch| ch.is_ascii_lowercase()),
                "Word '{word}' contains non-lowercase chars"
            );
        }
    }

    #[test]
    fn empty_list_rejected() {
        let result = WordList::new(Vec::<String>::new());
        assert!(matches!(result, Err(ConfigError::EmptyWordList)));
    }

    #[test]
    fn non_letters_rejected() {
        for bad in ["x-ray", "two words", "r2d2", ""] {
            let result = WordList::new(owned(&["cat", bad]));
            assert!(
                matches!(result, Err(ConfigError::InvalidWord(ref word)) if word == bad),
                "'{bad}' should have been rejected"
            );
        }
    }

    #[test]
    fn single_letter_words_rejected() {
        let result = WordList::new(owned(&["a"]));
        assert!(matches!(result, Err(ConfigError::Unscramblable(_))));
    }

    #[test]
    fn repeated_letter_words_rejected() {
        let result = WordList::new(owned(&["cat", "zzz"]));
        assert!(matches!(result, Err(ConfigError::Unscramblable(ref word)) if word == "zzz"));
    }

    #[test]
    fn mixed_case_repeats_are_scramblable() {
        assert!(WordList::new(owned(&["Aa"])).is_ok());
    }

    #[test]
    fn duplicates_rejected_ignoring_case() {
        let result = WordList::new(owned(&["Moon", "sun", "moon"]));
        assert!(matches!(result, Err(ConfigError::DuplicateWord(ref word)) if word == "moon"));
    }

    #[test]
    fn duplicates_rejected_across_sigma_forms() {
        let medial = "\u{3c3}\u{3b1}\u{3c3}";
        let result = WordList::new(owned(&["\u{3c3}\u{3b1}\u{3c2}", medial]));
        assert!(
            matches!(result, Err(ConfigError::DuplicateWord(ref word)) if word == medial),
            "final and medial sigma should fold to the same word"
        );
    }

    #[test]
    fn dotted_capital_i_matches_plain_i() {
        assert!(eq_ignore_case("istanbul", "\u{130}STANBUL"));
        assert!(eq_ignore_case("\u{130}stanbul", "ISTANBUL"));
    }

    #[test]
    fn sigma_forms_match() {
        assert!(eq_ignore_case("\u{3c3}\u{3b1}\u{3c2}", "\u{3c3}\u{3b1}\u{3c3}"));
        assert!(eq_ignore_case("\u{3c3}\u{3b1}\u{3c2}", "\u{3a3}\u{391}\u{3a3}"));
    }

    #[test]
    fn expanding_case_mappings_do_not_match() {
        assert!(!eq_ignore_case("stra\u{df}e", "strasse"));
        assert!(eq_ignore_case("stra\u{df}e", "STRA\u{df}E"));
    }

    #[test]
    fn different_lengths_never_match() {
        assert!(!eq_ignore_case("moon", "moons"));
        assert!(!eq_ignore_case("", "a"));
        assert!(eq_ignore_case("", ""));
    }

    #[test]
    fn accessors_keep_order() {
        let list = WordList::new(owned(&["moon", "sun", "star"])).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), Some("moon"));
        assert_eq!(list.get(2), Some("star"));
        assert_eq!(list.get(3), None);
        assert!(list.contains("sun"));
        assert!(!list.contains("Sun"));
        assert_eq!(list.iter().collect::<Vec<_>>(), ["moon", "sun", "star"]);
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let list = WordList::parse("# planets\n\n  mars  \nvenus\n# end\n").unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), ["mars", "venus"]);
    }

    #[test]
    fn parse_of_comments_only_is_empty() {
        let result = WordList::parse("# nothing here\n\n");
        assert!(matches!(result, Err(ConfigError::EmptyWordList)));
    }

    #[test]
    fn from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("unscramble-words-{}.txt", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "river\nocean\nlake").unwrap();
        drop(file);

        let list = WordList::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(list.len(), 3);
        assert!(list.contains("ocean"));
    }

    #[test]
    fn from_path_missing_file() {
        let path = std::env::temp_dir().join("unscramble-words-that-do-not-exist.txt");
        let result = WordList::from_path(&path);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
