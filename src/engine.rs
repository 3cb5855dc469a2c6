//! The engine module contains the round engine, the one piece of state a session revolves around.
//!
//! The engine deals scrambled words, checks guesses against the current answer, keeps the score
//! and counts rounds until the session is over. Front ends never touch that state directly: they
//! call the engine's operations and subscribe to the values they want to display.

use std::collections::HashSet;

use fastrand::Rng;
use tracing::{debug, info, trace};

use crate::config::{ConfigError, Rules};
use crate::observable::{Observable, Subscription, SubscriptionIds};
use crate::words::{eq_ignore_case, WordList};

/// This enum holds the two states a session can be in once its first word has been dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A scrambled word is on display and guesses are being taken.
    InRound,
    /// Every round has been played. Only a reset gets the engine going again.
    SessionComplete,
}

/// This struct holds the state of a session: the score, the round count, the words dealt so far,
/// and the answer and scrambled form of the current round.
#[expect(
    clippy::module_name_repetitions,
    reason = "The engine is re-exported at the crate root, where the bare name would be unclear."
)]
#[derive(Debug)]
pub struct RoundEngine {
    /// The answer of the current round.
    current_word: String,
    /// Whether the last round has been played.
    phase: Phase,
    /// The random source for picking and shuffling words.
    rng: Rng,
    /// The number of words dealt this session.
    round_count: Observable<usize>,
    /// The rules the session runs under.
    rules: Rules,
    /// The points earned this session.
    score: Observable<u32>,
    /// The scrambled form of the current answer.
    scrambled: Observable<String>,
    /// Whether the current round has already been scored.
    solved: bool,
    /// The handles given to listeners of any of the observable values.
    subscriptions: SubscriptionIds,
    /// Every word dealt this session.
    used_words: HashSet<String>,
    /// The words to deal from.
    words: WordList,
}

impl RoundEngine {
    /// Creates a new engine and deals the first word of the session.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the rules ask for more rounds than there are words, or for no
    /// rounds at all. Both checks guarantee that dealing a fresh word always terminates.
    pub fn new(words: WordList, rules: Rules, rng: Rng) -> Result<Self, ConfigError> {
        rules.check(&words)?;

        let mut engine = Self {
            current_word: String::new(),
            phase: Phase::InRound,
            rng,
            round_count: Observable::new(0),
            rules,
            score: Observable::new(0),
            scrambled: Observable::new(String::new()),
            solved: false,
            subscriptions: SubscriptionIds::default(),
            used_words: HashSet::with_capacity(rules.max_words),
            words,
        };
        engine.deal_next_word();

        info!(
            rounds = rules.max_words,
            words = engine.words.len(),
            "session started"
        );
        Ok(engine)
    }

    /// Deals the next word if rounds remain and returns `true`, or marks the session as complete
    /// and returns `false` otherwise. Used both after a correct guess and to skip a word.
    pub fn advance_or_end(&mut self) -> bool {
        if *self.round_count.get() < self.rules.max_words {
            self.deal_next_word();
            return true;
        }

        if self.phase == Phase::InRound {
            info!(score = *self.score.get(), "session complete");
        }
        self.phase = Phase::SessionComplete;

        false
    }

    /// Returns the answer of the current round.
    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    /// Returns the scrambled form of the current round's answer.
    pub fn current_scrambled(&self) -> &str {
        self.scrambled.get()
    }

    /// Returns whether the current round has already been scored.
    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    /// Returns the number of rounds in a session.
    pub const fn max_words(&self) -> usize {
        self.rules.max_words
    }

    /// Returns the state of the session.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Starts a fresh session: zeroes the score and round count, forgets the words dealt so far and
    /// deals a new first word.
    pub fn reset(&mut self) {
        self.score.set(0);
        self.round_count.set(0);
        self.used_words.clear();
        self.phase = Phase::InRound;

        info!("session reset");
        self.deal_next_word();
    }

    /// Returns the number of words dealt so far this session.
    pub fn round_count(&self) -> usize {
        *self.round_count.get()
    }

    /// Returns the rules the session runs under.
    pub const fn rules(&self) -> Rules {
        self.rules
    }

    /// Returns the points earned so far this session.
    pub fn score(&self) -> u32 {
        *self.score.get()
    }

    /// Checks a guess against the current answer, ignoring case one character at a time as
    /// [`eq_ignore_case`] does. A correct guess adds the score increment and returns `true`;
    /// anything else, an empty string included, leaves the state as it is and returns `false`.
    ///
    /// A round is scored once: guessing it again after a correct answer returns `false`, as does
    /// any guess once the session is complete. Guessing never moves on to the next round.
    pub fn submit_guess(&mut self, candidate: &str) -> bool {
        if self.solved || self.phase == Phase::SessionComplete {
            trace!("guess ignored, round already settled");
            return false;
        }

        if !eq_ignore_case(candidate, &self.current_word) {
            debug!(round = self.round_count(), "wrong guess");
            return false;
        }

        self.solved = true;
        let score = self.score.get().saturating_add(self.rules.score_increase);
        self.score.set(score);

        debug!(round = self.round_count(), score, "correct guess");
        true
    }

    /// Registers a listener for the round count. It's handed the current value right away.
    pub fn subscribe_round_count<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&usize) + 'static,
    {
        self.round_count.subscribe(&mut self.subscriptions, listener)
    }

    /// Registers a listener for the score. It's handed the current value right away.
    pub fn subscribe_score<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&u32) + 'static,
    {
        self.score.subscribe(&mut self.subscriptions, listener)
    }

    /// Registers a listener for the scrambled word. It's handed the current value right away.
    pub fn subscribe_scrambled<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&String) + 'static,
    {
        self.scrambled.subscribe(&mut self.subscriptions, listener)
    }

    /// Drops a listener registered through any of the `subscribe_*` methods. Returns whether it was
    /// found.
    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        self.score.unsubscribe(id)
            || self.round_count.unsubscribe(id)
            || self.scrambled.unsubscribe(id)
    }

    /// Returns the words dealt so far this session.
    pub const fn used_words(&self) -> &HashSet<String> {
        &self.used_words
    }

    /// Picks a word not dealt yet this session, scrambles it and publishes the new round.
    ///
    /// Both loops are rejection sampling. The pick terminates because the rules were checked to
    /// never ask for more rounds than there are words, and the shuffle terminates because every
    /// word in a [`WordList`] has at least two different characters.
    fn deal_next_word(&mut self) {
        let word = loop {
            let index = self.rng.usize(..self.words.len());
            if let Some(word) = self.words.get(index) {
                if !self.used_words.contains(word) {
                    break word.to_owned();
                }
            }
        };

        let scrambled = scramble(&word, &mut self.rng);

        let _ = self.used_words.insert(word.clone());
        self.current_word = word;
        self.solved = false;
        self.scrambled.set(scrambled);
        let round = *self.round_count.get() + 1;
        self.round_count.set(round);

        debug!(round, "dealt a new word");
    }
}

/// Shuffles the characters of a word until the result differs from it. The caller guarantees the
/// word has two different characters.
fn scramble(word: &str, rng: &mut Rng) -> String {
    let mut chars: Vec<char> = word.chars().collect();

    loop {
        rng.shuffle(&mut chars);
        let scrambled: String = chars.iter().collect();
        if scrambled != word {
            break scrambled;
        }
    }
}

/// Tests for dealing, guessing, advancing, resetting and the engine's subscriptions.
#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::missing_assert_message,
    reason = "A failed unwrap or bare assertion is the test failure itself."
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Starts a session over the built-in list with the default rules.
    fn new_engine(seed: u64) -> RoundEngine {
        RoundEngine::new(WordList::builtin().unwrap(), Rules::default(), Rng::with_seed(seed))
            .unwrap()
    }

    /// Starts a one-round session whose only possible answer is `word`.
    fn single_word_engine(word: &str) -> RoundEngine {
        let words = WordList::new([word.to_owned()]).unwrap();
        let rules = Rules {
            max_words: 1,
            score_increase: 20,
        };
        RoundEngine::new(words, rules, Rng::with_seed(1)).unwrap()
    }

    /// Returns the characters of a word in order, to compare anagrams.
    fn sorted(word: &str) -> Vec<char> {
        let mut chars: Vec<char> = word.chars().collect();
        chars.sort_unstable();
        chars
    }

    /// Checks that the word on display is an anagram of the answer and differs from it.
    fn assert_valid_scramble(engine: &RoundEngine) {
        let word = engine.current_word();
        let scrambled = engine.current_scrambled();
        assert_ne!(scrambled, word, "'{scrambled}' is not scrambled");
        assert_eq!(sorted(scrambled), sorted(word), "'{scrambled}' is not an anagram of '{word}'");
    }

    #[test]
    fn new_session_deals_first_word() {
        let engine = new_engine(1);
        assert_eq!(engine.round_count(), 1);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.phase(), Phase::InRound);
        assert_eq!(engine.used_words().len(), 1);
        assert!(engine.used_words().contains(engine.current_word()));
        assert!(!engine.is_solved());
        assert_valid_scramble(&engine);
    }

    #[test]
    fn rejects_more_rounds_than_words() {
        let words = WordList::new(vec![String::from("cat"), String::from("dog")]).unwrap();
        let rules = Rules {
            max_words: 3,
            score_increase: 20,
        };
        let result = RoundEngine::new(words, rules, Rng::with_seed(1));
        assert!(matches!(result, Err(ConfigError::TooManyRounds { .. })));
    }

    #[test]
    fn full_session_with_correct_guesses() {
        let mut engine = new_engine(7);

        for round in 1..=10 {
            assert_eq!(engine.round_count(), round);
            let answer = engine.current_word().to_owned();
            assert!(engine.submit_guess(&answer));
            assert_eq!(engine.score(), 20 * u32::try_from(round).unwrap());

            let more = engine.advance_or_end();
            assert_eq!(more, round < 10, "round {round}");
        }

        assert_eq!(engine.score(), 200);
        assert_eq!(engine.round_count(), 10);
        assert_eq!(engine.phase(), Phase::SessionComplete);
        assert!(!engine.advance_or_end());
        assert_eq!(engine.round_count(), 10);
    }

    #[test]
    fn every_dealt_word_is_scrambled() {
        for seed in 0..20 {
            let mut engine = new_engine(seed);
            loop {
                assert_valid_scramble(&engine);
                if !engine.advance_or_end() {
                    break;
                }
            }
        }
    }

    #[test]
    fn words_do_not_repeat_within_session() {
        let words = WordList::new(
            ["moon", "sun", "star", "comet", "orbit"]
                .iter()
                .map(|word| (*word).to_owned()),
        )
        .unwrap();
        let rules = Rules {
            max_words: 5,
            score_increase: 1,
        };

        for seed in 0..20 {
            let mut engine = RoundEngine::new(words.clone(), rules, Rng::with_seed(seed)).unwrap();
            let mut dealt = vec![engine.current_word().to_owned()];
            while engine.advance_or_end() {
                dealt.push(engine.current_word().to_owned());
            }

            dealt.sort_unstable();
            dealt.dedup();
            assert_eq!(dealt.len(), 5, "seed {seed}");
            assert_eq!(engine.used_words().len(), 5);
        }
    }

    #[test]
    fn guess_ignores_case() {
        let mut engine = new_engine(3);
        let shouted = engine.current_word().to_uppercase();

        assert!(engine.submit_guess(&shouted));
        assert_eq!(engine.score(), 20);
        assert!(engine.is_solved());
    }

    #[test]
    fn guess_matches_dotted_capital_i() {
        let mut engine = single_word_engine("istanbul");

        assert!(engine.submit_guess("\u{130}STANBUL"));
        assert_eq!(engine.score(), 20);
    }

    #[test]
    fn guess_matches_final_sigma() {
        let mut engine = single_word_engine("\u{3c3}\u{3b1}\u{3c2}");

        assert!(engine.submit_guess("\u{3c3}\u{3b1}\u{3c3}"));
        assert_eq!(engine.score(), 20);
    }

    #[test]
    fn guess_does_not_expand_sharp_s() {
        let mut engine = single_word_engine("stra\u{df}e");

        assert!(!engine.submit_guess("STRASSE"));
        assert!(engine.submit_guess("STRA\u{df}E"));
    }

    #[test]
    fn round_scores_only_once() {
        let mut engine = new_engine(3);
        let answer = engine.current_word().to_owned();

        assert!(engine.submit_guess(&answer));
        assert!(!engine.submit_guess(&answer));
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.round_count(), 1);
    }

    #[test]
    fn wrong_guesses_change_nothing() {
        let mut engine = new_engine(5);
        let word = engine.current_word().to_owned();
        let scrambled = engine.current_scrambled().to_owned();

        for guess in ["", "   ", "definitely not it", scrambled.as_str()] {
            assert!(!engine.submit_guess(guess));
        }

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round_count(), 1);
        assert_eq!(engine.current_word(), word);
        assert_eq!(engine.current_scrambled(), scrambled);
        assert!(!engine.is_solved());
    }

    #[test]
    fn skipping_advances_without_scoring() {
        let mut engine = new_engine(9);
        let first = engine.current_word().to_owned();

        assert!(engine.advance_or_end());
        assert_eq!(engine.round_count(), 2);
        assert_eq!(engine.score(), 0);
        assert_ne!(engine.current_word(), first);
    }

    #[test]
    fn no_scoring_after_session_complete() {
        let mut engine = new_engine(11);
        while engine.advance_or_end() {}

        let answer = engine.current_word().to_owned();
        assert!(!engine.submit_guess(&answer));
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn reset_mid_session() {
        let mut engine = new_engine(13);
        for _ in 0..3 {
            let answer = engine.current_word().to_owned();
            assert!(engine.submit_guess(&answer));
            if engine.round_count() < 3 {
                assert!(engine.advance_or_end());
            }
        }
        assert_eq!(engine.score(), 60);
        assert_eq!(engine.round_count(), 3);

        engine.reset();

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round_count(), 1);
        assert_eq!(engine.phase(), Phase::InRound);
        assert_eq!(engine.used_words().len(), 1);
        assert!(engine.used_words().contains(engine.current_word()));
        assert_valid_scramble(&engine);
    }

    #[test]
    fn reset_after_session_complete() {
        let mut engine = new_engine(17);
        while engine.advance_or_end() {}

        engine.reset();

        assert_eq!(engine.phase(), Phase::InRound);
        assert!(engine.advance_or_end());
        assert_eq!(engine.round_count(), 2);
    }

    #[test]
    fn subscribers_follow_the_session() {
        let mut engine = new_engine(19);
        let scores = Rc::new(RefCell::new(Vec::new()));
        let rounds = Rc::new(RefCell::new(Vec::new()));
        let words = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&scores);
        let _ = engine.subscribe_score(move |score: &u32| sink.borrow_mut().push(*score));
        let sink = Rc::clone(&rounds);
        let _ = engine.subscribe_round_count(move |round: &usize| sink.borrow_mut().push(*round));
        let sink = Rc::clone(&words);
        let _ = engine.subscribe_scrambled(move |word: &String| sink.borrow_mut().push(word.clone()));

        let first = engine.current_scrambled().to_owned();
        let answer = engine.current_word().to_owned();
        assert!(engine.submit_guess(&answer));
        assert!(engine.advance_or_end());
        let second = engine.current_scrambled().to_owned();

        assert_eq!(*scores.borrow(), [0, 20]);
        assert_eq!(*rounds.borrow(), [1, 2]);
        assert_eq!(*words.borrow(), [first, second]);
    }

    #[test]
    fn unsubscribed_listener_stays_quiet() {
        let mut engine = new_engine(23);
        let scores = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&scores);
        let id = engine.subscribe_score(move |score: &u32| sink.borrow_mut().push(*score));

        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        let answer = engine.current_word().to_owned();
        assert!(engine.submit_guess(&answer));

        assert_eq!(*scores.borrow(), [0]);
    }

    #[test]
    fn scramble_differs_for_two_letter_words() {
        let mut rng = Rng::with_seed(29);
        for _ in 0..50 {
            assert_eq!(scramble("ab", &mut rng), "ba");
        }
    }

    #[test]
    fn same_seed_same_session() {
        let first = new_engine(31);
        let second = new_engine(31);
        assert_eq!(first.current_word(), second.current_word());
        assert_eq!(first.current_scrambled(), second.current_scrambled());
    }
}
