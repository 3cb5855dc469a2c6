//! The library components of the game. They allow building a word list, setting up the rules of a
//! session, and playing it through the round engine, which deals scrambled words, checks guesses
//! and keeps the score.
//!
//! The starting point of the terminal game is the game.rs file, which contains the main game loop.
//! Front ends of their own only need the [`engine`] module and its subscriptions.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The package has not yet been pushed to a remote."
)]

pub mod config;
pub mod engine;
pub mod observable;
pub mod words;

mod game;
mod input;

pub use config::{ConfigError, Rules, MAX_WORDS, SCORE_INCREASE};
pub use engine::{Phase, RoundEngine};
pub use game::init;
pub use observable::{Observable, Subscription, SubscriptionIds};
pub use words::{eq_ignore_case, WordList, Words};
