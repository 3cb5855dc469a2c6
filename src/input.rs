//! This module contains all functions related to taking input from the player. They all use the
//! `dialoguer` crate to process the input, and they all check for input validation.
//!
//! Specifically, one function takes the guess for the word on display, and the other asks whether
//! to play another session once the last round is over.

use anyhow::Result;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use regex::Regex;

/// This enum holds what the player did with the word on display.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Guess {
    /// The player left the prompt empty to move on without scoring.
    Skip,
    /// The player typed a word to check against the answer.
    Word(String),
}

/// This function is in charge of taking the player's guess for the current scrambled word. An
/// empty line skips the word; anything else has to be made up of letters.
pub(crate) fn take_guess(term: &Term, re: &Regex) -> Result<Guess> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "{}",
            style("Unscramble the word (leave empty to skip)").bold()
        ))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            let input = input.trim();
            if input.is_empty() || re.is_match(input) {
                return Ok(());
            }

            Err("The guess should be made up of letters only")
        })
        .interact_text_on(term)?;

    Ok(parse_guess(&input))
}

/// This function turns the raw text from the prompt into a guess.
fn parse_guess(input: &str) -> Guess {
    match input.trim() {
        "" => Guess::Skip,
        word => Guess::Word(word.to_owned()),
    }
}

/// This function asks the player whether to start a new session after the final score is shown.
pub(crate) fn play_again(term: &Term) -> Result<bool> {
    let again = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{}", style("Play again?").bold()))
        .default(true)
        .interact_on(term)?;

    Ok(again)
}

/// Tests for turning prompt text into a guess.
#[cfg(test)]
#[expect(
    clippy::missing_assert_message,
    reason = "A bare assertion failing is the test failure itself."
)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_skips() {
        assert_eq!(parse_guess(""), Guess::Skip);
        assert_eq!(parse_guess("   "), Guess::Skip);
    }

    #[test]
    fn input_is_trimmed() {
        assert_eq!(parse_guess("  moon \n"), Guess::Word(String::from("moon")));
    }
}
