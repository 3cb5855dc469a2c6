//! The game module contains the terminal front end of the game, except for input handling.
//!
//! It contains the `init()` function to set up and start the game loop, as well as the welcome
//! message, the scoreboard drawn each round and the final score dialog. The scoreboard is fed
//! exclusively by the round engine's subscriptions.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser};
use console::{style, Term};
use fastrand::Rng;
use regex::Regex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Rules;
use crate::engine::RoundEngine;
use crate::input::{play_again, take_guess, Guess};
use crate::words::{WordList, LETTERS};

/// This struct holds information about the application when it comes to the command-line argument
/// parser of choice, which is clap. It uses the derive attribute to set up the different options,
/// each of which can also be given through the environment.
#[derive(Parser)]
#[command(name = "unscramble", version, about)]
#[command(next_line_help = true)]
struct Cli {
    /// The seed for the random number generator.
    ///
    /// Two sessions started with the same seed and word list deal the same words, scrambled the
    /// same way. Leave it out to get a different game every time.
    #[arg(long)]
    #[arg(env = "UNSCRAMBLE_SEED", value_name = "SEED")]
    seed: Option<u64>,
    /// Increase the logging level; repeat for more detail.
    ///
    /// Logs go to standard error. The RUST_LOG environment variable takes precedence over this
    /// flag when set.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// A text file with one word per line to play with instead of the built-in list.
    ///
    /// Blank lines and lines starting with '#' are ignored. Every word must be made up of letters
    /// only, have at least two different letters and appear only once.
    #[arg(short, long)]
    #[arg(env = "UNSCRAMBLE_WORDS", value_name = "FILE")]
    words: Option<PathBuf>,
}

/// This enum holds the one-line feedback shown under the scrambled word after the player acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feedback {
    /// Nothing to report; shown at the start of a round.
    Clear,
    /// The last guess was wrong and the round is still open.
    TryAgain,
}

/// This struct is the view model the screen is drawn from. The score, round and scrambled word are
/// written by the engine's listeners only.
#[derive(Debug)]
struct Scoreboard {
    /// The feedback for the last action in the current round.
    feedback: Feedback,
    /// The number of rounds in a session.
    max_words: usize,
    /// The round on display.
    round: usize,
    /// The score on display.
    score: u32,
    /// The scrambled word on display.
    scrambled: String,
}

impl Scoreboard {
    /// Creates an empty scoreboard for a session of `max_words` rounds.
    const fn new(max_words: usize) -> Self {
        Self {
            feedback: Feedback::Clear,
            max_words,
            round: 0,
            score: 0,
            scrambled: String::new(),
        }
    }

    /// Returns the round counter line, as in "Word 3 of 10".
    fn round_line(&self) -> String {
        format!("Word {} of {}", self.round, self.max_words)
    }

    /// Returns the score line.
    fn score_line(&self) -> String {
        format!("Score: {}", self.score)
    }
}

/// Initializes the game state and handles the whole session loop. This is a `main()` function of
/// sorts though it is still called from main.rs.
///
/// # Errors
///
/// The function may return any one of the following errors:
///
/// - `tracing_subscriber`'s initialization error
/// - `unscramble::config::ConfigError`
/// - `io::Error`
/// - `dialoguer::Error`
pub fn init() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let words = match cli.words {
        Some(ref path) => WordList::from_path(path)
            .with_context(|| format!("failed to load the word list at {}", path.display()))?,
        None => WordList::builtin()?,
    };
    let rng = cli.seed.map_or_else(Rng::new, Rng::with_seed);
    let rules = Rules::default();
    let mut engine = RoundEngine::new(words, rules, rng)?;

    let board = Rc::new(RefCell::new(Scoreboard::new(engine.max_words())));
    subscribe(&mut engine, &board);

    let term = Term::stdout();
    let letters = Regex::new(LETTERS)?;

    // show the init message
    init_message(&term, engine.max_words())?;

    // game loop
    loop {
        draw_board(&term, &board.borrow())?;

        let guess = take_guess(&term, &letters)?;
        let more = match guess {
            Guess::Skip => {
                debug!("word skipped");
                board.borrow_mut().feedback = Feedback::Clear;
                engine.advance_or_end()
            }
            Guess::Word(ref word) if engine.submit_guess(word) => {
                board.borrow_mut().feedback = Feedback::Clear;
                engine.advance_or_end()
            }
            Guess::Word(_) => {
                board.borrow_mut().feedback = Feedback::TryAgain;
                true
            }
        };

        if more {
            continue;
        }

        final_score(&term, engine.score())?;

        if !play_again(&term)? {
            term.clear_screen()?;
            info!(score = engine.score(), "leaving the game");
            break Ok(());
        }

        engine.reset();
        board.borrow_mut().feedback = Feedback::Clear;
    }
}

/// This function installs the logging subscriber. The level is picked from the number of times
/// the verbose flag was given, unless RUST_LOG says otherwise.
fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)
}

/// This function wires the engine's observable values into the scoreboard. The subscriptions live
/// for as long as the engine does.
fn subscribe(engine: &mut RoundEngine, board: &Rc<RefCell<Scoreboard>>) {
    let view = Rc::clone(board);
    let _ = engine.subscribe_score(move |score: &u32| view.borrow_mut().score = *score);

    let view = Rc::clone(board);
    let _ = engine.subscribe_round_count(move |round: &usize| view.borrow_mut().round = *round);

    let view = Rc::clone(board);
    let _ = engine.subscribe_scrambled(move |word: &String| {
        view.borrow_mut().scrambled.clone_from(word);
    });
}

/// This function initializes the message to be used at the start of the program, as well as a few
/// other fallible operations. Among these, the screen is cleared and the title of the console
/// window is set to the name of the game. It then waits for the player to press enter.
fn init_message(term: &Term, max_words: usize) -> Result<()> {
    const MSG: &str = "Welcome to unscramble";
    let msg = style(MSG).bold();

    term.clear_screen()?;
    term.set_title("unscramble");

    term.write_line(&format!("{msg}"))?;
    term.write_line(&format!(
        "Unscramble {max_words} words. Type your guess, or leave it empty to skip a word."
    ))?;
    term.write_line(&format!("{}", style("Press enter to start").dim()))?;
    let _ = term.read_line()?;

    Ok(())
}

/// This function redraws the screen for the round on display: the round counter, the score, the
/// scrambled word and the feedback for the last guess, if any.
fn draw_board(term: &Term, board: &Scoreboard) -> Result<()> {
    term.clear_screen()?;

    term.write_line(&format!(
        "{}    {}",
        style(board.round_line()).bold().on_cyan(),
        style(board.score_line()).bold()
    ))?;
    term.write_line("")?;
    term.write_line(&format!("{}", style(&board.scrambled).bold().yellow()))?;
    term.write_line("")?;

    if board.feedback == Feedback::TryAgain {
        term.write_line(&format!("{}", style("Try again!").red().bold()))?;
    }

    Ok(())
}

/// This function shows the final score once the last round has been played.
fn final_score(term: &Term, score: u32) -> Result<()> {
    term.clear_screen()?;

    term.write_line(&format!("{}", style("Congratulations!").bold().green()))?;
    term.write_line(&format!("{}", style(format!("You scored: {score}")).bold()))?;
    term.write_line("")?;

    Ok(())
}

/// Tests for the scoreboard's subscriptions and the command-line options.
#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::missing_assert_message,
    reason = "A failed unwrap or bare assertion is the test failure itself."
)]
mod tests {
    use super::*;

    /// Starts a session over the built-in list with a scoreboard subscribed to it.
    fn engine_with_board(seed: u64) -> (RoundEngine, Rc<RefCell<Scoreboard>>) {
        let mut engine = RoundEngine::new(
            WordList::builtin().unwrap(),
            Rules::default(),
            Rng::with_seed(seed),
        )
        .unwrap();
        let board = Rc::new(RefCell::new(Scoreboard::new(engine.max_words())));
        subscribe(&mut engine, &board);
        (engine, board)
    }

    #[test]
    fn board_starts_with_first_round() {
        let (engine, board) = engine_with_board(1);
        let board = board.borrow();

        assert_eq!(board.round_line(), "Word 1 of 10");
        assert_eq!(board.score_line(), "Score: 0");
        assert_eq!(board.scrambled, engine.current_scrambled());
    }

    #[test]
    fn board_follows_engine() {
        let (mut engine, board) = engine_with_board(2);
        let answer = engine.current_word().to_owned();

        assert!(engine.submit_guess(&answer));
        assert!(engine.advance_or_end());

        let board = board.borrow();
        assert_eq!(board.round_line(), "Word 2 of 10");
        assert_eq!(board.score_line(), "Score: 20");
        assert_eq!(board.scrambled, engine.current_scrambled());
    }

    #[test]
    fn board_follows_reset() {
        let (mut engine, board) = engine_with_board(3);
        let answer = engine.current_word().to_owned();
        assert!(engine.submit_guess(&answer));
        while engine.advance_or_end() {}

        engine.reset();

        assert_eq!(board.borrow().round_line(), "Word 1 of 10");
        assert_eq!(board.borrow().score_line(), "Score: 0");
    }

    #[test]
    fn cli_reads_options() {
        let cli = Cli::try_parse_from(["unscramble", "--seed", "42", "-vv", "-w", "words.txt"])
            .unwrap();

        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.words, Some(PathBuf::from("words.txt")));
    }

    #[test]
    fn cli_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["unscramble", "--seed", "not-a-number"]).is_err());
    }
}
