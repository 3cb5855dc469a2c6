//! # unscramble
//!
//! This crate is a game about unscrambling words. Each session deals ten words with their letters
//! shuffled, one at a time, and every word put back in order is worth twenty points. A word can be
//! skipped at the cost of its points, and once the last one is dealt the final score is shown
//! along with the option to play another session.
//!
//! Words come from a built-in list of everyday English words, or from a text file given on the
//! command line.

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use anyhow::Result;
use unscramble::init;

fn main() -> Result<()> {
    init()
}
