//! Local guessing state for the active game
//!
//! Holds the in-progress guess and a shadow copy of the submitted guesses.
//! The shadow list gives immediate feedback after a submission; every poll
//! merges the service snapshot back in, and the snapshot wins unless it is
//! still behind a guess we already know was accepted.

use tracing::debug;

use crate::error::{Error, Result};
use crate::invariants::assert_board_invariants;
use crate::models::Game;
use crate::scoring::{self, GameOutcome, KeyboardState};
use crate::{MAX_CHALLENGES, MAX_WORD_LENGTH};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessBoard {
    game_id: Option<String>,
    solution: String,
    current: String,
    guesses: Vec<String>,
}

impl GuessBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    /// Letters typed but not yet submitted
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Submitted guesses, including optimistic ones
    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    pub fn solution(&self) -> &str {
        &self.solution
    }

    pub fn outcome(&self) -> GameOutcome {
        scoring::outcome(&self.guesses, &self.solution)
    }

    pub fn keyboard(&self) -> KeyboardState {
        scoring::keyboard_statuses(&self.guesses, &self.solution)
    }

    /// Merge a polled game into the board
    ///
    /// A different game resets everything. For the same game the snapshot
    /// list replaces ours when it has at least as many guesses, or when it
    /// disagrees with what we have; a local list that strictly extends the
    /// snapshot is kept. The in-progress guess is never touched here.
    pub fn sync(&mut self, game: &Game) {
        if self.game_id.as_deref() != Some(game.id.as_str()) {
            debug!(game_id = %game.id, "New game, resetting board");
            *self = Self {
                game_id: Some(game.id.clone()),
                solution: game.solution.to_uppercase(),
                current: String::new(),
                guesses: normalized(&game.guesses),
            };
            return;
        }

        self.solution = game.solution.to_uppercase();
        let remote = normalized(&game.guesses);
        let local_ahead = remote.len() < self.guesses.len() && self.guesses.starts_with(&remote);

        if local_ahead {
            debug!(
                local = self.guesses.len(),
                remote = remote.len(),
                "Keeping optimistic guesses"
            );
        } else {
            self.guesses = remote;
        }
    }

    /// Whether typing is still allowed
    pub fn accepts_input(&self) -> bool {
        self.guesses.len() < MAX_CHALLENGES && !self.outcome().is_completed()
    }

    /// Append a letter to the in-progress guess
    ///
    /// Returns false when the letter was ignored.
    pub fn push_char(&mut self, c: char) -> bool {
        if !c.is_ascii_alphabetic()
            || self.current.chars().count() >= MAX_WORD_LENGTH
            || !self.accepts_input()
        {
            return false;
        }
        self.current.push(c.to_ascii_uppercase());
        assert_board_invariants(self);
        true
    }

    pub fn delete_char(&mut self) {
        self.current.pop();
    }

    /// The in-progress guess, if it has the shape the service accepts
    pub fn submission(&self) -> Result<String> {
        validate_word(&self.current)
    }

    /// Record a guess the service accepted
    pub fn accept(&mut self, guess: &str) {
        self.guesses.push(guess.to_uppercase());
        self.current.clear();
    }
}

fn normalized(guesses: &[String]) -> Vec<String> {
    guesses.iter().map(|g| g.to_uppercase()).collect()
}

/// Check a word is exactly `MAX_WORD_LENGTH` letters and uppercase it
pub fn validate_word(word: &str) -> Result<String> {
    let word = word.trim();
    if word.chars().count() != MAX_WORD_LENGTH {
        return Err(Error::Validation(format!(
            "Word must be {} characters long",
            MAX_WORD_LENGTH
        )));
    }
    if !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Validation("Word must only contain letters".into()));
    }
    Ok(word.to_ascii_uppercase())
}
