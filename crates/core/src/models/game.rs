//! Game model

use serde::{Deserialize, Serialize};

use super::UserRef;
use crate::scoring::{self, GameOutcome};
use crate::MAX_CHALLENGES;

/// One round within a duel
///
/// The creator sets the solution, the player guesses it. `player` stays
/// unset until the duel is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub solution: String,
    pub guesses: Vec<String>,
    pub completed: bool,
    pub creator: UserRef,
    pub player: Option<UserRef>,
}

impl Game {
    pub fn new(id: impl Into<String>, solution: &str, creator: UserRef) -> Self {
        Self {
            id: id.into(),
            solution: solution.to_uppercase(),
            guesses: Vec::new(),
            completed: false,
            creator,
            player: None,
        }
    }

    pub fn with_player(mut self, player: UserRef) -> Self {
        self.player = Some(player);
        self
    }

    /// Won, lost or still running, re-derived from the guesses
    pub fn outcome(&self) -> GameOutcome {
        scoring::outcome(&self.guesses, &self.solution)
    }

    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator.id == user_id
    }

    pub fn is_player(&self, user_id: &str) -> bool {
        self.player.as_ref().is_some_and(|p| p.id == user_id)
    }

    /// Whoever guessed this round sets the word for the next one
    pub fn next_creator(&self) -> Option<&UserRef> {
        self.player.as_ref()
    }

    /// Points the player earned: fewer guesses, more points
    pub fn points(&self) -> u32 {
        if self.completed && self.outcome() == GameOutcome::Won {
            (MAX_CHALLENGES + 1).saturating_sub(self.guesses.len()) as u32
        } else {
            0
        }
    }
}
