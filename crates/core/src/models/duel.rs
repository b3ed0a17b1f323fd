//! Duel model

use serde::{Deserialize, Serialize};

use super::{Game, UserRef};

/// Players a duel can hold
pub const DUEL_CAPACITY: usize = 2;

/// Cumulative wins for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub user_name: String,
    pub score: u32,
}

/// A match between two identities spanning several games
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duel {
    pub id: String,
    /// Participants in first-join order
    pub players: Vec<UserRef>,
    pub games: Vec<Game>,
    pub current_game: Option<Game>,
    pub current_score: Vec<Score>,
}

impl Duel {
    pub fn has_player(&self, user_id: &str) -> bool {
        self.players.iter().any(|p| p.id == user_id)
    }

    /// True while a second player can still accept
    pub fn is_open(&self) -> bool {
        self.players.len() < DUEL_CAPACITY
    }

    /// A full duel is closed to anyone who is not already in it
    pub fn is_closed_to(&self, user_id: &str) -> bool {
        !self.is_open() && !self.has_player(user_id)
    }

    /// Scores as reported by the service, or tallied from the games when
    /// the service left them out
    pub fn scores(&self) -> Vec<Score> {
        if self.current_score.is_empty() {
            tally_scores(&self.players, &self.games)
        } else {
            self.current_score.clone()
        }
    }
}

/// Sum each player's points over the completed games
pub fn tally_scores(players: &[UserRef], games: &[Game]) -> Vec<Score> {
    players
        .iter()
        .map(|p| Score {
            user_name: p.name.clone(),
            score: games
                .iter()
                .filter(|g| g.is_player(&p.id))
                .map(Game::points)
                .sum(),
        })
        .collect()
}

/// A duel as listed under "recent duels"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelSummary {
    pub id: String,
    pub players: Vec<UserRef>,
    /// Who is guessing in the current game, if anyone
    pub current_player_id: Option<String>,
    pub current_score: Vec<Score>,
}

impl DuelSummary {
    /// Whether the given player is the one currently guessing
    pub fn is_turn_of(&self, user_id: &str) -> bool {
        self.current_player_id.as_deref() == Some(user_id)
    }

    /// Score for the player at `index` in join order
    pub fn score_at(&self, index: usize) -> Option<u32> {
        self.current_score.get(index).map(|s| s.score)
    }
}
