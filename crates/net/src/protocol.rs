//! GraphQL documents and wire types
//!
//! Requests are `{"query", "variables"}` JSON bodies; responses carry
//! `data` and/or `errors`. Wire types keep every field optional because the
//! service returns `null` freely; conversion into core models is where
//! missing data becomes an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use worduel_core::trace::decode_trace;
use worduel_core::{Duel, DuelSummary, Game, Score, UserProfile, UserRef};

use crate::error::{Error, Result};

/// How the service delivers a game's solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionEncoding {
    /// Plain `solution` field
    #[default]
    Plain,
    /// Numeric `traceID` field, decoded locally
    Trace,
}

fn game_fields(encoding: SolutionEncoding) -> String {
    let solution = match encoding {
        SolutionEncoding::Plain => "solution",
        SolutionEncoding::Trace => "traceID",
    };
    format!(
        "id completed {} guesses creator {{ id name }} player {{ id name }}",
        solution
    )
}

pub fn get_duel_query(encoding: SolutionEncoding) -> String {
    let game = game_fields(encoding);
    format!(
        "query getDuel($duelId: ID) {{ getDuel(duelId: $duelId) {{ \
         id players {{ id name }} games {{ {game} }} currentGame {{ {game} }} \
         currentScore {{ userName score }} }} }}"
    )
}

pub fn get_game_query(encoding: SolutionEncoding) -> String {
    format!(
        "query getGame($gameId: ID) {{ getGame(gameId: $gameId) {{ {} }} }}",
        game_fields(encoding)
    )
}

pub const GET_USER: &str = "query getUser($userId: ID) { getUser(userId: $userId) { \
    id duels { id players { id name } currentGame { player { id } } \
    currentScore { userName score } } } }";

pub const GET_RANDOM_WORD: &str =
    "query getRandomWord($length: Int) { getRandomWord(length: $length) }";

pub const CREATE_USER: &str = "mutation createUser($name: String!) { createUser(name: $name) }";

pub const CREATE_DUEL: &str =
    "mutation createDuel($creatorId: ID!) { createDuel(creatorId: $creatorId) }";

pub const CREATE_GAME: &str = "mutation createGame($solution: String, $duelId: ID, $creatorId: ID) { \
    createGame(solution: $solution, duelId: $duelId, creatorId: $creatorId) { id message success } }";

pub const ACCEPT_DUEL: &str =
    "mutation acceptDuel($duelId: ID, $playerId: ID) { acceptDuel(duelId: $duelId, playerId: $playerId) }";

pub const SUBMIT_GUESS: &str = "mutation submitGuess($gameId: ID, $guess: String) { \
    submitGuess(gameId: $gameId, guess: $guess) { \
    isEligibleGuess solved failed message } }";

/// Request body
#[derive(Debug, Serialize)]
pub struct GqlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GqlError {
    pub message: String,
}

/// Response envelope
#[derive(Debug, Deserialize)]
pub struct GqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GqlError>>,
}

impl GqlResponse {
    /// Take the named root field, surfacing service errors verbatim
    pub fn field(self, name: &str) -> Result<Value> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Graphql(message));
        }

        let mut data = self
            .data
            .ok_or_else(|| Error::Protocol("Response has neither data nor errors".into()))?;

        Ok(data
            .get_mut(name)
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUser {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl WireUser {
    fn into_user(self) -> Option<UserRef> {
        Some(UserRef {
            id: self.id?,
            name: self.name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGame {
    pub id: Option<String>,
    pub completed: Option<bool>,
    pub solution: Option<String>,
    #[serde(rename = "traceID")]
    pub trace_id: Option<String>,
    pub guesses: Option<Vec<String>>,
    pub creator: Option<WireUser>,
    pub player: Option<WireUser>,
}

impl WireGame {
    pub fn into_game(self, encoding: SolutionEncoding) -> Result<Game> {
        let id = self
            .id
            .ok_or_else(|| Error::Protocol("Game without id".into()))?;

        let solution = match encoding {
            SolutionEncoding::Plain => self.solution.unwrap_or_default(),
            SolutionEncoding::Trace => match self.trace_id {
                Some(trace) => decode_trace(&trace)?,
                None => String::new(),
            },
        };

        let creator = self
            .creator
            .and_then(WireUser::into_user)
            .ok_or_else(|| Error::Protocol(format!("Game {} has no creator", id)))?;

        Ok(Game {
            id,
            solution: solution.to_uppercase(),
            guesses: self
                .guesses
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.to_uppercase())
                .collect(),
            completed: self.completed.unwrap_or(false),
            creator,
            player: self.player.and_then(WireUser::into_user),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScore {
    pub user_name: Option<String>,
    pub score: Option<i64>,
}

impl WireScore {
    fn into_score(self) -> Score {
        Score {
            user_name: self.user_name.unwrap_or_default(),
            score: u32::try_from(self.score.unwrap_or(0).max(0)).unwrap_or(u32::MAX),
        }
    }
}

fn into_scores(scores: Option<Vec<WireScore>>) -> Vec<Score> {
    scores
        .unwrap_or_default()
        .into_iter()
        .map(WireScore::into_score)
        .collect()
}

fn into_users(users: Option<Vec<WireUser>>) -> Vec<UserRef> {
    users
        .unwrap_or_default()
        .into_iter()
        .filter_map(WireUser::into_user)
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDuel {
    pub id: Option<String>,
    pub players: Option<Vec<WireUser>>,
    pub games: Option<Vec<WireGame>>,
    pub current_game: Option<WireGame>,
    pub current_score: Option<Vec<WireScore>>,
}

impl WireDuel {
    pub fn into_duel(self, encoding: SolutionEncoding) -> Result<Duel> {
        let id = self
            .id
            .ok_or_else(|| Error::Protocol("Duel without id".into()))?;

        let games = self
            .games
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.into_game(encoding))
            .collect::<Result<Vec<_>>>()?;

        Ok(Duel {
            id,
            players: into_users(self.players),
            games,
            current_game: self
                .current_game
                .map(|g| g.into_game(encoding))
                .transpose()?,
            current_score: into_scores(self.current_score),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCurrentPlayer {
    pub player: Option<WireUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDuelSummary {
    pub id: Option<String>,
    pub players: Option<Vec<WireUser>>,
    pub current_game: Option<WireCurrentPlayer>,
    pub current_score: Option<Vec<WireScore>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUserProfile {
    pub id: Option<String>,
    pub duels: Option<Vec<WireDuelSummary>>,
}

impl WireUserProfile {
    pub fn into_profile(self) -> Result<UserProfile> {
        let id = self
            .id
            .ok_or_else(|| Error::Protocol("User without id".into()))?;

        let duels = self
            .duels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|d| {
                Some(DuelSummary {
                    id: d.id?,
                    players: into_users(d.players),
                    current_player_id: d
                        .current_game
                        .and_then(|g| g.player)
                        .and_then(|p| p.id),
                    current_score: into_scores(d.current_score),
                })
            })
            .collect();

        Ok(UserProfile { id, duels })
    }
}

/// Result of `createGame`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCreated {
    pub id: Option<String>,
    pub message: String,
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireGameCreated {
    pub id: Option<String>,
    pub message: Option<String>,
    pub success: Option<bool>,
}

impl From<WireGameCreated> for GameCreated {
    fn from(w: WireGameCreated) -> Self {
        Self {
            id: w.id.filter(|id| !id.is_empty()),
            message: w.message.unwrap_or_default(),
            success: w.success.unwrap_or(false),
        }
    }
}

/// Result of `submitGuess`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReceipt {
    pub is_eligible_guess: bool,
    pub solved: bool,
    pub failed: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGuessReceipt {
    pub is_eligible_guess: Option<bool>,
    pub solved: Option<bool>,
    pub failed: Option<bool>,
    pub message: Option<String>,
}

impl From<WireGuessReceipt> for GuessReceipt {
    fn from(w: WireGuessReceipt) -> Self {
        Self {
            // a missing flag means the service did not object
            is_eligible_guess: w.is_eligible_guess.unwrap_or(true),
            solved: w.solved.unwrap_or(false),
            failed: w.failed.unwrap_or(false),
            message: w.message.unwrap_or_default(),
        }
    }
}

/// Interpret an `acceptDuel` answer: a non-empty id or `true` means yes
pub fn is_acknowledged(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        _ => false,
    }
}
