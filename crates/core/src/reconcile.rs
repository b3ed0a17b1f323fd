//! Scene derivation
//!
//! Decides what the client shows from the local identity, the route, the
//! latest polled snapshot and the local guess board. Rules are checked in
//! order and the first match wins.

use serde::{Deserialize, Serialize};

use crate::board::GuessBoard;
use crate::models::{Duel, Game, Identity, Score, UserRef};
use crate::scoring::{self, GameOutcome, KeyboardState, LetterStatus};

/// Where the user navigated to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// No duel reference: create a duel or pick a recent one
    Home,
    Duel(String),
    /// Follow a single game by id
    Spectate(String),
}

/// Latest data polled for the route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Duel(Duel),
    Game(Game),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene {
    Username,
    CreateDuel,
    /// Route points somewhere but nothing has been polled yet
    Loading,
    Duel(DuelScene),
    Spectator(SpectatorView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuelScene {
    /// Two other players already hold this duel
    Closed,
    /// Nobody has accepted yet and we are not the creator
    AcceptPrompt { creator: UserRef },
    /// The duel exists but no game was ever created in it
    NoGame { can_create: bool },
    Active(ActiveView),
}

/// Our part in the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Creator,
    Player,
    Spectator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Won,
    Lost,
}

/// What to offer once a game is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    None,
    /// We set the word for the next game
    CreateNextGame,
    /// The other side sets the next word
    StandBy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveView {
    pub game_id: String,
    pub role: Role,
    pub creator: UserRef,
    pub player: Option<UserRef>,
    pub guesses: Vec<String>,
    /// Per-letter statuses, one row per guess
    pub rows: Vec<Vec<LetterStatus>>,
    pub current_guess: String,
    /// Present only while we are the one guessing
    pub keyboard: Option<KeyboardState>,
    /// Revealed once the game is over
    pub solution: Option<String>,
    pub banner: Option<Banner>,
    pub follow_up: FollowUp,
    /// Running duel score in join order
    pub scores: Vec<Score>,
    /// Letters ruled out so far, shown to the guessing player
    pub discarded: Vec<char>,
}

impl ActiveView {
    pub fn is_interactive(&self) -> bool {
        self.keyboard.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectatorView {
    pub game_id: String,
    pub creator: UserRef,
    pub guesses: Vec<String>,
    pub rows: Vec<Vec<LetterStatus>>,
    pub banner: Option<Banner>,
}

impl SpectatorView {
    pub fn has_started(&self) -> bool {
        !self.guesses.is_empty()
    }
}

/// Pick the scene to show
pub fn derive_scene(
    identity: Option<&Identity>,
    route: &Route,
    snapshot: Option<&Snapshot>,
    board: &GuessBoard,
) -> Scene {
    let Some(identity) = identity else {
        return Scene::Username;
    };

    match (route, snapshot) {
        (Route::Home, _) => Scene::CreateDuel,
        (Route::Duel(id), Some(Snapshot::Duel(duel))) if &duel.id == id => {
            derive_duel_scene(&identity.id, duel, board)
        }
        (Route::Spectate(id), Some(Snapshot::Game(game))) if &game.id == id => {
            Scene::Spectator(spectator_view(game))
        }
        _ => Scene::Loading,
    }
}

fn derive_duel_scene(me: &str, duel: &Duel, board: &GuessBoard) -> Scene {
    if duel.is_closed_to(me) {
        return Scene::Duel(DuelScene::Closed);
    }

    let Some(game) = duel.current_game.as_ref() else {
        return Scene::Duel(DuelScene::NoGame {
            can_create: duel.has_player(me),
        });
    };

    if game.player.is_none() && !game.is_creator(me) {
        return Scene::Duel(DuelScene::AcceptPrompt {
            creator: game.creator.clone(),
        });
    }

    Scene::Duel(DuelScene::Active(active_view(me, duel, game, board)))
}

fn active_view(me: &str, duel: &Duel, game: &Game, board: &GuessBoard) -> ActiveView {
    let role = if game.is_creator(me) {
        Role::Creator
    } else if game.is_player(me) {
        Role::Player
    } else {
        Role::Spectator
    };

    let synced = board.game_id() == Some(game.id.as_str());
    let (guesses, current_guess, outcome) = if synced {
        (
            board.guesses().to_vec(),
            board.current().to_string(),
            board.outcome(),
        )
    } else {
        (game.guesses.clone(), String::new(), game.outcome())
    };

    let completed = game.completed || outcome.is_completed();

    let banner = completed.then_some(match outcome {
        GameOutcome::Won => Banner::Won,
        _ => Banner::Lost,
    });

    let follow_up = if !completed {
        FollowUp::None
    } else if game.next_creator().is_some_and(|u| u.id == me) {
        FollowUp::CreateNextGame
    } else {
        FollowUp::StandBy
    };

    let keyboard = (role == Role::Player && !completed).then(|| {
        if synced {
            board.keyboard()
        } else {
            scoring::keyboard_statuses(&game.guesses, &game.solution)
        }
    });
    let rows = score_rows(&guesses, &game.solution);
    let discarded = if role == Role::Player {
        scoring::discarded_letters(&guesses, &game.solution)
    } else {
        Vec::new()
    };

    ActiveView {
        game_id: game.id.clone(),
        role,
        creator: game.creator.clone(),
        player: game.player.clone(),
        guesses,
        rows,
        current_guess: if role == Role::Player { current_guess } else { String::new() },
        keyboard,
        solution: completed.then(|| game.solution.to_uppercase()),
        banner,
        follow_up,
        scores: duel.scores(),
        discarded,
    }
}

fn spectator_view(game: &Game) -> SpectatorView {
    let outcome = game.outcome();
    SpectatorView {
        game_id: game.id.clone(),
        creator: game.creator.clone(),
        guesses: game.guesses.clone(),
        rows: score_rows(&game.guesses, &game.solution),
        banner: match outcome {
            GameOutcome::Won => Some(Banner::Won),
            GameOutcome::Lost => Some(Banner::Lost),
            GameOutcome::InProgress if game.completed => Some(Banner::Lost),
            GameOutcome::InProgress => None,
        },
    }
}

/// Rows that cannot be scored (unknown solution) come back empty
fn score_rows(guesses: &[String], solution: &str) -> Vec<Vec<LetterStatus>> {
    guesses
        .iter()
        .map(|g| scoring::score_guess(g, solution).unwrap_or_default())
        .collect()
}
