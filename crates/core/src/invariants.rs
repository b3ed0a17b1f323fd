//! Developer guardrails and invariants
//!
//! Two kinds of checks live here. State the client builds itself is
//! guarded with debug assertions, compiled out in release builds.
//! Snapshots polled from the service are only ever reported: the
//! `check_*` functions return the problems found so callers can log them.

use crate::board::GuessBoard;
use crate::models::{Duel, Game, DUEL_CAPACITY};
use crate::scoring::GameOutcome;
use crate::{MAX_CHALLENGES, MAX_WORD_LENGTH};

/// Validate the locally typed guess
pub fn assert_board_invariants(board: &GuessBoard) {
    debug_assert!(
        board.current().chars().count() <= MAX_WORD_LENGTH,
        "In-progress guess '{}' is longer than {} letters",
        board.current(),
        MAX_WORD_LENGTH
    );

    debug_assert!(
        board.current().chars().all(|c| c.is_ascii_uppercase()),
        "In-progress guess '{}' has characters other than uppercase letters",
        board.current()
    );
}

/// Problems with a polled game, empty when it looks consistent
pub fn check_game(game: &Game) -> Vec<String> {
    let mut problems = Vec::new();

    if game.guesses.len() > MAX_CHALLENGES {
        problems.push(format!(
            "game {} has {} guesses, at most {} expected",
            game.id,
            game.guesses.len(),
            MAX_CHALLENGES
        ));
    }

    let letters = game.solution.chars().count();
    if !game.solution.is_empty() && letters != MAX_WORD_LENGTH {
        problems.push(format!("game {} solution has {} letters", game.id, letters));
    }

    if game.outcome() == GameOutcome::Won && !game.completed {
        problems.push(format!("game {} is solved but not marked completed", game.id));
    }

    if game.is_player(&game.creator.id) {
        problems.push(format!("game {} has the creator guessing their own word", game.id));
    }

    problems
}

/// Problems with a polled duel and its games
pub fn check_duel(duel: &Duel) -> Vec<String> {
    let mut problems = Vec::new();

    if duel.players.len() > DUEL_CAPACITY {
        problems.push(format!("duel {} has {} players", duel.id, duel.players.len()));
    }

    if let (Some(current), Some(last)) = (&duel.current_game, duel.games.last()) {
        if current.id != last.id {
            problems.push(format!(
                "duel {} current game {} is not its latest game {}",
                duel.id, current.id, last.id
            ));
        }
    }

    let current = duel
        .current_game
        .iter()
        .filter(|g| !duel.games.iter().any(|known| known.id == g.id));
    for game in duel.games.iter().chain(current) {
        problems.extend(check_game(game));
    }

    problems
}
