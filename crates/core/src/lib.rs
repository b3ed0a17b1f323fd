//! Worduel Core Library
//!
//! Guess scoring, duel state reconciliation, domain models and local
//! identity storage for the Worduel client.

pub mod board;
pub mod error;
pub mod invariants;
pub mod models;
pub mod reconcile;
pub mod scoring;
pub mod storage;
pub mod trace;

pub use board::{validate_word, GuessBoard};
pub use error::{Error, Result};
pub use models::*;
pub use reconcile::{
    derive_scene, ActiveView, Banner, DuelScene, FollowUp, Role, Route, Scene, Snapshot,
    SpectatorView,
};
pub use scoring::{GameOutcome, KeyboardState, LetterStatus};
pub use storage::{Database, IdentityRepository, IdentityStore};

/// Letters per word
pub const MAX_WORD_LENGTH: usize = 5;

/// Guesses allowed per game
pub const MAX_CHALLENGES: usize = 5;
