//! Data models for Worduel

mod duel;
mod game;
mod user;

pub use duel::*;
pub use game::*;
pub use user::*;
