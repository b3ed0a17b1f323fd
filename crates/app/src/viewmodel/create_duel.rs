//! Duel creation view model
//!
//! The home scene: start a new duel with a chosen word, draw a random
//! word, or jump back into one of the identity's recent duels.

use std::sync::Arc;

use tracing::{info, warn};
use worduel_core::{validate_word, DuelSummary, Route, MAX_WORD_LENGTH};
use worduel_net::DuelService;

use crate::state::{AppState, NoticeKind};

pub struct CreateDuelViewModel<S> {
    state: Arc<AppState<S>>,
    /// Word prepared by the random word button
    word: String,
    recent: Vec<DuelSummary>,
}

impl<S: DuelService> CreateDuelViewModel<S> {
    pub fn new(state: Arc<AppState<S>>) -> Self {
        Self {
            state,
            word: String::new(),
            recent: Vec::new(),
        }
    }

    pub fn recent(&self) -> &[DuelSummary] {
        &self.recent
    }

    /// Fetch the identity's duels for the recent list
    pub async fn load_recent(&mut self) {
        let Some(user_id) = self.state.identity_id() else {
            return;
        };

        match self.state.service.get_user(&user_id).await {
            Ok(Some(profile)) => self.recent = profile.duels,
            Ok(None) => self.recent.clear(),
            Err(e) => warn!(%user_id, error = %e, "Could not load recent duels"),
        }
    }

    pub async fn random_word(&mut self) -> Option<String> {
        match self.state.service.random_word(MAX_WORD_LENGTH).await {
            Ok(word) => {
                self.word = word.clone();
                Some(word)
            }
            Err(e) => {
                self.state.notify_error(e.to_string());
                None
            }
        }
    }

    /// Create a duel whose first game uses `word`, then open it
    ///
    /// An empty `word` falls back to the last random word.
    pub async fn create(&mut self, word: &str) -> Option<String> {
        let word = if word.trim().is_empty() { self.word.clone() } else { word.to_string() };
        let solution = match validate_word(&word) {
            Ok(solution) => solution,
            Err(e) => {
                self.state.notify_error(e.to_string());
                return None;
            }
        };

        let Some(creator_id) = self.state.identity_id() else {
            self.state.notify_error("Register a username first");
            return None;
        };

        let duel_id = match self.state.service.create_duel(&creator_id).await {
            Ok(id) => id,
            Err(e) => {
                self.state.notify_error(e.to_string());
                return None;
            }
        };

        match self
            .state
            .service
            .create_game(&duel_id, &creator_id, &solution)
            .await
        {
            Ok(created) if created.success => {}
            Ok(created) => {
                self.state.notify_error(created.message);
                return None;
            }
            Err(e) => {
                self.state.notify_error(e.to_string());
                return None;
            }
        }

        info!(%duel_id, "Duel created");
        self.word.clear();
        self.state.notify(NoticeKind::Success, "Duel created, share its id with a friend");
        self.state.navigate(Route::Duel(duel_id.clone()));
        Some(duel_id)
    }
}
