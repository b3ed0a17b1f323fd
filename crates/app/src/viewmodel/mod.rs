//! View models, one per scene

mod create_duel;
mod duel;
mod spectator;
mod username;

use std::sync::Arc;

use worduel_core::{derive_scene, GuessBoard, Route, Scene};
use worduel_net::DuelService;

use crate::poller::PollEvent;
use crate::state::AppState;

pub use create_duel::CreateDuelViewModel;
pub use duel::DuelViewModel;
pub use spectator::SpectatorViewModel;
pub use username::register;

/// The view model behind the current route
///
/// Replacing a screen drops its poller, which stops polling.
pub enum Screen<S> {
    Username,
    Home(CreateDuelViewModel<S>),
    Duel(DuelViewModel<S>),
    Spectate(SpectatorViewModel<S>),
}

impl<S> Screen<S>
where
    S: DuelService + Send + Sync + 'static,
{
    /// Build the screen for the session's identity and route
    pub async fn for_state(state: &Arc<AppState<S>>) -> Self {
        if state.identity().is_none() {
            return Screen::Username;
        }

        match state.route() {
            Route::Home => {
                let mut vm = CreateDuelViewModel::new(state.clone());
                vm.load_recent().await;
                Screen::Home(vm)
            }
            Route::Duel(id) => Screen::Duel(DuelViewModel::open(state.clone(), id)),
            Route::Spectate(id) => Screen::Spectate(SpectatorViewModel::open(state.clone(), id)),
        }
    }

    /// Whether this screen still matches the session
    pub fn is_current(&self, state: &AppState<S>) -> bool {
        let route = state.route();
        match (self, state.identity().is_some()) {
            (Screen::Username, has_identity) => !has_identity,
            (_, false) => false,
            (Screen::Home(_), true) => route == Route::Home,
            (Screen::Duel(vm), true) => route == Route::Duel(vm.duel_id().to_string()),
            (Screen::Spectate(vm), true) => route == Route::Spectate(vm.game_id().to_string()),
        }
    }

    pub fn scene(&self, state: &AppState<S>) -> Scene {
        match self {
            Screen::Duel(vm) => vm.scene(),
            Screen::Spectate(vm) => vm.scene(),
            Screen::Username | Screen::Home(_) => derive_scene(
                state.identity().as_ref(),
                &Route::Home,
                None,
                &GuessBoard::new(),
            ),
        }
    }

    /// Wait for the next poll result; never resolves for screens that do
    /// not poll
    pub async fn next_event(&mut self) -> PollEvent {
        let event = match self {
            Screen::Duel(vm) => vm.poller_mut().next_event().await,
            Screen::Spectate(vm) => vm.poller_mut().next_event().await,
            Screen::Username | Screen::Home(_) => None,
        };

        match event {
            Some(event) => event,
            None => std::future::pending().await,
        }
    }

    pub fn apply(&mut self, event: PollEvent) {
        match self {
            Screen::Duel(vm) => vm.apply(event),
            Screen::Spectate(vm) => vm.apply(event),
            Screen::Username | Screen::Home(_) => {}
        }
    }
}
