//! Spectator view model: follows one game read-only

use std::sync::Arc;

use tracing::{debug, warn};
use worduel_core::invariants::check_game;
use worduel_core::{derive_scene, GuessBoard, Route, Scene, Snapshot};
use worduel_net::DuelService;

use crate::poller::{PollEvent, PollTarget, Poller};
use crate::state::AppState;

pub struct SpectatorViewModel<S> {
    state: Arc<AppState<S>>,
    game_id: String,
    snapshot: Option<Snapshot>,
    poller: Poller,
}

impl<S> SpectatorViewModel<S>
where
    S: DuelService + Send + Sync + 'static,
{
    pub fn open(state: Arc<AppState<S>>, game_id: String) -> Self {
        let poller = Poller::spawn(
            state.service.clone(),
            PollTarget::Game(game_id.clone()),
            state.config.poll_interval(),
        );

        Self {
            state,
            game_id,
            snapshot: None,
            poller,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn poller_mut(&mut self) -> &mut Poller {
        &mut self.poller
    }

    pub fn scene(&self) -> Scene {
        derive_scene(
            self.state.identity().as_ref(),
            &Route::Spectate(self.game_id.clone()),
            self.snapshot.as_ref(),
            &GuessBoard::new(),
        )
    }

    pub fn apply(&mut self, event: PollEvent) {
        match event {
            PollEvent::Game(game) if game.id == self.game_id => {
                for problem in check_game(&game) {
                    warn!(game_id = %self.game_id, %problem, "Inconsistent game snapshot");
                }
                self.snapshot = Some(Snapshot::Game(game));
            }
            PollEvent::Missing if self.snapshot.is_none() => {
                self.state.notify_error(format!("Game {} not found", self.game_id));
                self.state.navigate(Route::Home);
            }
            other => debug!(game_id = %self.game_id, event = ?other, "Ignoring poll event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::FakeService;
    use worduel_core::{Banner, Database, Identity};

    fn setup() -> (Arc<AppState<FakeService>>, String) {
        let service = FakeService::new();
        let alice = service.add_user("alice");
        let carol = service.add_user("carol");
        let (_, game_id) = service.seed_duel(&alice, "CRATE");

        let state = AppState::with_database(
            Config::default(),
            service,
            Database::open_in_memory().unwrap(),
        )
        .unwrap();
        state.set_identity(Identity::new(carol, "carol".into())).unwrap();
        (Arc::new(state), game_id)
    }

    async fn next(vm: &mut SpectatorViewModel<FakeService>) {
        let event = vm.poller_mut().next_event().await.unwrap();
        vm.apply(event);
    }

    #[tokio::test]
    async fn test_follows_game_to_the_end() {
        let (state, game_id) = setup();
        let mut vm = SpectatorViewModel::open(state.clone(), game_id.clone());
        assert_eq!(vm.scene(), Scene::Loading);

        next(&mut vm).await;
        match vm.scene() {
            Scene::Spectator(view) => {
                assert_eq!(view.creator.name, "alice");
                assert!(!view.has_started());
            }
            other => panic!("Expected spectator, got {:?}", other),
        }

        state.service.seed_guess(&game_id, "SPOUT");
        state.service.seed_guess(&game_id, "CRATE");
        vm.poller_mut().refresh();
        next(&mut vm).await;

        match vm.scene() {
            Scene::Spectator(view) => {
                assert_eq!(view.guesses.len(), 2);
                assert_eq!(view.banner, Some(Banner::Won));
            }
            other => panic!("Expected spectator, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_solved_game_left_open_still_shown() {
        let (state, game_id) = setup();
        let mut vm = SpectatorViewModel::open(state.clone(), game_id.clone());
        next(&mut vm).await;

        let Scene::Spectator(view) = vm.scene() else {
            panic!("Expected spectator");
        };
        let mut game = worduel_core::Game::new(game_id, "CRATE", view.creator);
        game.guesses = vec!["CRATE".into()];
        vm.apply(PollEvent::Game(game));

        match vm.scene() {
            Scene::Spectator(view) => assert_eq!(view.banner, Some(Banner::Won)),
            other => panic!("Expected spectator, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_game_goes_home() {
        let (state, _) = setup();
        state.navigate(Route::Spectate("g404".into()));
        let mut vm = SpectatorViewModel::open(state.clone(), "g404".into());

        next(&mut vm).await;
        assert_eq!(state.route(), Route::Home);
        assert_eq!(state.drain_notices()[0].text, "Game g404 not found");
    }
}
