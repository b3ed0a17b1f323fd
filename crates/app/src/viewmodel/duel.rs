//! Duel view model
//!
//! Owns the guess board and the latest polled duel for one route. Every
//! mutation asks the poller for an immediate refresh so the next snapshot
//! confirms (or corrects) what the board shows.

use std::sync::Arc;

use tracing::{debug, info, warn};
use worduel_core::invariants::check_duel;
use worduel_core::{
    derive_scene, validate_word, DuelScene, FollowUp, GuessBoard, Route, Scene, Snapshot,
};
use worduel_net::DuelService;

use crate::poller::{PollEvent, PollTarget, Poller};
use crate::state::{AppState, NoticeKind};

pub struct DuelViewModel<S> {
    state: Arc<AppState<S>>,
    duel_id: String,
    board: GuessBoard,
    snapshot: Option<Snapshot>,
    poller: Poller,
}

impl<S> DuelViewModel<S>
where
    S: DuelService + Send + Sync + 'static,
{
    /// Start following a duel
    pub fn open(state: Arc<AppState<S>>, duel_id: String) -> Self {
        let poller = Poller::spawn(
            state.service.clone(),
            PollTarget::Duel(duel_id.clone()),
            state.config.poll_interval(),
        );

        Self {
            state,
            duel_id,
            board: GuessBoard::new(),
            snapshot: None,
            poller,
        }
    }

    pub fn duel_id(&self) -> &str {
        &self.duel_id
    }

    pub fn board(&self) -> &GuessBoard {
        &self.board
    }

    pub fn poller_mut(&mut self) -> &mut Poller {
        &mut self.poller
    }

    pub fn scene(&self) -> Scene {
        derive_scene(
            self.state.identity().as_ref(),
            &Route::Duel(self.duel_id.clone()),
            self.snapshot.as_ref(),
            &self.board,
        )
    }

    /// Fold a poll result into the board and snapshot
    pub fn apply(&mut self, event: PollEvent) {
        match event {
            PollEvent::Duel(duel) if duel.id == self.duel_id => {
                for problem in check_duel(&duel) {
                    warn!(duel_id = %self.duel_id, %problem, "Inconsistent duel snapshot");
                }
                if let Some(game) = &duel.current_game {
                    self.board.sync(game);
                }
                self.snapshot = Some(Snapshot::Duel(duel));
            }
            PollEvent::Duel(duel) => {
                debug!(expected = %self.duel_id, got = %duel.id, "Ignoring stale duel");
            }
            PollEvent::Missing => {
                if self.snapshot.is_none() {
                    self.state.notify_error(format!("Duel {} not found", self.duel_id));
                    self.state.navigate(Route::Home);
                }
            }
            PollEvent::Failed(message) => {
                debug!(duel_id = %self.duel_id, %message, "Keeping previous snapshot");
            }
            PollEvent::Game(_) => {}
        }
    }

    fn interactive(&self) -> bool {
        matches!(
            self.scene(),
            Scene::Duel(DuelScene::Active(view)) if view.is_interactive()
        )
    }

    pub fn type_char(&mut self, c: char) -> bool {
        self.interactive() && self.board.push_char(c)
    }

    pub fn delete_char(&mut self) {
        if self.interactive() {
            self.board.delete_char();
        }
    }

    /// Join the duel as its second player
    pub async fn accept(&mut self) {
        if !matches!(self.scene(), Scene::Duel(DuelScene::AcceptPrompt { .. })) {
            debug!(duel_id = %self.duel_id, "Nothing to accept");
            return;
        }
        let Some(player_id) = self.state.identity_id() else {
            return;
        };

        match self.state.service.accept_duel(&self.duel_id, &player_id).await {
            Ok(true) => {
                info!(duel_id = %self.duel_id, "Duel accepted");
                self.state.notify(NoticeKind::Success, "Duel accepted, start guessing!");
            }
            Ok(false) => self.state.notify_error("Could not join this duel"),
            Err(e) => self.state.notify_error(e.to_string()),
        }
        self.poller.refresh();
    }

    /// Submit the in-progress guess
    pub async fn enter(&mut self) {
        if !self.interactive() {
            return;
        }
        let guess = match self.board.submission() {
            Ok(guess) => guess,
            Err(e) => {
                self.state.notify_error(e.to_string());
                return;
            }
        };
        let Some(game_id) = self.board.game_id().map(str::to_string) else {
            return;
        };

        match self.state.service.submit_guess(&game_id, &guess).await {
            Ok(receipt) if receipt.is_eligible_guess => {
                debug!(%game_id, %guess, solved = receipt.solved, "Guess accepted");
                self.board.accept(&guess);
                if receipt.solved {
                    self.state.notify(NoticeKind::Success, "Solved!");
                } else if receipt.failed {
                    self.state.notify_error("Out of guesses");
                }
            }
            Ok(receipt) => {
                warn!(%game_id, %guess, "Guess rejected");
                self.state.notify_error(receipt.message);
            }
            Err(e) => self.state.notify_error(e.to_string()),
        }
        self.poller.refresh();
    }

    /// Set the word for the game after a completed one, or for the first
    /// game of a duel that has none
    pub async fn create_next_game(&mut self, word: &str) -> bool {
        let offered = match self.scene() {
            Scene::Duel(DuelScene::Active(view)) => view.follow_up == FollowUp::CreateNextGame,
            Scene::Duel(DuelScene::NoGame { can_create }) => can_create,
            _ => false,
        };
        if !offered {
            self.state.notify_error("It is not your turn to pick the next word");
            return false;
        }

        let solution = match validate_word(word) {
            Ok(solution) => solution,
            Err(e) => {
                self.state.notify_error(e.to_string());
                return false;
            }
        };
        let Some(creator_id) = self.state.identity_id() else {
            return false;
        };

        let ok = match self
            .state
            .service
            .create_game(&self.duel_id, &creator_id, &solution)
            .await
        {
            Ok(created) if created.success => {
                info!(duel_id = %self.duel_id, game_id = ?created.id, "Next game created");
                self.state.notify(NoticeKind::Success, "New game created");
                true
            }
            Ok(created) => {
                self.state.notify_error(created.message);
                false
            }
            Err(e) => {
                self.state.notify_error(e.to_string());
                false
            }
        };
        self.poller.refresh();
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::FakeService;
    use worduel_core::{ActiveView, Banner, Database, Identity, Role};

    struct Fixture {
        alice: Arc<AppState<FakeService>>,
        bob: Arc<AppState<FakeService>>,
        duel_id: String,
    }

    /// Two sessions sharing one service; alice created the duel
    fn fixture() -> Fixture {
        let service = FakeService::new();
        let alice_id = service.add_user("alice");
        let bob_id = service.add_user("bob");
        let (duel_id, _) = service.seed_duel(&alice_id, "CRATE");

        let session = |id: String, name: &str| {
            let state = AppState::with_database(
                Config::default(),
                service.clone(),
                Database::open_in_memory().unwrap(),
            )
            .unwrap();
            state.set_identity(Identity::new(id, name.into())).unwrap();
            Arc::new(state)
        };

        Fixture {
            alice: session(alice_id, "alice"),
            bob: session(bob_id, "bob"),
            duel_id,
        }
    }

    /// Apply whatever is queued, then wait for a snapshot taken from now on
    async fn synced(vm: &mut DuelViewModel<FakeService>) {
        while let Some(event) = vm.poller_mut().try_recv() {
            vm.apply(event);
        }
        vm.poller_mut().refresh();
        while let Some(event) = vm.poller_mut().next_event().await {
            let done = matches!(event, PollEvent::Duel(_));
            vm.apply(event);
            if done {
                break;
            }
        }
    }

    fn active(vm: &DuelViewModel<FakeService>) -> ActiveView {
        match vm.scene() {
            Scene::Duel(DuelScene::Active(view)) => view,
            other => panic!("Expected active duel, got {:?}", other),
        }
    }

    async fn bob_joined(f: &Fixture) -> DuelViewModel<FakeService> {
        let mut bob = DuelViewModel::open(f.bob.clone(), f.duel_id.clone());
        synced(&mut bob).await;
        bob.accept().await;
        synced(&mut bob).await;
        f.bob.drain_notices();
        bob
    }

    #[tokio::test]
    async fn test_accept_then_guess_to_win() {
        let f = fixture();
        let mut bob = DuelViewModel::open(f.bob.clone(), f.duel_id.clone());
        synced(&mut bob).await;
        assert!(matches!(bob.scene(), Scene::Duel(DuelScene::AcceptPrompt { .. })));

        bob.accept().await;
        synced(&mut bob).await;
        assert_eq!(active(&bob).role, Role::Player);

        for c in "crate".chars() {
            assert!(bob.type_char(c));
        }
        assert!(!bob.type_char('x'));
        bob.enter().await;

        // optimistic before the refresh lands
        assert_eq!(active(&bob).banner, Some(Banner::Won));

        synced(&mut bob).await;
        let view = active(&bob);
        assert_eq!(view.guesses, vec!["CRATE".to_string()]);
        assert_eq!(view.follow_up, FollowUp::CreateNextGame);
    }

    #[tokio::test]
    async fn test_short_guess_not_sent() {
        let f = fixture();
        let mut bob = bob_joined(&f).await;

        bob.type_char('c');
        bob.enter().await;

        assert!(!f.bob.service.calls().contains(&"submitGuess".to_string()));
        let notices = f.bob.drain_notices();
        assert_eq!(notices[0].text, "Word must be 5 characters long");
        assert_eq!(bob.board().current(), "C");
    }

    #[tokio::test]
    async fn test_ineligible_guess_leaves_board() {
        let f = fixture();
        f.bob.service.set_dictionary(&["CRATE", "SPOUT"]);
        let mut bob = bob_joined(&f).await;

        for c in "zzzzz".chars() {
            bob.type_char(c);
        }
        bob.enter().await;

        assert!(bob.board().guesses().is_empty());
        assert_eq!(f.bob.drain_notices()[0].text, "ZZZZZ is not in the word list");
    }

    #[tokio::test]
    async fn test_refused_accept_reported() {
        let f = fixture();
        f.bob.service.set_refuse_accept(true);
        let mut bob = DuelViewModel::open(f.bob.clone(), f.duel_id.clone());
        synced(&mut bob).await;

        bob.accept().await;
        synced(&mut bob).await;
        assert!(matches!(bob.scene(), Scene::Duel(DuelScene::AcceptPrompt { .. })));
        assert_eq!(f.bob.drain_notices()[0].text, "Could not join this duel");
    }

    #[tokio::test]
    async fn test_creator_cannot_type_and_stands_by() {
        let f = fixture();
        let _bob = bob_joined(&f).await;

        let mut alice = DuelViewModel::open(f.alice.clone(), f.duel_id.clone());
        synced(&mut alice).await;
        assert_eq!(active(&alice).role, Role::Creator);
        assert!(!alice.type_char('a'));

        let game_id = f.alice.service.duel(&f.duel_id).unwrap().games[0].id.clone();
        f.alice.service.seed_guess(&game_id, "CRATE");
        synced(&mut alice).await;
        assert_eq!(active(&alice).follow_up, FollowUp::StandBy);
        assert!(!alice.create_next_game("plant").await);
    }

    #[tokio::test]
    async fn test_next_game_swaps_roles() {
        let f = fixture();
        let mut bob = bob_joined(&f).await;
        for c in "crate".chars() {
            bob.type_char(c);
        }
        bob.enter().await;
        synced(&mut bob).await;

        assert!(!bob.create_next_game("cat").await);
        assert!(bob.create_next_game("plant").await);
        synced(&mut bob).await;

        let view = active(&bob);
        assert_eq!(view.role, Role::Creator);
        assert!(view.guesses.is_empty());
        assert!(bob.board().current().is_empty());
    }

    #[tokio::test]
    async fn test_third_identity_sees_closed_duel() {
        let f = fixture();
        let _bob = bob_joined(&f).await;

        let carol_id = f.alice.service.add_user("carol");
        f.alice
            .set_identity(Identity::new(carol_id, "carol".into()))
            .unwrap();

        let mut carol = DuelViewModel::open(f.alice.clone(), f.duel_id.clone());
        synced(&mut carol).await;
        assert_eq!(carol.scene(), Scene::Duel(DuelScene::Closed));
    }

    #[tokio::test]
    async fn test_unknown_duel_goes_home() {
        let f = fixture();
        f.bob.navigate(Route::Duel("missing".into()));
        let mut vm = DuelViewModel::open(f.bob.clone(), "missing".into());
        let event = vm.poller_mut().next_event().await.unwrap();
        vm.apply(event);

        assert_eq!(f.bob.route(), Route::Home);
        assert_eq!(vm.scene(), Scene::Loading);
    }

    #[tokio::test]
    async fn test_snapshot_beyond_local_rules_does_not_panic() {
        let f = fixture();
        let mut bob = bob_joined(&f).await;

        // five misses the service has not closed yet, then a sixth it allowed
        let mut duel = f.bob.service.duel(&f.duel_id).unwrap();
        for count in [5, 6] {
            let game = duel.games.last_mut().unwrap();
            game.guesses = vec!["SPOUT".into(); count];
            game.completed = false;
            duel.current_game = duel.games.last().cloned();
            bob.apply(PollEvent::Duel(duel.clone()));

            let view = active(&bob);
            assert_eq!(view.guesses.len(), count);
            assert_eq!(view.banner, Some(Banner::Lost));
            assert!(!bob.type_char('a'));
        }
    }

    #[tokio::test]
    async fn test_first_game_created_in_empty_duel() {
        let f = fixture();
        let alice_id = f.alice.identity_id().unwrap();
        let duel_id = f.alice.service.create_duel(&alice_id).await.unwrap();

        let mut alice = DuelViewModel::open(f.alice.clone(), duel_id.clone());
        synced(&mut alice).await;
        assert_eq!(alice.scene(), Scene::Duel(DuelScene::NoGame { can_create: true }));

        assert!(alice.create_next_game("plant").await);
        synced(&mut alice).await;
        assert_eq!(active(&alice).role, Role::Creator);
    }
}
