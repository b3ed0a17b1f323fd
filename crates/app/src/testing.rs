//! In-memory duel service for view model and poller tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use worduel_core::models::tally_scores;
use worduel_core::scoring::{outcome, score_guess};
use worduel_core::{Duel, DuelSummary, Game, UserProfile, UserRef};
use worduel_net::{DuelService, Error, GameCreated, GuessReceipt, Result};

#[derive(Default)]
struct Inner {
    users: Vec<UserRef>,
    duels: Vec<Duel>,
    /// Allowed guesses; empty accepts anything
    dictionary: Vec<String>,
    offline: bool,
    refuse_accept: bool,
    /// Delay applied to every `getDuel`
    slow_fetch: Option<Duration>,
    in_flight: usize,
    peak_in_flight: usize,
    next_id: u32,
    calls: Vec<String>,
}

impl Inner {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn user(&self, id: &str) -> Option<UserRef> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    fn duel_mut(&mut self, id: &str) -> Option<&mut Duel> {
        self.duels.iter_mut().find(|d| d.id == id)
    }

    fn enter(&mut self, call: &str) -> Result<()> {
        self.calls.push(call.to_string());
        if self.offline {
            return Err(Error::Protocol("service offline".into()));
        }
        Ok(())
    }
}

fn refresh(duel: &mut Duel) {
    duel.current_game = duel.games.last().cloned();
    duel.current_score = tally_scores(&duel.players, &duel.games);
}

/// Clones share one backing store, so several sessions can play a duel
#[derive(Clone)]
pub struct FakeService {
    inner: Arc<Mutex<Inner>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn add_user(&self, name: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.id("u");
        inner.users.push(UserRef::new(id.clone(), name));
        id
    }

    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    pub fn set_refuse_accept(&self, refuse: bool) {
        self.inner.lock().unwrap().refuse_accept = refuse;
    }

    pub fn set_dictionary(&self, words: &[&str]) {
        self.inner.lock().unwrap().dictionary = words.iter().map(|w| w.to_string()).collect();
    }

    pub fn set_slow_fetch(&self, delay: Option<Duration>) {
        self.inner.lock().unwrap().slow_fetch = delay;
    }

    /// Most `getDuel` requests seen running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.inner.lock().unwrap().peak_in_flight
    }

    fn begin_fetch(&self) -> Option<Duration> {
        let mut inner = self.inner.lock().unwrap();
        inner.in_flight += 1;
        inner.peak_in_flight = inner.peak_in_flight.max(inner.in_flight);
        inner.slow_fetch
    }

    fn end_fetch(&self) {
        self.inner.lock().unwrap().in_flight -= 1;
    }

    /// Replace a stored duel as-is, for snapshots the fake would never build
    pub fn put_duel(&self, duel: Duel) {
        let mut inner = self.inner.lock().unwrap();
        inner.duels.retain(|d| d.id != duel.id);
        inner.duels.push(duel);
    }

    pub fn duel(&self, id: &str) -> Option<Duel> {
        self.inner.lock().unwrap().duels.iter().find(|d| d.id == id).cloned()
    }

    /// Operation names in call order
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Set up a duel with its first game, bypassing the call log
    pub fn seed_duel(&self, creator_id: &str, solution: &str) -> (String, String) {
        let mut inner = self.inner.lock().unwrap();
        let creator = inner.user(creator_id).unwrap();
        let duel_id = inner.id("d");
        let game_id = inner.id("g");
        let mut duel = Duel {
            id: duel_id.clone(),
            players: vec![creator.clone()],
            games: vec![Game::new(game_id.clone(), solution, creator)],
            current_game: None,
            current_score: Vec::new(),
        };
        refresh(&mut duel);
        inner.duels.push(duel);
        (duel_id, game_id)
    }

    /// Record a guess as if the other client had made it
    pub fn seed_guess(&self, game_id: &str, guess: &str) {
        let mut inner = self.inner.lock().unwrap();
        for duel in inner.duels.iter_mut() {
            if let Some(game) = duel.games.iter_mut().find(|g| g.id == game_id) {
                game.guesses.push(guess.to_uppercase());
                game.completed = outcome(&game.guesses, &game.solution).is_completed();
                refresh(duel);
                return;
            }
        }
    }
}

impl DuelService for FakeService {
    async fn get_duel(&self, duel_id: &str) -> Result<Option<Duel>> {
        if let Some(delay) = self.begin_fetch() {
            tokio::time::sleep(delay).await;
        }
        let result = {
            let mut inner = self.inner.lock().unwrap();
            inner
                .enter("getDuel")
                .map(|()| inner.duels.iter().find(|d| d.id == duel_id).cloned())
        };
        self.end_fetch();
        result
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("getGame")?;
        Ok(inner
            .duels
            .iter()
            .flat_map(|d| d.games.iter())
            .find(|g| g.id == game_id)
            .cloned())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("getUser")?;
        if inner.user(user_id).is_none() {
            return Ok(None);
        }
        let duels = inner
            .duels
            .iter()
            .filter(|d| d.has_player(user_id))
            .map(|d| DuelSummary {
                id: d.id.clone(),
                players: d.players.clone(),
                current_player_id: d
                    .current_game
                    .as_ref()
                    .and_then(|g| g.player.as_ref())
                    .map(|p| p.id.clone()),
                current_score: d.current_score.clone(),
            })
            .collect();
        Ok(Some(UserProfile {
            id: user_id.to_string(),
            duels,
        }))
    }

    async fn random_word(&self, _length: usize) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("getRandomWord")?;
        Ok(inner
            .dictionary
            .first()
            .cloned()
            .unwrap_or_else(|| "PLANT".to_string()))
    }

    async fn create_user(&self, name: &str) -> Result<Option<String>> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("createUser")?;
        if name.trim().is_empty() || inner.users.iter().any(|u| u.name == name) {
            return Ok(None);
        }
        let id = inner.id("u");
        inner.users.push(UserRef::new(id.clone(), name));
        Ok(Some(id))
    }

    async fn create_duel(&self, creator_id: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("createDuel")?;
        let creator = inner
            .user(creator_id)
            .ok_or_else(|| Error::Graphql("User not found".into()))?;
        let id = inner.id("d");
        let mut duel = Duel {
            id: id.clone(),
            players: vec![creator],
            games: Vec::new(),
            current_game: None,
            current_score: Vec::new(),
        };
        refresh(&mut duel);
        inner.duels.push(duel);
        Ok(id)
    }

    async fn create_game(
        &self,
        duel_id: &str,
        creator_id: &str,
        solution: &str,
    ) -> Result<GameCreated> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("createGame")?;
        let game_id = inner.id("g");
        let creator = inner
            .user(creator_id)
            .ok_or_else(|| Error::Graphql("User not found".into()))?;
        let duel = inner
            .duel_mut(duel_id)
            .ok_or_else(|| Error::Graphql("Duel not found".into()))?;

        if let Some(last) = duel.games.last() {
            if !last.completed || last.next_creator().map(|u| u.id.as_str()) != Some(creator_id) {
                return Ok(GameCreated {
                    id: None,
                    message: "It is not your turn to create a game".into(),
                    success: false,
                });
            }
        }

        let mut game = Game::new(game_id.clone(), solution, creator);
        if let Some(other) = duel.players.iter().find(|p| p.id != creator_id) {
            game.player = Some(other.clone());
        }
        duel.games.push(game);
        refresh(duel);

        Ok(GameCreated {
            id: Some(game_id),
            message: "Game created".into(),
            success: true,
        })
    }

    async fn accept_duel(&self, duel_id: &str, player_id: &str) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("acceptDuel")?;
        if inner.refuse_accept {
            return Ok(false);
        }
        let Some(player) = inner.user(player_id) else {
            return Ok(false);
        };
        let Some(duel) = inner.duel_mut(duel_id) else {
            return Ok(false);
        };
        if duel.has_player(player_id) || !duel.is_open() {
            return Ok(false);
        }

        duel.players.push(player.clone());
        if let Some(game) = duel.games.last_mut() {
            game.player = Some(player);
        }
        refresh(duel);
        Ok(true)
    }

    async fn submit_guess(&self, game_id: &str, guess: &str) -> Result<GuessReceipt> {
        let mut inner = self.inner.lock().unwrap();
        inner.enter("submitGuess")?;
        let guess = guess.to_uppercase();

        if !inner.dictionary.is_empty() && !inner.dictionary.contains(&guess) {
            return Ok(GuessReceipt {
                is_eligible_guess: false,
                solved: false,
                failed: false,
                message: format!("{} is not in the word list", guess),
            });
        }

        for duel in inner.duels.iter_mut() {
            let Some(game) = duel.games.iter_mut().find(|g| g.id == game_id) else {
                continue;
            };
            if game.completed {
                return Err(Error::Graphql("Game is already completed".into()));
            }

            score_guess(&guess, &game.solution)?;
            game.guesses.push(guess.clone());
            let result = outcome(&game.guesses, &game.solution);
            game.completed = result.is_completed();
            let receipt = GuessReceipt {
                is_eligible_guess: true,
                solved: result == worduel_core::GameOutcome::Won,
                failed: result == worduel_core::GameOutcome::Lost,
                message: String::new(),
            };
            refresh(duel);
            return Ok(receipt);
        }

        Err(Error::Graphql("Game not found".into()))
    }
}
