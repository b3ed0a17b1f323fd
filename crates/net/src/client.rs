//! GraphQL-over-HTTP client for the Worduel service

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use worduel_core::{Duel, Game, UserProfile};

use crate::error::{Error, Result};
use crate::protocol::{
    self, is_acknowledged, GameCreated, GqlRequest, GqlResponse, GuessReceipt, SolutionEncoding,
    WireDuel, WireGame, WireGameCreated, WireGuessReceipt, WireUserProfile,
};

/// Everything the client asks of the remote service
///
/// `Ok(None)` means the service answered with `null` for a lookup.
pub trait DuelService {
    fn get_duel(&self, duel_id: &str) -> impl Future<Output = Result<Option<Duel>>> + Send;

    fn get_game(&self, game_id: &str) -> impl Future<Output = Result<Option<Game>>> + Send;

    fn get_user(&self, user_id: &str)
        -> impl Future<Output = Result<Option<UserProfile>>> + Send;

    fn random_word(&self, length: usize) -> impl Future<Output = Result<String>> + Send;

    /// Register a username, returning the new user id if accepted
    fn create_user(&self, name: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn create_duel(&self, creator_id: &str) -> impl Future<Output = Result<String>> + Send;

    fn create_game(
        &self,
        duel_id: &str,
        creator_id: &str,
        solution: &str,
    ) -> impl Future<Output = Result<GameCreated>> + Send;

    /// Join an open duel as its player; `false` if the service refused
    fn accept_duel(
        &self,
        duel_id: &str,
        player_id: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn submit_guess(
        &self,
        game_id: &str,
        guess: &str,
    ) -> impl Future<Output = Result<GuessReceipt>> + Send;
}

/// HTTP implementation of [`DuelService`]
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    encoding: SolutionEncoding,
    http: reqwest::Client,
}

impl GraphqlClient {
    pub fn new(
        endpoint: impl Into<String>,
        encoding: SolutionEncoding,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            encoding,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn encoding(&self) -> SolutionEncoding {
        self.encoding
    }

    /// Run one operation and return its root field
    async fn execute(&self, operation: &str, query: &str, variables: Value) -> Result<Value> {
        debug!(operation, endpoint = %self.endpoint, "Sending request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&GqlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: GqlResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                warn!(operation, %status, "Non-GraphQL error response");
                return Err(Error::Protocol(format!("HTTP {}", status)));
            }
        };

        parsed.field(operation)
    }

    async fn execute_as<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<Option<T>> {
        let value = self.execute(operation, query, variables).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }
}

impl DuelService for GraphqlClient {
    #[instrument(skip(self))]
    async fn get_duel(&self, duel_id: &str) -> Result<Option<Duel>> {
        let query = protocol::get_duel_query(self.encoding);
        self.execute_as::<WireDuel>("getDuel", &query, json!({ "duelId": duel_id }))
            .await?
            .map(|w| w.into_duel(self.encoding))
            .transpose()
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>> {
        let query = protocol::get_game_query(self.encoding);
        self.execute_as::<WireGame>("getGame", &query, json!({ "gameId": game_id }))
            .await?
            .map(|w| w.into_game(self.encoding))
            .transpose()
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.execute_as::<WireUserProfile>("getUser", protocol::GET_USER, json!({ "userId": user_id }))
            .await?
            .map(WireUserProfile::into_profile)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn random_word(&self, length: usize) -> Result<String> {
        self.execute_as::<String>(
            "getRandomWord",
            protocol::GET_RANDOM_WORD,
            json!({ "length": length }),
        )
        .await?
        .filter(|w| !w.is_empty())
        .map(|w| w.to_uppercase())
        .ok_or_else(|| Error::Protocol("No random word returned".into()))
    }

    #[instrument(skip(self))]
    async fn create_user(&self, name: &str) -> Result<Option<String>> {
        let id = self
            .execute_as::<String>("createUser", protocol::CREATE_USER, json!({ "name": name }))
            .await?;
        Ok(id.filter(|id| !id.is_empty()))
    }

    #[instrument(skip(self))]
    async fn create_duel(&self, creator_id: &str) -> Result<String> {
        self.execute_as::<String>(
            "createDuel",
            protocol::CREATE_DUEL,
            json!({ "creatorId": creator_id }),
        )
        .await?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Rejected("Could not create duel".into()))
    }

    #[instrument(skip(self, solution))]
    async fn create_game(
        &self,
        duel_id: &str,
        creator_id: &str,
        solution: &str,
    ) -> Result<GameCreated> {
        let created = self
            .execute_as::<WireGameCreated>(
                "createGame",
                protocol::CREATE_GAME,
                json!({ "solution": solution, "duelId": duel_id, "creatorId": creator_id }),
            )
            .await?
            .unwrap_or_default();
        Ok(created.into())
    }

    #[instrument(skip(self))]
    async fn accept_duel(&self, duel_id: &str, player_id: &str) -> Result<bool> {
        let value = self
            .execute(
                "acceptDuel",
                protocol::ACCEPT_DUEL,
                json!({ "duelId": duel_id, "playerId": player_id }),
            )
            .await?;
        Ok(is_acknowledged(&value))
    }

    #[instrument(skip(self))]
    async fn submit_guess(&self, game_id: &str, guess: &str) -> Result<GuessReceipt> {
        let receipt = self
            .execute_as::<WireGuessReceipt>(
                "submitGuess",
                protocol::SUBMIT_GUESS,
                json!({ "gameId": game_id, "guess": guess }),
            )
            .await?
            .ok_or_else(|| Error::Protocol("No guess receipt returned".into()))?;
        Ok(receipt.into())
    }
}
