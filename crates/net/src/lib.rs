//! Worduel Network Library
//!
//! Talks to the Worduel GraphQL service over HTTP.
//!
//! # Usage
//!
//! ```ignore
//! let client = GraphqlClient::new(DEFAULT_ENDPOINT, SolutionEncoding::Plain, timeout)?;
//! if let Some(duel) = client.get_duel("d1").await? {
//!     // reconcile
//! }
//! ```
//!
//! Callers that only need the operations depend on [`DuelService`], which
//! lets tests swap in an in-memory service.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{DuelService, GraphqlClient};
pub use error::{Error, Result};
pub use protocol::{GameCreated, GuessReceipt, SolutionEncoding};

/// Service address used when nothing is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5010/gql";
