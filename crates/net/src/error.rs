//! Network error types

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the service; the message is shown as-is
    #[error("{0}")]
    Graphql(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The service refused a mutation
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Core(#[from] worduel_core::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Protocol(format!("Invalid JSON: {}", e))
    }
}
