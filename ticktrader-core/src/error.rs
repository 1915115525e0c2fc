//! Error types for the TickTrader Web API client

use thiserror::Error;

/// Client-wide error type
#[derive(Error, Debug)]
pub enum TickTraderError {
    /// Missing or invalid address/credentials. Raised before any network work.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. The body is passed through untouched.
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Signing error: {0}")]
    Signing(String),
}

impl TickTraderError {
    pub fn config(msg: impl Into<String>) -> Self {
        TickTraderError::Config(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        TickTraderError::Network(msg.into())
    }

    pub fn server(status: u16, body: impl Into<String>) -> Self {
        TickTraderError::Server {
            status,
            body: body.into(),
        }
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        TickTraderError::Signing(msg.into())
    }

    /// HTTP status of a server rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            TickTraderError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, TickTraderError::Config(_))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, TickTraderError>;
