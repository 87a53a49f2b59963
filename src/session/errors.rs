//! # Session Errors
//!
//! Error types for the remote session. Transport failures carry the
//! underlying WebSocket error unmodified; nothing is retried.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Remote session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection could not be established
    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: WsError,
    },

    /// Send or receive failed on an open connection
    #[error("Transport error: {0}")]
    Transport(#[from] WsError),

    /// Peer closed the connection before responding
    #[error("Connection closed")]
    ConnectionClosed,

    /// Response was not valid text
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Connect or command exceeded the configured timeout
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Execution context could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl SessionError {
    /// True for failures of the connection itself, as opposed to setup errors
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SessionError::Connect { .. }
                | SessionError::Transport(_)
                | SessionError::ConnectionClosed
                | SessionError::InvalidResponse(_)
                | SessionError::Timeout(_)
        )
    }
}
