//! Async remote session
//!
//! State machine:
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Disconnected
//! ```
//!
//! Every operation that touches the connection takes `&mut self`, so a
//! session has exactly one caller at a time and the connection is never
//! seen half-open. A failed round trip discards the connection: a late
//! response must not be read as the answer to the next command.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::config::SessionConfig;
use super::connection::Connection;
use super::errors::{SessionError, SessionResult};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{Model, Schema};

/// Command sent by `check_connection`
pub const CHECK_CONNECTION_COMMAND: &str = "CHECK CONNECTION";

/// Connection lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "DISCONNECTED",
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Connected => "CONNECTED",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client for a remote store, holding at most one lazily opened connection
#[derive(Debug)]
pub struct AsyncSession {
    id: Uuid,
    config: SessionConfig,
    endpoint: String,
    tables: Vec<Arc<Schema>>,
    state: ConnectionState,
    connection: Option<Connection>,
}

impl AsyncSession {
    /// Creates a disconnected session
    pub fn new(config: SessionConfig) -> Self {
        let endpoint = config.endpoint_uri();
        Self {
            id: Uuid::new_v4(),
            config,
            endpoint,
            tables: Vec::new(),
            state: ConnectionState::Disconnected,
            connection: None,
        }
    }

    /// Creates a disconnected session from a JSON config file
    pub fn from_config_file(path: &Path) -> SessionResult<Self> {
        SessionConfig::load(path).map(Self::new)
    }

    /// Identifier used to correlate log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn endpoint_uri(&self) -> &str {
        &self.endpoint
    }

    pub fn root_dir(&self) -> &Path {
        &self.config.root_dir
    }

    /// Adds a record type to the session's table set.
    ///
    /// Returns false if a table with the same name is already registered.
    /// The set is informational; the remote side is not consulted.
    pub fn register_table(&mut self, schema: Arc<Schema>) -> bool {
        if self
            .tables
            .iter()
            .any(|known| known.table_name() == schema.table_name())
        {
            return false;
        }
        self.tables.push(schema);
        true
    }

    /// Adds a `Model` type to the session's table set
    pub fn register<M: Model>(&mut self) -> bool {
        self.register_table(M::schema())
    }

    /// Registered tables in registration order
    pub fn tables(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.tables.iter()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Opens the connection unless one is already live.
    ///
    /// # Errors
    ///
    /// `Connect` or `Timeout` on failure; the session stays disconnected.
    pub async fn connect(&mut self) -> SessionResult<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        let id = self.id.to_string();
        self.state = ConnectionState::Connecting;
        log_event_with_fields(
            Event::SessionConnectBegin,
            &[("session", id.as_str()), ("endpoint", self.endpoint.as_str())],
        );

        let timeout = self.config.command_timeout();
        let result = with_timeout(timeout, Connection::open(&self.endpoint)).await;
        match result {
            Ok(connection) => {
                self.connection = Some(connection);
                self.state = ConnectionState::Connected;
                log_event_with_fields(
                    Event::SessionConnected,
                    &[("session", id.as_str()), ("endpoint", self.endpoint.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                let reason = e.to_string();
                log_event_with_fields(
                    Event::SessionConnectFailed,
                    &[
                        ("session", id.as_str()),
                        ("endpoint", self.endpoint.as_str()),
                        ("error", reason.as_str()),
                    ],
                );
                Err(e)
            }
        }
    }

    /// Sends one command and returns the peer's response as opaque text.
    ///
    /// Connects first if needed.
    pub async fn send_command(&mut self, command: &str) -> SessionResult<String> {
        self.connect().await?;

        let id = self.id.to_string();
        let timeout = self.config.command_timeout();
        let connection = self
            .connection
            .as_mut()
            .ok_or(SessionError::ConnectionClosed)?;

        log_event_with_fields(
            Event::CommandSent,
            &[("session", id.as_str()), ("command", command)],
        );

        let result = with_timeout(timeout, connection.round_trip(command)).await;
        match result {
            Ok(response) => {
                let bytes = response.len().to_string();
                log_event_with_fields(
                    Event::ResponseReceived,
                    &[("session", id.as_str()), ("bytes", bytes.as_str())],
                );
                Ok(response)
            }
            Err(e) => {
                self.connection = None;
                self.state = ConnectionState::Disconnected;
                let reason = e.to_string();
                log_event_with_fields(
                    Event::CommandFailed,
                    &[
                        ("session", id.as_str()),
                        ("command", command),
                        ("error", reason.as_str()),
                    ],
                );
                Err(e)
            }
        }
    }

    /// Sends `CHECK CONNECTION` and returns the raw response
    pub async fn check_connection(&mut self) -> SessionResult<String> {
        self.send_command(CHECK_CONNECTION_COMMAND).await
    }

    /// Closes the connection if one is open. Idempotent.
    ///
    /// The session is disconnected afterwards even if the close handshake fails.
    pub async fn close(&mut self) -> SessionResult<()> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        self.state = ConnectionState::Disconnected;

        let id = self.id.to_string();
        match connection.close().await {
            Ok(()) => {
                log_event_with_fields(
                    Event::SessionClosed,
                    &[("session", id.as_str()), ("endpoint", self.endpoint.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                log_event_with_fields(
                    Event::SessionCloseFailed,
                    &[("session", id.as_str()), ("error", reason.as_str())],
                );
                Err(e)
            }
        }
    }
}

async fn with_timeout<T, F>(timeout: Option<Duration>, fut: F) -> SessionResult<T>
where
    F: Future<Output = SessionResult<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| SessionError::Timeout(limit))?,
        None => fut.await,
    }
}
