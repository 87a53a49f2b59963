//! Blocking remote session
//!
//! Wraps an `AsyncSession` with its own single-threaded runtime. Each call
//! blocks the calling thread until the round trip completes, so commands
//! from one owner are totally ordered.
//!
//! Calls must not be made from inside an async runtime. Dropping inside
//! one is allowed: the connection is then released without a close
//! handshake.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use super::client::{AsyncSession, ConnectionState};
use super::config::SessionConfig;
use super::errors::{SessionError, SessionResult};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{Model, Schema};

/// Synchronous façade over `AsyncSession`.
///
/// Dropping the session closes any open connection on a best-effort basis.
#[derive(Debug)]
pub struct RemoteSession {
    /// Always `Some` until drop
    runtime: Option<Runtime>,
    inner: AsyncSession,
}

impl RemoteSession {
    /// Creates a disconnected session with a dedicated runtime
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SessionError::Runtime(format!("Failed to build runtime: {}", e)))?;

        Ok(Self {
            runtime: Some(runtime),
            inner: AsyncSession::new(config),
        })
    }

    /// Creates a disconnected session from a JSON config file
    pub fn from_config_file(path: &Path) -> SessionResult<Self> {
        SessionConfig::load(path).and_then(Self::new)
    }

    /// The wrapped async session
    pub fn session(&self) -> &AsyncSession {
        &self.inner
    }

    pub fn endpoint_uri(&self) -> &str {
        self.inner.endpoint_uri()
    }

    pub fn root_dir(&self) -> &Path {
        self.inner.root_dir()
    }

    pub fn register_table(&mut self, schema: Arc<Schema>) -> bool {
        self.inner.register_table(schema)
    }

    pub fn register<M: Model>(&mut self) -> bool {
        self.inner.register::<M>()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.inner.tables()
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// Opens the connection unless one is already live
    pub fn connect(&mut self) -> SessionResult<()> {
        let runtime = live_runtime(&self.runtime)?;
        runtime.block_on(self.inner.connect())
    }

    /// Sends one command and blocks until its response arrives
    pub fn command(&mut self, command: &str) -> SessionResult<String> {
        let runtime = live_runtime(&self.runtime)?;
        runtime.block_on(self.inner.send_command(command))
    }

    /// Sends `CHECK CONNECTION` and returns the raw response
    pub fn check_connection(&mut self) -> SessionResult<String> {
        let runtime = live_runtime(&self.runtime)?;
        runtime.block_on(self.inner.check_connection())
    }

    /// Closes the connection if one is open. Idempotent.
    pub fn close(&mut self) -> SessionResult<()> {
        let runtime = live_runtime(&self.runtime)?;
        runtime.block_on(self.inner.close())
    }
}

fn live_runtime(slot: &Option<Runtime>) -> SessionResult<&Runtime> {
    slot.as_ref()
        .ok_or_else(|| SessionError::Runtime("Runtime already shut down".to_string()))
}

impl Drop for RemoteSession {
    fn drop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            // Neither block_on nor a plain runtime drop is allowed here
            if self.inner.is_connected() {
                let id = self.inner.id().to_string();
                log_event_with_fields(
                    Event::SessionCloseFailed,
                    &[("session", id.as_str()), ("error", "dropped inside an async runtime")],
                );
            }
            runtime.shutdown_background();
            return;
        }

        if self.inner.is_connected() {
            // Nobody is left to observe a failure; close() already logged it
            let _ = runtime.block_on(self.inner.close());
        }
    }
}
