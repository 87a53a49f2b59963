//! Remote Session Configuration
//!
//! Host, port, storage root and an optional per-command timeout. Loaded from
//! JSON; keys that are absent take their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{SessionError, SessionResult};
use crate::observability::{log_event_with_fields, Event};

/// URI scheme of the message-oriented transport
pub const ENDPOINT_SCHEME: &str = "ws";

/// Remote session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Remote host (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Remote port (default: 8765)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storage root. Carried for callers, not used by the session.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Bound on connect and on each command round trip. None waits forever.
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./piedata")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root_dir: default_root_dir(),
            command_timeout_secs: None,
        }
    }
}

impl SessionConfig {
    /// Config for `host:port` with other settings at their defaults
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Sets the command timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.command_timeout_secs = Some(secs);
        self
    }

    /// Sets the storage root
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Reads a JSON config file.
    ///
    /// # Errors
    ///
    /// `SessionError::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SessionError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        let config: SessionConfig = serde_json::from_str(&content).map_err(|e| {
            SessionError::Config(format!("Invalid JSON in '{}': {}", path.display(), e))
        })?;

        let endpoint = config.endpoint_uri();
        let path_str = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path_str.as_str()), ("endpoint", endpoint.as_str())],
        );

        Ok(config)
    }

    /// `ws://host:port`
    pub fn endpoint_uri(&self) -> String {
        format!("{}://{}:{}", ENDPOINT_SCHEME, self.host, self.port)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}
