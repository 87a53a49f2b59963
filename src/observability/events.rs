//! Observable lifecycle events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in piedata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema
    /// A record type's schema was built
    SchemaRegistered,

    // Configuration
    /// Session configuration loaded from disk
    ConfigLoaded,

    // Session lifecycle
    /// Connection attempt begins
    SessionConnectBegin,
    /// Connection established
    SessionConnected,
    /// Connection attempt failed
    SessionConnectFailed,
    /// Connection closed
    SessionClosed,
    /// Graceful close failed
    SessionCloseFailed,

    // Commands
    /// Command written to the connection
    CommandSent,
    /// Response read from the connection
    ResponseReceived,
    /// Command failed in transport
    CommandFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SessionConnectBegin => "SESSION_CONNECT_BEGIN",
            Event::SessionConnected => "SESSION_CONNECTED",
            Event::SessionConnectFailed => "SESSION_CONNECT_FAILED",
            Event::SessionClosed => "SESSION_CLOSED",
            Event::SessionCloseFailed => "SESSION_CLOSE_FAILED",
            Event::CommandSent => "COMMAND_SENT",
            Event::ResponseReceived => "RESPONSE_RECEIVED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Severity an event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SessionConnectFailed | Event::CommandFailed => Severity::Error,
            Event::SessionCloseFailed => Severity::Warn,
            Event::CommandSent | Event::ResponseReceived => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
