//! # Remote Session
//!
//! A thin client for a remote store. It keeps the set of record types it
//! knows about and one lazily opened WebSocket connection, and exchanges one
//! text command for one text response at a time.
//!
//! ## Architecture
//!
//! - **Connection**: one WebSocket stream, one request/response round trip
//! - **AsyncSession**: lazy connect, command dispatch, close
//! - **RemoteSession**: blocking façade owning its own runtime
//! - **SessionConfig**: host, port, storage root, optional timeout
//!
//! The response format is defined by the peer; it is returned as opaque text.

mod blocking;
mod client;
mod config;
mod connection;
mod errors;

pub use blocking::RemoteSession;
pub use client::{AsyncSession, ConnectionState, CHECK_CONNECTION_COMMAND};
pub use config::{SessionConfig, ENDPOINT_SCHEME};
pub use connection::Connection;
pub use errors::{SessionError, SessionResult};
