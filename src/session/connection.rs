//! WebSocket connection
//!
//! One text frame out, one text frame in. No envelope, no sequence numbers,
//! no pipelining: the caller must not issue a second command before the
//! first response has been read.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};

use super::errors::{SessionError, SessionResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open connection to a remote endpoint
pub struct Connection {
    endpoint: String,
    stream: WsStream,
}

impl Connection {
    /// Opens a connection and completes the WebSocket handshake.
    pub async fn open(endpoint: &str) -> SessionResult<Self> {
        let (stream, _response) =
            connect_async(endpoint)
                .await
                .map_err(|source| SessionError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            stream,
        })
    }

    /// Sends one command and waits for exactly one response.
    ///
    /// Control frames received while waiting are skipped. A close frame or
    /// end of stream before a response is `ConnectionClosed`.
    pub async fn round_trip(&mut self, command: &str) -> SessionResult<String> {
        self.stream.send(Message::Text(command.to_string())).await?;

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Binary(bytes))) => {
                    return String::from_utf8(bytes)
                        .map_err(|e| SessionError::InvalidResponse(e.to_string()));
                }
                Some(Ok(Message::Close(_))) | None => return Err(SessionError::ConnectionClosed),
                // Ping, pong and raw frames
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Sends a close frame. Closing an already closed connection succeeds.
    pub async fn close(mut self) -> SessionResult<()> {
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
