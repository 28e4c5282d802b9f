//! WebSocket session state machine.
//!
//! A session is configured with a URI, connected once, then offers
//! independent read/write directions until closed. Transport acquisition is
//! delegated to [`ConnectJob`], so plain `ws://` and secure `wss://`
//! endpoints share one establishment path; the upgrade handshake and framing
//! run over the resulting [`BoxedSocket`].

use crate::base::neterror::NetError;
use crate::endpoint::Endpoint;
use crate::socket::connectjob::{ConnectConfig, ConnectJob};
use crate::socket::stream::BoxedSocket;
use crate::ws::message::{CloseCode, CloseFrame, Message};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{client_async, tungstenite, WebSocketStream};

type WsStream = WebSocketStream<BoxedSocket>;

enum SessionState {
    Unconfigured,
    Configured(Endpoint),
    Open { endpoint: Endpoint, stream: WsStream },
    Closed,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Unconfigured => "unconfigured",
            SessionState::Configured(_) => "configured",
            SessionState::Open { .. } => "open",
            SessionState::Closed => "closed",
        }
    }
}

/// A WebSocket client session.
///
/// State transitions are driven by explicit calls only:
/// unconfigured -> configured ([`set_uri`](Self::set_uri)) -> open
/// ([`connect`](Self::connect)) -> closed ([`close`](Self::close) or any
/// transport failure). A session that fails during connect is terminal.
pub struct WebSocketSession {
    state: SessionState,
    config: ConnectConfig,
}

impl Default for WebSocketSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSocketSession {
    /// Creates an unconfigured session.
    pub fn new() -> Self {
        Self {
            state: SessionState::Unconfigured,
            config: ConnectConfig::default(),
        }
    }

    /// Creates a session already configured with `uri`.
    pub fn configure(uri: &str) -> Result<Self, NetError> {
        let mut session = Self::new();
        session.set_uri(uri)?;
        Ok(session)
    }

    /// Parses and stores the target URI.
    ///
    /// A malformed URI fails with [`NetError::InvalidParam`] and leaves the
    /// session state unchanged.
    pub fn set_uri(&mut self, uri: &str) -> Result<(), NetError> {
        let endpoint = Endpoint::resolve(uri)?;
        tracing::debug!(host = %endpoint.host, port = endpoint.port, path = %endpoint.path, secure = endpoint.secure, "session configured");
        self.state = SessionState::Configured(endpoint);
        Ok(())
    }

    /// Overrides the connection tunables (handshake deadline).
    pub fn set_config(&mut self, config: ConnectConfig) {
        self.config = config;
    }

    /// True once the session has completed its handshake and is usable.
    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open { .. })
    }

    /// Establishes the connection and performs the upgrade handshake.
    ///
    /// Any failure leaves the session closed (terminal) and surfaces the
    /// category of the failing stage: `ResolveFail`, `ConnectFail`, or
    /// `SslError` from establishment, `ConnectFail` for a failed or
    /// timed-out upgrade.
    pub async fn connect(&mut self) -> Result<(), NetError> {
        let endpoint = match &self.state {
            SessionState::Configured(ep) => ep.clone(),
            SessionState::Open { .. } => {
                return Err(NetError::ConnectFail("session already open".into()))
            }
            other => {
                return Err(NetError::NotConnected(format!(
                    "connect on {} session",
                    other.name()
                )))
            }
        };

        // A failure below must not leave the session re-connectable.
        self.state = SessionState::Closed;

        let socket = ConnectJob::new(self.config.clone()).connect(&endpoint).await?;

        let url = upgrade_url(&endpoint);
        let stream = match tokio::time::timeout(
            self.config.handshake_timeout,
            client_async(url.as_str(), socket),
        )
        .await
        {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(e)) => {
                return Err(NetError::ConnectFail(format!(
                    "WebSocket handshake with {}: {e}",
                    endpoint.authority()
                )))
            }
            Err(_) => {
                return Err(NetError::ConnectFail(format!(
                    "WebSocket handshake with {} timed out after {:?}",
                    endpoint.authority(),
                    self.config.handshake_timeout
                )))
            }
        };

        tracing::info!(authority = %endpoint.authority(), "WebSocket handshake done");
        self.state = SessionState::Open { endpoint, stream };
        Ok(())
    }

    /// Suspends until one complete incoming Text or Binary frame arrives.
    ///
    /// Ping and Pong frames are handled transparently. A Close frame from the
    /// peer terminates the session and is returned as [`Message::Close`].
    pub async fn read(&mut self) -> Result<Message, NetError> {
        loop {
            let frame = match &mut self.state {
                SessionState::Open { stream, .. } => stream.next().await,
                other => {
                    return Err(NetError::NotConnected(format!(
                        "read on {} session",
                        other.name()
                    )))
                }
            };

            match frame {
                Some(Ok(tungstenite::Message::Text(text))) => return Ok(Message::Text(text)),
                Some(Ok(tungstenite::Message::Binary(data))) => {
                    return Ok(Message::Binary(Bytes::from(data)))
                }
                // tungstenite queues the protocol-level replies itself.
                Some(Ok(tungstenite::Message::Ping(_)))
                | Some(Ok(tungstenite::Message::Pong(_)))
                | Some(Ok(tungstenite::Message::Frame(_))) => continue,
                Some(Ok(tungstenite::Message::Close(frame))) => {
                    self.state = SessionState::Closed;
                    return Ok(Message::Close(frame.map(|f| CloseFrame {
                        code: CloseCode(f.code.into()),
                        reason: f.reason.into_owned(),
                    })));
                }
                Some(Err(e)) => {
                    self.state = SessionState::Closed;
                    return Err(NetError::ResponseFail(format!("WebSocket read: {e}")));
                }
                None => {
                    self.state = SessionState::Closed;
                    return Err(NetError::ResponseFail(
                        "WebSocket connection closed by peer".into(),
                    ));
                }
            }
        }
    }

    /// Sends one complete frame.
    pub async fn write(&mut self, msg: Message) -> Result<(), NetError> {
        let result = match &mut self.state {
            SessionState::Open { stream, .. } => stream.send(to_wire(msg)).await,
            other => {
                return Err(NetError::NotConnected(format!(
                    "write on {} session",
                    other.name()
                )))
            }
        };

        result.map_err(|e| {
            self.state = SessionState::Closed;
            NetError::ResponseFail(format!("WebSocket write: {e}"))
        })
    }

    /// Sends one text frame.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<(), NetError> {
        self.write(Message::Text(text.into())).await
    }

    /// Sends one binary frame.
    pub async fn send_binary(&mut self, data: impl Into<Bytes>) -> Result<(), NetError> {
        self.write(Message::Binary(data.into())).await
    }

    /// Sends a normal-closure frame and waits for the close handshake.
    ///
    /// The session is terminated afterwards even if the transport failed
    /// during the handshake; the failure is still reported.
    pub async fn close(&mut self) -> Result<(), NetError> {
        let (endpoint, mut stream) = match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Open { endpoint, stream } => (endpoint, stream),
            other => {
                self.state = other;
                return Err(NetError::NotConnected(format!(
                    "close on {} session",
                    self.state.name()
                )));
            }
        };

        let result = stream.close(None).await;

        // Drain until the peer acknowledges the close.
        while let Some(msg) = stream.next().await {
            if msg.is_err() {
                break;
            }
        }

        tracing::debug!(authority = %endpoint.authority(), "session closed");

        match result {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) => Ok(()),
            Err(e) => Err(NetError::ResponseFail(format!("WebSocket close: {e}"))),
        }
    }
}

/// Canonical upgrade-request URL for an endpoint resolved in §4.1 terms.
fn upgrade_url(endpoint: &Endpoint) -> String {
    let scheme = if endpoint.secure { "wss" } else { "ws" };
    format!("{scheme}://{}{}", endpoint.authority(), endpoint.path)
}

fn to_wire(msg: Message) -> tungstenite::Message {
    match msg {
        Message::Text(s) => tungstenite::Message::Text(s),
        Message::Binary(b) => tungstenite::Message::Binary(b.to_vec()),
        Message::Close(frame) => {
            let frame = frame.map(|f| tungstenite::protocol::CloseFrame {
                code: tungstenite::protocol::frame::coding::CloseCode::from(f.code.0),
                reason: f.reason.into(),
            });
            tungstenite::Message::Close(frame)
        }
    }
}
