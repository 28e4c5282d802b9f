//! # wireline
//!
//! A client-side network access layer offering two capabilities over a
//! single connection abstraction: one-shot HTTP request/response exchange
//! and long-lived WebSocket sessions, each transparently switching between
//! plaintext and TLS-secured transport based on the parsed URI scheme.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use wireline::{HttpExchange, WebSocketSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wireline::NetError> {
//!     // One-shot HTTP exchange
//!     let mut req = HttpExchange::new("https://example.com/api");
//!     req.set_header("Accept", "application/json");
//!     let body = req.send().await?;
//!
//!     // WebSocket session
//!     let mut ws = WebSocketSession::configure("wss://example.com/feed")?;
//!     ws.connect().await?;
//!     ws.send_text("ping").await?;
//!     let reply = ws.read().await?;
//!     ws.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - The shared error taxonomy
//! - [`endpoint`] - URI resolution into {host, port, path, secure}
//! - [`dns`] - Asynchronous DNS resolution
//! - [`socket`] - Connection establishment and the polymorphic transport
//! - [`http`] - The one-shot HTTP exchange engine
//! - [`ws`] - WebSocket sessions
//!
//! ## Scope
//!
//! Deliberately minimal: no connection pooling or reuse, no HTTP/2, no
//! redirect following, no automatic retries, no proxy traversal. Every
//! exchange opens and tears down its own connection; retry policy belongs to
//! the caller.

pub mod base;
pub mod dns;
pub mod endpoint;
pub mod http;
pub mod socket;
pub mod ws;

pub use base::neterror::{ErrorKind, NetError};
pub use endpoint::Endpoint;
pub use http::exchange::HttpExchange;
pub use socket::connectjob::{ConnectConfig, ConnectJob};
pub use ws::message::Message;
pub use ws::session::WebSocketSession;
