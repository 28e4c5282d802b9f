//! WebSocket client sessions.
//!
//! - [`message`]: frame payload types
//! - [`session`]: the connect/read/write/close state machine

pub mod message;
pub mod session;

pub use message::{CloseCode, CloseFrame, Message};
pub use session::WebSocketSession;
