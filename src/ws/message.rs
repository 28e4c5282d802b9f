//! WebSocket message types.

use bytes::Bytes;

/// One complete WebSocket frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Text frame (UTF-8)
    Text(String),
    /// Binary frame
    Binary(Bytes),
    /// Close frame with optional code and reason
    Close(Option<CloseFrame>),
}

impl Message {
    /// Try to view the payload as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Payload bytes (text as UTF-8, binary as-is, close empty).
    pub fn into_data(self) -> Vec<u8> {
        match self {
            Message::Text(s) => s.into_bytes(),
            Message::Binary(b) => b.to_vec(),
            Message::Close(_) => Vec::new(),
        }
    }

    pub fn is_close(&self) -> bool {
        matches!(self, Message::Close(_))
    }
}

/// Close frame data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    /// Close code (RFC 6455)
    pub code: CloseCode,
    /// Close reason (optional UTF-8 string)
    pub reason: String,
}

/// WebSocket close codes (RFC 6455).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseCode(pub u16);

impl CloseCode {
    /// Normal closure
    pub const NORMAL: Self = Self(1000);
    /// Peer going away
    pub const GOING_AWAY: Self = Self(1001);
    /// Protocol error
    pub const PROTOCOL_ERROR: Self = Self(1002);
    /// Abnormal closure
    pub const ABNORMAL: Self = Self(1006);
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.0
    }
}
