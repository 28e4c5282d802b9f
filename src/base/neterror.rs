use thiserror::Error;

/// Network error categories shared by every component.
///
/// Each failure raised anywhere in the core carries exactly one category plus
/// free-form diagnostic text (the failing host:port, the HTTP status and body
/// snippet, and so on). No category is retried automatically; retry policy is
/// a caller concern.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    /// DNS/service resolution produced an error or an empty address set.
    #[error("Resolve Fail: {0}")]
    ResolveFail(String),

    /// TLS handshake or SNI configuration failed, or the handshake deadline
    /// expired.
    #[error("SSL Error: {0}")]
    SslError(String),

    /// No resolved candidate accepted a TCP connection, or the WebSocket
    /// upgrade handshake failed.
    #[error("Connect Fail: {0}")]
    ConnectFail(String),

    /// The server answered an HTTP exchange with a non-success status.
    #[error("Request Fail: {0}")]
    RequestFail(String),

    /// A transport-level write or read failed mid-exchange.
    #[error("Response Fail: {0}")]
    ResponseFail(String),

    /// Malformed caller input: unparseable URI, unknown scheme, bad header.
    #[error("Invalid Param: {0}")]
    InvalidParam(String),

    /// An operation that requires an open session was invoked while the
    /// session was not open.
    #[error("Not Connected: {0}")]
    NotConnected(String),
}

/// Stable category identifiers, independent of diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ResolveFail,
    SslError,
    ConnectFail,
    RequestFail,
    ResponseFail,
    InvalidParam,
    NotConnected,
}

impl NetError {
    /// The stable category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::ResolveFail(_) => ErrorKind::ResolveFail,
            NetError::SslError(_) => ErrorKind::SslError,
            NetError::ConnectFail(_) => ErrorKind::ConnectFail,
            NetError::RequestFail(_) => ErrorKind::RequestFail,
            NetError::ResponseFail(_) => ErrorKind::ResponseFail,
            NetError::InvalidParam(_) => ErrorKind::InvalidParam,
            NetError::NotConnected(_) => ErrorKind::NotConnected,
        }
    }

    /// The diagnostic text attached at the failure site.
    pub fn message(&self) -> &str {
        match self {
            NetError::ResolveFail(m)
            | NetError::SslError(m)
            | NetError::ConnectFail(m)
            | NetError::RequestFail(m)
            | NetError::ResponseFail(m)
            | NetError::InvalidParam(m)
            | NetError::NotConnected(m) => m,
        }
    }
}
