//! Polymorphic socket abstraction.
//!
//! The two transport variants, plain TCP and TLS over TCP, are selected once
//! at connection-establishment time and handed downstream as a single
//! "stream offering read, write, close" capability. Nothing past that point
//! branches on which variant it holds.

use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_native_tls::TlsStream;

/// Marker for sockets usable as the transport under an exchange or session.
pub trait StreamSocket: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static {}

impl StreamSocket for TcpStream {}

impl StreamSocket for TlsStream<TcpStream> {}

/// An established transport, plain or TLS, behind one object-safe type.
///
/// Exclusively owned by the exchange or session that requested it; dropping
/// it closes the underlying descriptor on every exit path.
pub struct BoxedSocket {
    transport: Pin<Box<dyn StreamSocket>>,
}

impl BoxedSocket {
    /// Boxes an established transport.
    pub fn new<S: StreamSocket>(socket: S) -> Self {
        Self {
            transport: Box::pin(socket),
        }
    }

    fn transport(&mut self) -> Pin<&mut dyn StreamSocket> {
        self.transport.as_mut()
    }
}

impl AsyncRead for BoxedSocket {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        self.transport().poll_read(cx, buf)
    }
}

impl AsyncWrite for BoxedSocket {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.transport().poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.transport().poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.transport().poll_shutdown(cx)
    }
}
