//! Connection establishment: DNS -> TCP -> optional TLS.

use crate::base::neterror::NetError;
use crate::dns::{Addrs, GaiResolver, Name, Resolve};
use crate::endpoint::Endpoint;
use crate::socket::stream::BoxedSocket;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// Tunables for connection establishment.
///
/// The handshake deadline applies uniformly to the TLS handshake and the
/// WebSocket upgrade, on both the plain-HTTP and WebSocket paths.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Ceiling for the TLS and WebSocket upgrade handshakes.
    pub handshake_timeout: Duration,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

/// Manages the connection process for one endpoint.
///
/// Three ordered, individually suspending steps: resolve the host, connect
/// TCP against the candidate sequence (first success wins), and for secure
/// endpoints perform a TLS client handshake with SNI set to the hostname and
/// the platform's default trust store. The returned [`BoxedSocket`] hides
/// which transport variant was selected.
pub struct ConnectJob {
    resolver: Arc<dyn Resolve>,
    config: ConnectConfig,
}

impl Default for ConnectJob {
    fn default() -> Self {
        Self::new(ConnectConfig::default())
    }
}

impl ConnectJob {
    pub fn new(config: ConnectConfig) -> Self {
        Self {
            resolver: Arc::new(GaiResolver::new()),
            config,
        }
    }

    /// Replaces the DNS resolver. Mainly useful for tests.
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Establishes a connection to `endpoint`, plain or TLS per its
    /// `secure` flag.
    pub async fn connect(&self, endpoint: &Endpoint) -> Result<BoxedSocket, NetError> {
        // 1. DNS resolution; IP literals bypass the resolver entirely
        let addrs: Addrs = match endpoint.host.parse::<IpAddr>() {
            Ok(ip) => Box::new(std::iter::once(SocketAddr::new(ip, 0))),
            Err(_) => self.resolver.resolve(Name::new(endpoint.host.as_str())).await?,
        };

        // 2. TCP connect, first reachable candidate wins
        let mut stream = None;
        for mut addr in addrs {
            addr.set_port(endpoint.port);
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    tracing::debug!(%addr, "TCP connected");
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "TCP connect attempt failed");
                }
            }
        }
        let stream = stream.ok_or_else(|| {
            NetError::ConnectFail(format!("no candidate reachable for {}", endpoint.authority()))
        })?;

        // 3. TLS handshake (secure endpoints only)
        if endpoint.secure {
            let tls = self.handshake_tls(&endpoint.host, stream).await?;
            tracing::info!(host = %endpoint.host, "TLS handshake done");
            Ok(BoxedSocket::new(tls))
        } else {
            Ok(BoxedSocket::new(stream))
        }
    }

    async fn handshake_tls(
        &self,
        host: &str,
        stream: TcpStream,
    ) -> Result<tokio_native_tls::TlsStream<TcpStream>, NetError> {
        let connector = native_tls::TlsConnector::new()
            .map_err(|e| NetError::SslError(format!("TLS connector setup: {e}")))?;
        let connector = tokio_native_tls::TlsConnector::from(connector);

        // SNI is taken from `host` by the connector.
        match tokio::time::timeout(self.config.handshake_timeout, connector.connect(host, stream))
            .await
        {
            Ok(Ok(tls)) => Ok(tls),
            Ok(Err(e)) => Err(NetError::SslError(format!("handshake with {host}: {e}"))),
            Err(_) => Err(NetError::SslError(format!(
                "handshake with {host} timed out after {:?}",
                self.config.handshake_timeout
            ))),
        }
    }
}
