//! Asynchronous DNS resolution.
//!
//! Defines the [`Resolve`] trait and the default [`GaiResolver`], which runs
//! the system's `getaddrinfo` in a blocking task pool so resolution never
//! blocks the async runtime.

use crate::base::neterror::NetError;
use std::{fmt, future::Future, net::SocketAddr, net::ToSocketAddrs, pin::Pin, sync::Arc};

/// A domain name to resolve into IP addresses.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over `SocketAddr`.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Trait for DNS resolution.
///
/// Resolution is the first of the three connection-establishment steps and a
/// suspension point of its own. The returned addresses carry port 0; the
/// caller sets the target port.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to an ordered sequence of candidate addresses.
    fn resolve(&self, name: Name) -> Resolving;
}

impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

/// System DNS resolver using `getaddrinfo` in a thread pool.
///
/// Wraps the standard library's `ToSocketAddrs` under
/// `tokio::task::spawn_blocking`, so system DNS configuration
/// (/etc/resolv.conf, hosts file) is respected.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let lookup = name.as_str().to_string();
            let joined = tokio::task::spawn_blocking(move || {
                (lookup.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Vec<_>>())
            })
            .await;

            let host = name.as_str();
            let addrs = match joined {
                // Join error covers cancellation or a panicked lookup.
                Err(e) => return Err(NetError::ResolveFail(format!("lookup task for {host}: {e}"))),
                Ok(Err(e)) => return Err(NetError::ResolveFail(format!("{host}: {e}"))),
                Ok(Ok(addrs)) if addrs.is_empty() => {
                    return Err(NetError::ResolveFail(format!("{host}: empty address set")))
                }
                Ok(Ok(addrs)) => addrs,
            };

            tracing::debug!(host = %host, candidates = addrs.len(), "resolved");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
