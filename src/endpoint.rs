//! URI resolution into transport endpoints.
//!
//! An [`Endpoint`] is the resolved {host, port, path, secure} tuple derived
//! from a URI string. The `secure` flag decided here is the sole driver of
//! which transport variant the connection establisher instantiates; no other
//! code re-derives it from the scheme.

use crate::base::neterror::NetError;
use url::Url;

/// A resolved network endpoint.
///
/// Derived once from a URI and immutable afterwards. `port` is never zero:
/// when the URI carries no explicit port the scheme default applies (80 for
/// `http`/`ws`, 443 for `https`/`wss`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub secure: bool,
}

impl Endpoint {
    /// Parses a URI string into an endpoint.
    ///
    /// Recognizes exactly four schemes: `http`, `https`, `ws`, `wss`. Any
    /// other scheme, or a syntactically malformed URI, fails with
    /// [`NetError::InvalidParam`].
    pub fn resolve(uri: &str) -> Result<Endpoint, NetError> {
        let parsed = Url::parse(uri)
            .map_err(|e| NetError::InvalidParam(format!("invalid URI {uri:?}: {e}")))?;

        let (secure, default_port) = match parsed.scheme() {
            "http" | "ws" => (false, 80),
            "https" | "wss" => (true, 443),
            other => {
                return Err(NetError::InvalidParam(format!(
                    "unsupported scheme {other:?} in {uri:?}"
                )))
            }
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| NetError::InvalidParam(format!("no host in {uri:?}")))?;
        // url keeps the brackets on IPv6 literals; store the bare address so
        // DNS and socket code can parse it.
        let host = match host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            Some(v6) => v6.to_string(),
            None => host.to_string(),
        };

        let port = parsed.port().unwrap_or(default_port);

        let path = if parsed.path().is_empty() {
            "/".to_string()
        } else {
            parsed.path().to_string()
        };

        tracing::debug!(%host, port, %path, secure, "resolved endpoint");

        Ok(Endpoint {
            host,
            port,
            path,
            secure,
        })
    }

    /// The `host:port` authority, used in diagnostics and upgrade URLs.
    /// IPv6 literals are re-bracketed.
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::neterror::ErrorKind;

    #[test]
    fn http_defaults() {
        let ep = Endpoint::resolve("http://example.com/index.html").unwrap();
        assert_eq!(ep.host, "example.com");
        assert_eq!(ep.port, 80);
        assert_eq!(ep.path, "/index.html");
        assert!(!ep.secure);
    }

    #[test]
    fn https_defaults() {
        let ep = Endpoint::resolve("https://example.com/").unwrap();
        assert_eq!(ep.port, 443);
        assert!(ep.secure);
    }

    #[test]
    fn ws_defaults() {
        let ep = Endpoint::resolve("ws://example.com/feed").unwrap();
        assert_eq!(ep.port, 80);
        assert_eq!(ep.path, "/feed");
        assert!(!ep.secure);
    }

    #[test]
    fn wss_defaults() {
        let ep = Endpoint::resolve("wss://example.com/feed").unwrap();
        assert_eq!(ep.port, 443);
        assert!(ep.secure);
    }

    #[test]
    fn explicit_port_wins() {
        let ep = Endpoint::resolve("http://example.com:8080/x").unwrap();
        assert_eq!(ep.port, 8080);
    }

    #[test]
    fn empty_path_becomes_root() {
        let ep = Endpoint::resolve("ws://example.com").unwrap();
        assert_eq!(ep.path, "/");
    }

    #[test]
    fn unknown_scheme_rejected() {
        let err = Endpoint::resolve("ftp://example.com/file").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }

    #[test]
    fn malformed_uri_rejected() {
        let err = Endpoint::resolve("not a uri at all").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
        let err = Endpoint::resolve("http://").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }

    #[test]
    fn authority_formats_host_and_port() {
        let ep = Endpoint::resolve("https://example.com:8443/").unwrap();
        assert_eq!(ep.authority(), "example.com:8443");
    }

    #[test]
    fn ipv6_literal_stored_without_brackets() {
        let ep = Endpoint::resolve("http://[::1]:8080/x").unwrap();
        assert_eq!(ep.host, "::1");
        assert_eq!(ep.port, 8080);
        assert_eq!(ep.authority(), "[::1]:8080");
    }
}
