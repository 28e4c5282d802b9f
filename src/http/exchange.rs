//! One-shot HTTP request/response exchange.
//!
//! Each [`HttpExchange::send`] call re-resolves the URI, opens its own
//! connection, performs exactly one HTTP/1.1 request/response cycle, and
//! tears the connection down. There is no pooling or reuse across calls.

use crate::base::neterror::NetError;
use crate::endpoint::Endpoint;
use crate::socket::connectjob::{ConnectConfig, ConnectJob};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE, HOST, USER_AGENT};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;

/// Fixed client identifier sent in `User-Agent` unless overridden.
pub const DEFAULT_USER_AGENT: &str = "wireline/0.1";

/// A configurable HTTP request specification plus its exchange engine.
///
/// Mutable via setters until [`send`](Self::send) is invoked; `send` borrows
/// the request immutably, so it can be called repeatedly and each call opens
/// a fresh connection.
///
/// Only `GET` and `POST` are distinguished: POST attaches the configured
/// body and `Content-Type`, every other method string is transmitted verbatim
/// without body processing.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    url: String,
    method: String,
    body: Bytes,
    content_type: String,
    headers: HashMap<String, String>,
    config: ConnectConfig,
}

impl HttpExchange {
    /// Creates a GET exchange for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            body: Bytes::new(),
            content_type: String::new(),
            headers: HashMap::new(),
            config: ConnectConfig::default(),
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = method.into();
    }

    /// Sets the request body and its content type. Only consulted when the
    /// method is POST.
    pub fn set_body(&mut self, content_type: impl Into<String>, body: impl Into<Bytes>) {
        self.content_type = content_type.into();
        self.body = body.into();
    }

    /// Sets one header. Last write wins per name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Merges a header map into the request. Last write wins per name.
    pub fn set_headers(&mut self, headers: HashMap<String, String>) {
        self.headers.extend(headers);
    }

    /// Overrides the connection tunables (handshake deadline).
    pub fn set_config(&mut self, config: ConnectConfig) {
        self.config = config;
    }

    /// Performs one complete exchange and returns the response body.
    ///
    /// Status 200 is the sole success status; anything else fails with
    /// [`NetError::RequestFail`] carrying the status code and body text.
    pub async fn send(&self) -> Result<Bytes, NetError> {
        let endpoint = Endpoint::resolve(&self.url)?;
        let socket = ConnectJob::new(self.config.clone()).connect(&endpoint).await?;

        let io = TokioIo::new(socket);
        let (mut sender, conn) = http1::handshake::<_, Full<Bytes>>(io)
            .await
            .map_err(|e| NetError::ResponseFail(format!("HTTP handshake: {e}")))?;

        // Drive the connection until the exchange finishes; dropping the
        // sender ends the task and closes the socket.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection task ended with error");
            }
        });

        let req = self.build_request(&endpoint)?;
        tracing::debug!(method = %self.method, authority = %endpoint.authority(), path = %endpoint.path, "sending request");

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| NetError::ResponseFail(format!("request to {}: {e}", endpoint.authority())))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| NetError::ResponseFail(format!("reading response from {}: {e}", endpoint.authority())))?
            .to_bytes();

        if status != StatusCode::OK {
            return Err(NetError::RequestFail(format!(
                "status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }

        Ok(body)
    }

    fn build_request(&self, endpoint: &Endpoint) -> Result<Request<Full<Bytes>>, NetError> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|e| NetError::InvalidParam(format!("invalid method {:?}: {e}", self.method)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HOST,
            HeaderValue::from_str(&endpoint.host)
                .map_err(|e| NetError::InvalidParam(format!("host header: {e}")))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        // Caller headers override the defaults.
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| NetError::InvalidParam(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| NetError::InvalidParam(format!("header value for {name}: {e}")))?;
            headers.insert(name, value);
        }

        let is_post = method == Method::POST;
        if is_post {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&self.content_type)
                    .map_err(|e| NetError::InvalidParam(format!("content type: {e}")))?,
            );
        }

        let body = if is_post {
            Full::new(self.body.clone())
        } else {
            Full::new(Bytes::new())
        };

        let mut req = Request::builder()
            .method(method)
            .uri(endpoint.path.as_str())
            .body(body)
            .map_err(|e| NetError::InvalidParam(format!("building request: {e}")))?;
        *req.headers_mut() = headers;

        Ok(req)
    }
}
