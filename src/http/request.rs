//! Parsed representation of a request headed for forwarding.
//!
//! # Responsibilities
//! - Parse a raw request string into host / port / path / headers
//! - Normalize the absolute-URL form into the relative form plus Host
//! - Serialize back to wire format with headers in stored order
//!
//! # Design Decisions
//! - Header order is significant and preserved; duplicates are kept as
//!   separate entries, never merged
//! - Serialization always emits HTTP/1.0, the only version the harness
//!   speaks on the wire

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::http::{is_absolute_target, DEFAULT_HTTP_PORT};

/// Errors from parsing a raw request string.
///
/// Callers are expected to have classified the text first; these cover the
/// gap between "classified as parseable" and "actually parseable".
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request line {0:?} does not have method and target")]
    RequestLine(String),

    #[error("absolute target rejected: {0}")]
    Url(#[from] url::ParseError),

    #[error("absolute target {0:?} has no host component")]
    UrlWithoutHost(String),

    #[error("relative target with no Host header")]
    MissingHost,

    #[error("Host header {0:?} carries an unusable port")]
    HostPort(String),
}

/// One parsed request, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestInfo {
    /// Originating client, informational only.
    pub client_addr: SocketAddr,
    /// Request method, uppercase as received.
    pub method: String,
    /// Host the request should be forwarded to. Never empty.
    pub requested_host: String,
    /// Destination port, 80 unless the request said otherwise.
    pub requested_port: u16,
    /// Path component only, always starting with `/`.
    pub requested_path: String,
    /// Header pairs in insertion order, names without the colon.
    pub headers: Vec<(String, String)>,
}

impl HttpRequestInfo {
    pub fn new(
        client_addr: SocketAddr,
        method: impl Into<String>,
        requested_host: impl Into<String>,
        requested_port: u16,
        requested_path: impl Into<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            client_addr,
            method: method.into(),
            requested_host: requested_host.into(),
            requested_port,
            requested_path: requested_path.into(),
            headers,
        }
    }

    /// Serialize back to wire format: request line, headers in stored
    /// order, blank-line terminator.
    pub fn to_http_string(&self) -> String {
        let mut out = format!("{} {} HTTP/1.0\r\n", self.method, self.requested_path);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out
    }
}

impl fmt::Display for HttpRequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}{} ({} headers)",
            self.method,
            self.requested_host,
            self.requested_port,
            self.requested_path,
            self.headers.len()
        )
    }
}

/// Parse a raw request string into an [`HttpRequestInfo`].
///
/// The caller must have established the text is well formed enough, e.g.
/// via [`crate::http::check_http_request_validity`]; arbitrary garbage is
/// rejected with an error but gets no particular diagnostic care.
pub fn parse_http_request(
    client_addr: SocketAddr,
    raw: &str,
) -> Result<HttpRequestInfo, ParseError> {
    let mut lines = raw.split("\r\n");
    let request_line = lines.next().unwrap_or_default();

    let mut tokens = request_line.split_whitespace();
    let (method, target) = match (tokens.next(), tokens.next()) {
        (Some(method), Some(target)) => (method.to_string(), target),
        _ => return Err(ParseError::RequestLine(request_line.to_string())),
    };

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    if is_absolute_target(target) {
        let parsed = Url::parse(target)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ParseError::UrlWithoutHost(target.to_string()))?
            .to_string();
        let port = parsed.port().unwrap_or(DEFAULT_HTTP_PORT);

        // The absolute form carries the host itself, so a Host header is
        // optional on input; forwarding still wants one, first. The default
        // port is not spelled out in the synthesized value.
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("host"))
        {
            let value = if port == DEFAULT_HTTP_PORT {
                host.clone()
            } else {
                format!("{host}:{port}")
            };
            headers.insert(0, ("Host".to_string(), value));
        }

        Ok(HttpRequestInfo::new(
            client_addr,
            method,
            host,
            port,
            parsed.path(),
            headers,
        ))
    } else {
        let host_value = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("host"))
            .map(|(_, value)| value.clone())
            .ok_or(ParseError::MissingHost)?;
        let (host, port) = split_host_port(&host_value)?;

        Ok(HttpRequestInfo::new(
            client_addr,
            method,
            host,
            port,
            target,
            headers,
        ))
    }
}

/// Split a Host header value into hostname and port, defaulting to 80.
fn split_host_port(value: &str) -> Result<(String, u16), ParseError> {
    match value.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse()
                .map_err(|_| ParseError::HostPort(value.to_string()))?;
            Ok((host.to_string(), port))
        }
        None => Ok((value.to_string(), DEFAULT_HTTP_PORT)),
    }
}
