//! Raw-socket HTTP/1.0 fetches.
//!
//! # Responsibilities
//! - Open a TCP connection, send one GET, read the full response
//! - Address an origin directly or the subject proxy on localhost
//! - Fold transport failures into missing results, never into panics
//!
//! # Design Decisions
//! - Only the connect is timeout-bounded; the read runs until the peer
//!   closes, which is the protocol's own framing
//! - Responses are decoded lossily: the exchange is treated as opaque
//!   text and judged by substring/equality checks downstream

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use url::Url;

use crate::http::DEFAULT_HTTP_PORT;

/// Loopback address the subject proxy instances are reached on.
pub const LOCALHOST: &str = "127.0.0.1";

/// Transport-level failure of a single exchange.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connect to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[error("i/o with {host}:{port} failed: {source}")]
    Io {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot fetch {0:?}: no usable host")]
    BadUrl(String),
}

/// One full text exchange: connect, write `GET <target> HTTP/1.0`, read
/// until the peer closes.
///
/// Returns `None` on any transport failure; the failure is logged and the
/// caller treats the missing response as a failed probe.
pub async fn http_exchange(
    host: &str,
    port: u16,
    target: &str,
    connect_timeout: Duration,
) -> Option<String> {
    match try_exchange(host, port, target, connect_timeout).await {
        Ok(response) => Some(response),
        Err(error) => {
            tracing::warn!(host = %host, port, target = %target, error = %error, "exchange failed");
            None
        }
    }
}

async fn try_exchange(
    host: &str,
    port: u16,
    target: &str,
    connect_timeout: Duration,
) -> Result<String, FetchError> {
    let io_error = |source| FetchError::Io {
        host: host.to_string(),
        port,
        source,
    };

    let mut stream = match time::timeout(connect_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => return Err(io_error(source)),
        Err(_) => {
            return Err(FetchError::ConnectTimeout {
                host: host.to_string(),
                port,
                timeout: connect_timeout,
            })
        }
    };

    let request = format!("GET {target} HTTP/1.0\r\n\r\n");
    stream.write_all(request.as_bytes()).await.map_err(io_error)?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.map_err(io_error)?;

    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Fetch `url` through the subject proxy listening on `port`.
///
/// The full URL goes on the request line, which is exactly the absolute-URL
/// form a forwarding proxy is expected to handle.
pub async fn fetch_via_proxy(port: u16, url: &str, connect_timeout: Duration) -> Option<String> {
    http_exchange(LOCALHOST, port, url, connect_timeout).await
}

/// Fetch `url` straight from its origin, bypassing the proxy.
pub async fn fetch_direct(url: &str, connect_timeout: Duration) -> Option<String> {
    let (host, port) = match origin_of(url) {
        Ok(origin) => origin,
        Err(error) => {
            tracing::warn!(url = %url, error = %error, "direct fetch skipped");
            return None;
        }
    };
    http_exchange(&host, port, url, connect_timeout).await
}

fn origin_of(url: &str) -> Result<(String, u16), FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::BadUrl(url.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| FetchError::BadUrl(url.to_string()))?
        .to_string();
    let port = parsed.port().unwrap_or(DEFAULT_HTTP_PORT);
    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_extraction_defaults_to_port_80() {
        assert_eq!(
            origin_of("http://info.cern.ch/").unwrap(),
            ("info.cern.ch".to_string(), 80)
        );
        assert_eq!(
            origin_of("http://localhost:8899/page").unwrap(),
            ("localhost".to_string(), 8899)
        );
    }

    #[test]
    fn unusable_urls_are_rejected() {
        assert!(origin_of("not a url").is_err());
        assert!(origin_of("mailto:postmaster@example.org").is_err());
    }
}
