//! Cold-vs-warm fetch comparison.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::bench::speedup_ratio;
use crate::net::fetch::fetch_via_proxy;

/// Outcome of fetching the same URL twice through one proxy instance.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheReport {
    /// Both fetches returned, and byte-for-byte the same text. Guards
    /// against a cache serving stale or corrupted content.
    pub bodies_match: bool,
    pub cold: Duration,
    pub warm: Duration,
    /// cold elapsed / warm elapsed; > 1 suggests the second fetch was
    /// served from cache.
    pub speedup: f64,
}

/// Time two back-to-back fetches of `url` through the proxy on `port`.
///
/// A failed fetch on either side yields `bodies_match = false`; the
/// timings still report whatever the attempts took.
pub async fn compare_caching(port: u16, url: &str, connect_timeout: Duration) -> CacheReport {
    let start = Instant::now();
    let cold_body = fetch_via_proxy(port, url, connect_timeout).await;
    let cold = start.elapsed();

    let start = Instant::now();
    let warm_body = fetch_via_proxy(port, url, connect_timeout).await;
    let warm = start.elapsed();

    let bodies_match = match (&cold_body, &warm_body) {
        (Some(first), Some(second)) => first == second,
        _ => false,
    };

    tracing::info!(
        url = %url,
        cold_ms = cold.as_millis() as u64,
        warm_ms = warm.as_millis() as u64,
        bodies_match,
        "caching comparison finished"
    );

    CacheReport {
        bodies_match,
        cold,
        warm,
        speedup: speedup_ratio(cold, warm),
    }
}
