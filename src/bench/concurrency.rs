//! Serial-vs-parallel fetch comparison.

use std::path::Path;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::time::Instant;

use crate::bench::speedup_ratio;
use crate::net::fetch::fetch_via_proxy;
use crate::supervisor::{SpawnError, Supervisor};

/// Substring a live HTTP response must contain. Crude, but it separates
/// "the proxy answered with something HTTP-shaped" from silence and noise.
const LIVENESS_MARKER: &str = "HTTP";

/// Aggregate outcome of fetching one URL set.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimedRun {
    pub succeeded: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl TimedRun {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Outcome of the serial/parallel comparison.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConcurrencyReport {
    /// Every fetch in both runs produced an HTTP-shaped response.
    pub all_succeeded: bool,
    pub serial: TimedRun,
    pub parallel: TimedRun,
    /// serial elapsed / parallel elapsed; > 1 means parallelism helped.
    pub speedup: f64,
}

fn is_live(response: Option<String>) -> bool {
    response.is_some_and(|body| body.contains(LIVENESS_MARKER))
}

/// Fetch every URL through the proxy one after another.
pub async fn fetch_serial(port: u16, urls: &[String], connect_timeout: Duration) -> TimedRun {
    let start = Instant::now();
    let mut succeeded = 0;
    for url in urls {
        if is_live(fetch_via_proxy(port, url, connect_timeout).await) {
            succeeded += 1;
        }
    }
    TimedRun {
        succeeded,
        total: urls.len(),
        elapsed: start.elapsed(),
    }
}

/// Fetch every URL through the proxy concurrently, one task per URL.
///
/// Success is counted after all tasks join; the tasks share nothing.
pub async fn fetch_parallel(port: u16, urls: &[String], connect_timeout: Duration) -> TimedRun {
    let start = Instant::now();

    let tasks: Vec<_> = urls
        .iter()
        .cloned()
        .map(|url| {
            tokio::spawn(async move {
                is_live(fetch_via_proxy(port, &url, connect_timeout).await)
            })
        })
        .collect();

    let succeeded = join_all(tasks)
        .await
        .into_iter()
        .filter(|outcome| matches!(outcome, Ok(true)))
        .count();

    TimedRun {
        succeeded,
        total: urls.len(),
        elapsed: start.elapsed(),
    }
}

/// Run the full comparison: two disposable proxy instances on offset
/// ports, serial against the first, parallel against the second.
///
/// Each instance is torn down before this returns, whatever the fetches
/// did. The two instances exist only to keep the runs from interfering
/// with each other (and with the primary instance on the base port).
pub async fn compare_concurrency(
    supervisor: &Supervisor,
    bin: &Path,
    base_port: u16,
    urls: &[String],
    connect_timeout: Duration,
) -> Result<ConcurrencyReport, SpawnError> {
    let serial_port = base_port + 1;
    let handle = supervisor.start(bin, serial_port).await?;
    let serial = fetch_serial(serial_port, urls, connect_timeout).await;
    supervisor.terminate(handle).await;

    let parallel_port = base_port + 2;
    let handle = supervisor.start(bin, parallel_port).await?;
    let parallel = fetch_parallel(parallel_port, urls, connect_timeout).await;
    supervisor.terminate(handle).await;

    tracing::info!(
        serial_ms = serial.elapsed.as_millis() as u64,
        parallel_ms = parallel.elapsed.as_millis() as u64,
        serial_ok = serial.succeeded,
        parallel_ok = parallel.succeeded,
        "concurrency comparison finished"
    );

    Ok(ConcurrencyReport {
        all_succeeded: serial.all_succeeded() && parallel.all_succeeded(),
        serial,
        parallel,
        speedup: speedup_ratio(serial.elapsed, parallel.elapsed),
    })
}
