//! Subject process supervision.
//!
//! # Responsibilities
//! - Launch the subject proxy as `<bin> <port>` with its output discarded
//! - Wait for the listening socket to come up before probing it
//! - Terminate gracefully first, forcibly second, and always reap
//!
//! # Design Decisions
//! - Liveness is probed with a zero-effect `kill(pid, 0)`, so terminating
//!   an already-dead handle is a no-op rather than an error
//! - Readiness is a bounded retry-connect loop capped at the settle
//!   interval; a subject that binds late is warned about and probed anyway

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time;

use crate::config::HarnessConfig;
use crate::net::fetch::LOCALHOST;

/// How often the readiness probe retries the listening socket.
const READY_PROBE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to launch {bin:?} on port {port}: {source}")]
    Launch {
        bin: PathBuf,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// A running subject proxy instance and the port it was told to bind.
///
/// Owned by the supervisor API for its lifetime; [`Supervisor::terminate`]
/// consumes it and reaps the process.
pub struct ProxyHandle {
    child: Child,
    port: u16,
}

impl ProxyHandle {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

impl Drop for ProxyHandle {
    fn drop(&mut self) {
        // Backstop for panicking paths; the normal path has already
        // terminated and reaped, making this a no-op.
        let _ = self.child.start_kill();
    }
}

/// Launches and tears down subject proxy instances.
#[derive(Debug, Clone)]
pub struct Supervisor {
    settle: Duration,
    grace: Duration,
}

impl Supervisor {
    pub fn new(settle: Duration, grace: Duration) -> Self {
        Self { settle, grace }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.settle(), config.grace())
    }

    /// Launch the subject bound to `port` and wait for it to come up.
    ///
    /// stdout/stderr are discarded so the subject cannot scribble over the
    /// harness report.
    pub async fn start(&self, bin: &Path, port: u16) -> Result<ProxyHandle, SpawnError> {
        let child = Command::new(bin)
            .arg(port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpawnError::Launch {
                bin: bin.to_path_buf(),
                port,
                source,
            })?;

        tracing::info!(
            bin = %bin.display(),
            port,
            pid = ?child.id(),
            "subject proxy launched"
        );

        self.wait_until_ready(port).await;

        Ok(ProxyHandle { child, port })
    }

    /// Retry-connect until the subject's listening socket accepts, bounded
    /// by the settle interval. Never fails: a subject that is slow to bind
    /// gets the full interval, same as a fixed settle delay would give it.
    async fn wait_until_ready(&self, port: u16) {
        let deadline = time::Instant::now() + self.settle;
        loop {
            match TcpStream::connect((LOCALHOST, port)).await {
                Ok(_) => {
                    tracing::debug!(port, "listening socket ready");
                    return;
                }
                Err(_) if time::Instant::now() + READY_PROBE_INTERVAL < deadline => {
                    time::sleep(READY_PROBE_INTERVAL).await;
                }
                Err(error) => {
                    tracing::warn!(
                        port,
                        error = %error,
                        "listening socket not ready within settle interval, proceeding"
                    );
                    return;
                }
            }
        }
    }

    /// Stop a subject instance: interrupt, give it the grace interval,
    /// kill, reap. Terminating an instance that already exited only reaps.
    pub async fn terminate(&self, mut handle: ProxyHandle) {
        if is_alive(&handle) {
            if let Some(pid) = handle.child.id() {
                // SAFETY: plain kill(2) on a pid we spawned and still own.
                unsafe {
                    libc::kill(pid as libc::pid_t, libc::SIGINT);
                }
            }
            time::sleep(self.grace).await;
            let _ = handle.child.start_kill();
        }

        match handle.child.wait().await {
            Ok(status) => {
                tracing::info!(port = handle.port, %status, "subject proxy terminated")
            }
            Err(error) => {
                tracing::warn!(port = handle.port, error = %error, "failed to reap subject proxy")
            }
        }
    }
}

/// Zero-effect existence probe: signal 0 delivers nothing but reports
/// whether the pid still exists.
fn is_alive(handle: &ProxyHandle) -> bool {
    match handle.child.id() {
        // SAFETY: kill with signal 0 only performs the existence check.
        Some(pid) => unsafe { libc::kill(pid as libc::pid_t, 0) == 0 },
        None => false,
    }
}
