//! Harness orchestration.
//!
//! # Sequence
//! ```text
//! 1. parsing/validity suite        (pure, no subject process)
//! 2. start primary proxy          ──┐
//! 3. response fidelity check        │ primary instance alive
//! 4. concurrency comparison         │ (comparison manages its own
//! 5. caching comparison             │  two disposable instances)
//! 6. terminate primary proxy      ──┘ runs on every exit path
//! ```
//!
//! # Design Decisions
//! - Every step returns a `Section`, never an error: a dead origin, a
//!   refused connection, or a spawn failure becomes a failed case and the
//!   run continues to teardown
//! - The `ProxyHandle` drop backstop covers the panicking paths

use std::path::Path;

use crate::bench::{compare_caching, compare_concurrency};
use crate::config::HarnessConfig;
use crate::net::fetch::{fetch_direct, fetch_via_proxy};
use crate::report::{CaseResult, HarnessReport, Section};
use crate::suite::{run_suite, StdGrammar};
use crate::supervisor::Supervisor;

/// Run the full grading sequence against the subject proxy at `bin`,
/// with the primary instance on `port`.
pub async fn run_harness(config: &HarnessConfig, bin: &Path, port: u16) -> HarnessReport {
    let supervisor = Supervisor::from_config(config);

    let mut sections = run_suite(&StdGrammar);

    match supervisor.start(bin, port).await {
        Ok(primary) => {
            sections.push(fidelity_section(port, config).await);
            sections.push(concurrency_section(&supervisor, bin, port, config).await);
            sections.push(caching_section(port, config).await);
            supervisor.terminate(primary).await;
        }
        Err(error) => {
            let mut section = Section::new("Subject launch");
            section.push(CaseResult::fail("start the subject proxy", error.to_string()));
            section.note("response fidelity, concurrency and caching checks skipped");
            sections.push(section);
        }
    }

    HarnessReport { sections }
}

/// Fetch the reference page directly and through the proxy; the bodies
/// must match byte for byte. A missing body on either side is a mismatch,
/// not an error.
async fn fidelity_section(port: u16, config: &HarnessConfig) -> Section {
    let timeout = config.connect_timeout();
    let url = &config.reference_url;

    let proxied = fetch_via_proxy(port, url, timeout).await;
    let direct = fetch_direct(url, timeout).await;

    let matched = match (&proxied, &direct) {
        (Some(through_proxy), Some(from_origin)) => through_proxy == from_origin,
        _ => false,
    };

    let mut section = Section::new("Response fidelity");
    section.push(CaseResult::check(
        format!("proxied response for {url} matches the direct fetch"),
        &true,
        &matched,
    ));
    if proxied.is_none() {
        section.note("no response through the proxy");
    }
    if direct.is_none() {
        section.note("no response from the origin");
    }
    section
}

async fn concurrency_section(
    supervisor: &Supervisor,
    bin: &Path,
    base_port: u16,
    config: &HarnessConfig,
) -> Section {
    let mut section = Section::new("Concurrency");

    match compare_concurrency(
        supervisor,
        bin,
        base_port,
        &config.concurrency_urls,
        config.connect_timeout(),
    )
    .await
    {
        Ok(report) => {
            section.push(CaseResult::check(
                format!("all {} fetches succeeded in both runs", report.serial.total),
                &true,
                &report.all_succeeded,
            ));
            section.note(format!(
                "serial {:?}, parallel {:?}, speedup {:.2}",
                report.serial.elapsed, report.parallel.elapsed, report.speedup
            ));
        }
        Err(error) => section.push(CaseResult::fail(
            "start the disposable proxy instances",
            error.to_string(),
        )),
    }

    section
}

async fn caching_section(port: u16, config: &HarnessConfig) -> Section {
    let report = compare_caching(port, &config.cache_url, config.connect_timeout()).await;

    let mut section = Section::new("Caching");
    section.push(CaseResult::check(
        format!("repeated fetch of {} returns an identical body", config.cache_url),
        &true,
        &report.bodies_match,
    ));
    section.note(format!(
        "cold {:?}, warm {:?}, speedup {:.2}",
        report.cold, report.warm, report.speedup
    ));
    section
}
