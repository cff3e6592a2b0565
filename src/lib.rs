//! Conformance and performance harness for a forwarding HTTP proxy.
//!
//! The proxy under test is somebody else's program: the harness launches it
//! as a child process bound to a port, talks to it over real sockets, and
//! grades what it observes.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌───────────────────────────────────────────────────┐
//!                │                      HARNESS                      │
//!                │                                                   │
//!   harness CLI  │  ┌──────────┐    ┌────────────┐    ┌──────────┐  │
//!   ─────────────┼─▶│  config  │───▶│  harness   │───▶│  report  │  │
//!                │  └──────────┘    │orchestrator│    │ sections │  │
//!                │                  └─────┬──────┘    └──────────┘  │
//!                │                        │                         │
//!                │      ┌─────────────────┼─────────────────┐       │
//!                │      ▼                 ▼                 ▼       │
//!                │  ┌──────────┐    ┌────────────┐    ┌──────────┐  │
//!                │  │  suite   │    │ supervisor │    │  bench   │  │
//!                │  │ parsing  │    │   spawn /  │    │ timing   │  │
//!                │  │  checks  │    │ terminate  │    │ compares │  │
//!                │  └────┬─────┘    └─────┬──────┘    └────┬─────┘  │
//!                │       ▼                ▼                ▼        │
//!                │  ┌──────────┐    ┌─────────────────────────┐     │
//!                │  │   http   │    │  net — raw HTTP/1.0     │     │    subject
//!                │  │ grammar  │    │  socket exchanges       │─────┼──▶ proxy +
//!                │  └──────────┘    └─────────────────────────┘     │    origins
//!                └───────────────────────────────────────────────────┘
//! ```
//!
//! The grading sequence: parsing/validity suite → response fidelity →
//! concurrency speedup → cache speedup, with the subject torn down on every
//! exit path.

pub mod bench;
pub mod config;
pub mod harness;
pub mod http;
pub mod net;
pub mod report;
pub mod suite;
pub mod supervisor;

pub use config::HarnessConfig;
pub use harness::run_harness;
pub use http::request::HttpRequestInfo;
pub use http::validity::HttpRequestState;
pub use report::HarnessReport;
pub use supervisor::Supervisor;
