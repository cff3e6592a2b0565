//! Network layer subsystem.
//!
//! One concern: raw HTTP/1.0 text exchanges, used both directly against an
//! origin and through the subject proxy. The wire protocol is
//! `GET <target> HTTP/1.0\r\n\r\n`, then read until the peer closes.

pub mod fetch;

pub use fetch::{fetch_direct, fetch_via_proxy, http_exchange, FetchError};
