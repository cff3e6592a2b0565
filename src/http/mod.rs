//! HTTP request grammar subsystem.
//!
//! # Data Flow
//! ```text
//! raw request text
//!     → validity.rs (classify: Good / InvalidInput / NotSupported)
//!     → request.rs  (parse the Good ones into HttpRequestInfo)
//!     → to_http_string (serialize back for forwarding)
//! ```
//!
//! # Design Decisions
//! - Classification and parsing are split: `check_http_request_validity`
//!   is total and never fails, `parse_http_request` assumes its input
//!   already classified as parseable
//! - Both operate on `&str`; no I/O anywhere in this module

pub mod request;
pub mod validity;

pub use request::{parse_http_request, HttpRequestInfo, ParseError};
pub use validity::{check_http_request_validity, HttpRequestState};

/// Default port for request targets and Host headers that carry none.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Whether a request target is an absolute URL rather than a bare path.
pub(crate) fn is_absolute_target(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}
