//! Request validity classification.
//!
//! A pure state machine over raw request text. Every malformation lands in
//! `InvalidInput`; only a structurally sound request gets as far as the
//! method-support distinction.

use std::fmt;

use crate::http::is_absolute_target;

/// Method tokens recognized as real HTTP verbs. Anything else in method
/// position is garbage, not an unsupported method.
const KNOWN_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "TRACE", "CONNECT", "PATCH",
];

/// Outcome of classifying one raw request string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpRequestState {
    /// Well-formed GET request the proxy is expected to forward.
    Good,
    /// Structurally broken request.
    InvalidInput,
    /// Well-formed request for a verb the proxy does not speak.
    NotSupported,
}

impl fmt::Display for HttpRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpRequestState::Good => write!(f, "GOOD"),
            HttpRequestState::InvalidInput => write!(f, "INVALID_INPUT"),
            HttpRequestState::NotSupported => write!(f, "NOT_SUPPORTED"),
        }
    }
}

/// Classify a raw request string.
///
/// Structural checks run first: request-line shape, header grammar, Host
/// presence for relative targets, terminator. Only a request that clears
/// all of them can be `NotSupported` — a HEAD request missing its Host
/// header is invalid input, not an unsupported method.
pub fn check_http_request_validity(raw: &str) -> HttpRequestState {
    let mut lines = raw.split("\r\n");

    // split always yields at least one element
    let request_line = lines.next().unwrap_or_default();
    let tokens: Vec<&str> = request_line.split_whitespace().collect();
    if tokens.len() != 3 {
        return HttpRequestState::InvalidInput;
    }
    let (method, target, version) = (tokens[0], tokens[1], tokens[2]);
    if !version.starts_with("HTTP/") {
        return HttpRequestState::InvalidInput;
    }

    let mut saw_host = false;
    let mut saw_terminator = false;
    for line in lines {
        if line.is_empty() {
            saw_terminator = true;
            break;
        }
        match line.split_once(':') {
            // An empty value ("Accept:") is fine; an empty name is not.
            Some((name, _)) if !name.trim().is_empty() => {
                if name.trim().eq_ignore_ascii_case("host") {
                    saw_host = true;
                }
            }
            _ => return HttpRequestState::InvalidInput,
        }
    }
    if !saw_terminator {
        return HttpRequestState::InvalidInput;
    }

    if !is_absolute_target(target) && !saw_host {
        return HttpRequestState::InvalidInput;
    }

    if !KNOWN_METHODS.contains(&method) {
        return HttpRequestState::InvalidInput;
    }
    if method != "GET" {
        return HttpRequestState::NotSupported;
    }

    HttpRequestState::Good
}

#[cfg(test)]
mod tests {
    use super::*;
    use HttpRequestState::*;

    #[test]
    fn relative_get_with_host_is_good() {
        assert_eq!(
            check_http_request_validity("GET / HTTP/1.0\r\nHost: www.google.com\r\n\r\n"),
            Good
        );
    }

    #[test]
    fn unknown_method_is_invalid() {
        assert_eq!(
            check_http_request_validity("GOAT / HTTP/1.0\r\nHost: www.google.com\r\n\r\n"),
            InvalidInput
        );
    }

    #[test]
    fn known_non_get_method_is_not_supported() {
        assert_eq!(
            check_http_request_validity("HEAD / HTTP/1.0\r\nHost: www.google.com\r\n\r\n"),
            NotSupported
        );
        assert_eq!(
            check_http_request_validity("POST / HTTP/1.0\r\nHost: www.google.com\r\n\r\n"),
            NotSupported
        );
    }

    #[test]
    fn missing_host_outranks_unsupported_method() {
        // Structure is checked before method support.
        assert_eq!(check_http_request_validity("HEAD / HTTP/1.0\r\n\r\n"), InvalidInput);
    }

    #[test]
    fn header_without_colon_is_invalid() {
        assert_eq!(
            check_http_request_validity("HEAD www.google.com HTTP/1.0\r\nAccept \r\n"),
            InvalidInput
        );
    }

    #[test]
    fn missing_version_is_invalid() {
        assert_eq!(
            check_http_request_validity("HEAD / \r\nHost: www.google.com\r\n\r\n"),
            InvalidInput
        );
    }

    #[test]
    fn absolute_url_needs_no_headers() {
        assert_eq!(
            check_http_request_validity("GET http://google.com/ HTTP/1.0\r\n"),
            Good
        );
    }

    #[test]
    fn relative_get_without_host_is_invalid() {
        assert_eq!(check_http_request_validity("GET / HTTP/1.0\r\n\r\n"), InvalidInput);
    }

    #[test]
    fn wrong_token_count_is_invalid() {
        assert_eq!(check_http_request_validity("GET /\r\n\r\n"), InvalidInput);
        assert_eq!(
            check_http_request_validity("GET / HTTP/1.0 extra\r\nHost: a\r\n\r\n"),
            InvalidInput
        );
        assert_eq!(check_http_request_validity("\r\n\r\n"), InvalidInput);
    }

    #[test]
    fn version_token_must_look_like_http() {
        assert_eq!(
            check_http_request_validity("GET / FTP/1.0\r\nHost: a\r\n\r\n"),
            InvalidInput
        );
    }

    #[test]
    fn header_with_empty_value_is_accepted() {
        assert_eq!(
            check_http_request_validity("GET / HTTP/1.0\r\nHost: a.example\r\nAccept:\r\n\r\n"),
            Good
        );
    }

    #[test]
    fn header_with_empty_name_is_invalid() {
        assert_eq!(
            check_http_request_validity("GET / HTTP/1.0\r\n: value\r\n\r\n"),
            InvalidInput
        );
    }

    #[test]
    fn truncated_request_without_terminator_is_invalid() {
        assert_eq!(
            check_http_request_validity("GET / HTTP/1.0\r\nHost: a.example"),
            InvalidInput
        );
        assert_eq!(check_http_request_validity("GET / HTTP/1.0"), InvalidInput);
    }

    #[test]
    fn classification_never_panics_on_junk() {
        for raw in ["", "\r\n", "::::\r\n\r\n", "GET", "\0\0\0", "a b c d e\r\n\r\n"] {
            let _ = check_http_request_validity(raw);
        }
    }
}
