//! Parsing and validity conformance suite.
//!
//! The suite is written against the [`RequestGrammar`] seam so the same
//! cases can grade any implementation of the parsing contract. The
//! harness CLI runs it against the built-in grammar; unit tests for
//! alternative implementations can reuse it wholesale.
//!
//! An implementation that panics mid-suite is reported as a single failed
//! case instead of tearing the harness down.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::http::request::{parse_http_request, HttpRequestInfo, ParseError};
use crate::http::validity::{check_http_request_validity, HttpRequestState};
use crate::report::{CaseResult, Section};

/// Client address the conformance requests claim to come from.
fn suite_client() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9877)
}

/// The parsing contract a subject module must satisfy.
pub trait RequestGrammar {
    fn parse(&self, client: SocketAddr, raw: &str) -> Result<HttpRequestInfo, ParseError>;
    fn validity(&self, raw: &str) -> HttpRequestState;
}

/// The built-in grammar, backed by this crate's parser and checker.
pub struct StdGrammar;

impl RequestGrammar for StdGrammar {
    fn parse(&self, client: SocketAddr, raw: &str) -> Result<HttpRequestInfo, ParseError> {
        parse_http_request(client, raw)
    }

    fn validity(&self, raw: &str) -> HttpRequestState {
        check_http_request_validity(raw)
    }
}

/// Run both conformance sections, isolating each from panics in the
/// grammar under test.
pub fn run_suite<G: RequestGrammar>(grammar: &G) -> Vec<Section> {
    vec![
        guarded("Request validity", || validity_cases(grammar)),
        guarded("Request parsing", || parsing_cases(grammar)),
    ]
}

fn guarded(title: &str, run: impl FnOnce() -> Section) -> Section {
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(section) => section,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic".to_string());
            let mut section = Section::new(title);
            section.push(CaseResult::fail(
                "failed to run tests",
                format!("panicked: {reason}"),
            ));
            section
        }
    }
}

/// Classification scenarios: every structural malformation is invalid
/// input, a sound non-GET is unsupported, both request forms can be good.
pub fn validity_cases<G: RequestGrammar>(grammar: &G) -> Section {
    use HttpRequestState::*;

    let scenarios: &[(&str, &str, HttpRequestState)] = &[
        (
            "Classify a valid HTTP request",
            "GET / HTTP/1.0\r\nHost: www.google.com\r\n\r\n",
            Good,
        ),
        (
            "Classify an invalid HTTP request (unknown method)",
            "GOAT / HTTP/1.0\r\nHost: www.google.com\r\n\r\n",
            InvalidInput,
        ),
        (
            "Classify an invalid HTTP request (not-supported method)",
            "HEAD / HTTP/1.0\r\nHost: www.google.com\r\n\r\n",
            NotSupported,
        ),
        (
            "Classify an invalid HTTP request (relative path, no Host header)",
            "HEAD / HTTP/1.0\r\n\r\n",
            InvalidInput,
        ),
        (
            "Classify an invalid HTTP request (header with no colon)",
            "HEAD www.google.com HTTP/1.0\r\nAccept \r\n",
            InvalidInput,
        ),
        (
            "Classify an invalid HTTP request (no HTTP version)",
            "HEAD / \r\nHost: www.google.com\r\n\r\n",
            InvalidInput,
        ),
        (
            "GET with a full URL and zero headers is good",
            "GET http://google.com/ HTTP/1.0\r\n",
            Good,
        ),
        (
            "GET with a relative path and Host header is good",
            "GET / HTTP/1.0\r\nHost: google.com\r\n\r\n",
            Good,
        ),
        (
            "GET with a relative path and no Host header is invalid",
            "GET / HTTP/1.0\r\n\r\n",
            InvalidInput,
        ),
    ];

    let mut section = Section::new("Request validity");
    for (case, raw, expected) in scenarios {
        section.push(CaseResult::check(*case, expected, &grammar.validity(raw)));
    }
    section
}

/// Parsing scenarios: field extraction from both request forms, plus the
/// serialization round trip.
pub fn parsing_cases<G: RequestGrammar>(grammar: &G) -> Section {
    let client = suite_client();
    let mut section = Section::new("Request parsing");

    let raw = "GET / HTTP/1.0\r\nHost: www.google.com\r\n\r\n";
    match grammar.parse(client, raw) {
        Ok(parsed) => {
            section.push(CaseResult::check(
                "Parse HTTP method",
                &"GET".to_string(),
                &parsed.method,
            ));
            section.push(CaseResult::check(
                "Parse headers (colon stripped from the name)",
                &("Host".to_string(), "www.google.com".to_string()),
                &parsed.headers[0],
            ));
            section.push(CaseResult::check(
                "Parse HTTP request path",
                &"/".to_string(),
                &parsed.requested_path,
            ));
            section.push(CaseResult::check(
                "Default the port when the request has none",
                &80,
                &parsed.requested_port,
            ));
            section.push(CaseResult::check(
                "Extract the requested host",
                &"www.google.com".to_string(),
                &parsed.requested_host,
            ));
        }
        Err(error) => section.push(CaseResult::fail(
            "Parse a relative-path request",
            error.to_string(),
        )),
    }

    let raw = "GET http://www.google.com/ HTTP/1.0\r\n\r\n";
    match grammar.parse(client, raw) {
        Ok(parsed) => {
            section.push(CaseResult::check(
                "Convert a full URL in the request to a relative path",
                &"/".to_string(),
                &parsed.requested_path,
            ));
            section.push(CaseResult::check(
                "Add a Host header when a full URL is used",
                &("Host".to_string(), "www.google.com".to_string()),
                &parsed.headers[0],
            ));
        }
        Err(error) => section.push(CaseResult::fail(
            "Parse an absolute-URL request",
            error.to_string(),
        )),
    }

    let raw = "GET / HTTP/1.0\r\nHost: www.google.com\r\nAccept: application/json\r\n\r\n";
    match grammar.parse(client, raw) {
        Ok(parsed) => {
            section.push(CaseResult::check(
                "Parse multiple HTTP headers",
                &2,
                &parsed.headers.len(),
            ));
        }
        Err(error) => section.push(CaseResult::fail(
            "Parse a request with several headers",
            error.to_string(),
        )),
    }

    let request = HttpRequestInfo::new(
        client,
        "GET",
        "www.google.com",
        80,
        "/",
        vec![
            ("Host".to_string(), "www.google.com".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ],
    );
    section.push(CaseResult::check(
        "Serialize HttpRequestInfo to the wire request",
        &"GET / HTTP/1.0\r\nHost: www.google.com\r\nAccept: application/json\r\n\r\n".to_string(),
        &request.to_http_string(),
    ));

    match grammar.parse(client, &request.to_http_string()) {
        Ok(reparsed) => section.push(CaseResult::check(
            "Round-trip: parse(serialize(request)) == request",
            &request,
            &reparsed,
        )),
        Err(error) => section.push(CaseResult::fail(
            "Round-trip parse of serialized request",
            error.to_string(),
        )),
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_grammar_passes_the_whole_suite() {
        let sections = run_suite(&StdGrammar);
        let failed: usize = sections.iter().map(Section::failed).sum();
        let rendered: Vec<String> = sections.iter().map(ToString::to_string).collect();
        assert_eq!(failed, 0, "failures:\n{}", rendered.join("\n"));
    }

    #[test]
    fn suite_covers_both_sections() {
        let sections = run_suite(&StdGrammar);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Request validity", "Request parsing"]);
        assert!(sections.iter().all(|s| !s.cases.is_empty()));
    }

    #[test]
    fn panicking_grammar_is_one_failed_case() {
        struct Exploding;
        impl RequestGrammar for Exploding {
            fn parse(&self, _: SocketAddr, _: &str) -> Result<HttpRequestInfo, ParseError> {
                panic!("subject module is broken")
            }
            fn validity(&self, _: &str) -> HttpRequestState {
                panic!("subject module is broken")
            }
        }

        let sections = run_suite(&Exploding);
        assert_eq!(sections.len(), 2);
        for section in &sections {
            assert_eq!(section.cases.len(), 1);
            assert!(!section.cases[0].passed);
            assert!(section.cases[0].actual.contains("subject module is broken"));
        }
    }
}
