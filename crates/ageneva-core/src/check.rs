//! Strategy self-test against normalization
//!
//! A strategy is only useful if the server side can still make sense of
//! the mutated request. This module applies a strategy to a fixed set of
//! canonical requests, normalizes the result, and verifies the outcome
//! would satisfy a strict RFC 7230 parser. It also reports which elements
//! could not be restored exactly, since some mutations are lossy by
//! design.

use crate::error::Result;
use crate::http::normalize::normalize_request;
use crate::http::{tables, Request};
use crate::strategy::Strategy;

/// The canonical requests every strategy is checked against.
const CANONICAL_REQUESTS: [(&str, &str); 4] = [
    ("GET", "GET /some/path HTTP/1.1\r\nHost: example.com\r\n\r\n"),
    (
        "POST without body",
        "POST /some/path HTTP/1.1\r\nHost: example.com\r\n\r\n",
    ),
    (
        "POST with body",
        "POST /some/path HTTP/1.1\r\nHost: example.com\r\n\r\nsome body",
    ),
    (
        "PUT with body",
        "PUT /some/path HTTP/1.1\r\nHost: example.com\r\n\r\nsome body",
    ),
];

/// Outcome of checking one canonical request.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Short name of the canonical request
    pub name: &'static str,
    /// The request before mutation
    pub request: String,
    /// The normalized request after mutation, when normalization ran
    pub normalized: Option<String>,
    /// Why the check failed, if it did
    pub failure: Option<String>,
    /// Elements that differ from the original after normalization. Not a
    /// failure: some strategies discard values that can only be inferred.
    pub diffs: Vec<String>,
}

impl CheckOutcome {
    /// True if the mutated request normalized into a strictly valid one.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// True if the check passed and the original request was fully
    /// restored by normalization.
    pub fn restored(&self) -> bool {
        self.passed() && self.diffs.is_empty()
    }
}

/// Results of checking a strategy against every canonical request.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// One outcome per canonical request, in order.
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    /// True if every canonical request passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }
}

/// Parse `strategy` and check it. An invalid strategy string is an error;
/// per-request failures are reported in the outcomes instead.
pub fn check_strategy(strategy: &str) -> Result<CheckReport> {
    let strategy = Strategy::new(strategy)?;
    Ok(check(&strategy))
}

/// Check a parsed strategy: mutate each canonical request, normalize the
/// result, and verify the normalized form is strictly valid.
pub fn check(strategy: &Strategy) -> CheckReport {
    let outcomes = CANONICAL_REQUESTS
        .iter()
        .map(|&(name, request)| {
            let mut outcome = CheckOutcome {
                name,
                request: request.to_string(),
                normalized: None,
                failure: None,
                diffs: Vec::new(),
            };

            let mutated = match strategy.apply_to_bytes(request.as_bytes()) {
                Ok(m) => m,
                Err(e) => {
                    outcome.failure = Some(format!("failed to apply strategy: {e}"));
                    return outcome;
                }
            };

            let normalized = match normalize_request(&mutated) {
                Ok(n) => n,
                Err(e) => {
                    outcome.failure = Some(format!("failed to normalize request: {e}"));
                    return outcome;
                }
            };
            outcome.normalized = Some(String::from_utf8_lossy(&normalized).into_owned());

            if let Err(violation) = strict_check(&normalized) {
                outcome.failure = Some(format!("normalized request is not valid: {violation}"));
                return outcome;
            }

            outcome.diffs = diff_requests(request.as_bytes(), &normalized);
            outcome
        })
        .collect();

    CheckReport { outcomes }
}

/// Verify `req` against the strict request grammar: a three-token start
/// line, a token method, a target and version of the accepted forms, and
/// headers with token names and control-free values.
fn strict_check(req: &[u8]) -> std::result::Result<(), String> {
    let req = Request::parse(req).map_err(|e| e.to_string())?;

    if req.method().is_empty() || !req.method().bytes().all(tables::is_tchar) {
        return Err(format!("invalid method: {:?}", req.method()));
    }
    if req.path().is_empty() || req.path().bytes().any(tables::is_ctrl) {
        return Err(format!("invalid request-target: {:?}", req.path()));
    }

    for line in req.headers().split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| format!("header without a colon: {line:?}"))?;
        // A cleaned-to-empty name is tolerated, the way lenient servers
        // tolerate it; remaining bytes must be token characters.
        if !name.bytes().all(tables::is_tchar) {
            return Err(format!("invalid header name: {name:?}"));
        }
        if value.bytes().any(|b| tables::is_ctrl(b) && b != b'\t') {
            return Err(format!("invalid header value: {value:?}"));
        }
    }

    Ok(())
}

/// Compare method, path, version, and host between the original and
/// normalized requests. Only those elements are mutated by strategies, so
/// only those can differ.
fn diff_requests(original: &[u8], normalized: &[u8]) -> Vec<String> {
    let (Ok(orig), Ok(norm)) = (Request::parse(original), Request::parse(normalized)) else {
        return vec!["unable to compare requests".to_string()];
    };

    let mut diffs = Vec::new();
    if orig.method() != norm.method() {
        diffs.push(format!(
            "method: orig={}, norm={}",
            orig.method(),
            norm.method()
        ));
    }
    if orig.path() != norm.path() {
        diffs.push(format!("path: orig={}, norm={}", orig.path(), norm.path()));
    }
    if orig.version() != norm.version() {
        diffs.push(format!(
            "version: orig={}, norm={}",
            orig.version(),
            norm.version()
        ));
    }

    let host = |req: &Request| {
        req.header_line("host")
            .and_then(|line| line.split_once(':').map(|(_, v)| v.trim().to_lowercase()))
            .unwrap_or_default()
    };
    let (orig_host, norm_host) = (host(&orig), host(&norm));
    if orig_host != norm_host {
        diffs.push(format!("host: orig={orig_host}, norm={norm_host}"));
    }

    diffs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversible_strategy_restores() {
        let report = check_strategy("[HTTP:host:*]-insert{%20:start:name:1}-|").unwrap();
        assert!(report.passed());
        for outcome in &report.outcomes {
            assert!(outcome.restored(), "{}: {:?}", outcome.name, outcome.diffs);
        }
    }

    #[test]
    fn test_lossy_strategy_passes_with_diffs() {
        // Replacing the method discards it; normalization infers GET or
        // POST, which differs for the PUT request.
        let report = check_strategy("[HTTP:method:*]-replace{%3A:value:1}-|").unwrap();
        assert!(report.passed());
        let put = report
            .outcomes
            .iter()
            .find(|o| o.name == "PUT with body")
            .unwrap();
        assert!(!put.restored());
        assert!(put.diffs.iter().any(|d| d.starts_with("method")));
    }

    #[test]
    fn test_invalid_strategy_is_an_error() {
        assert!(check_strategy("[HTTP:host:*]-changecase{upper}").is_err());
    }

    #[test]
    fn test_strict_check() {
        assert!(strict_check(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").is_ok());
        assert!(strict_check(b"G T / HTTP/1.1\r\nHost: x\r\n\r\n").is_err());
        assert!(strict_check(b"GET /a b HTTP/1.1\r\nHost: x\r\n\r\n").is_err());
        assert!(strict_check(b"GET / HTTP/1.1\r\nHo st: x\r\n\r\n").is_err());
        assert!(strict_check(b"GET / HTTP/1.1\r\nHost: \x01x\r\n\r\n").is_err());
    }
}
