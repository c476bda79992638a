//! Permissive HTTP/1.x request normalizer
//!
//! Recovers an RFC 7230 conformant request from one that was deliberately
//! corrupted by mutation strategies: excess whitespace, duplicated tokens,
//! inserted control bytes, replaced components. Normalization does not
//! reverse strategies; it only repairs the request enough for a strict
//! parser to accept it. Some mutations discard the original value, in
//! which case the component is inferred (method, version) or defaulted
//! (request-target).
//!
//! Syntax notation used in this file, per RFC 7230:
//!     OWS    = optional whitespace ( SP / HTAB, liberally also CR )
//!     VCHAR  = any visible ASCII character
//!     tchar  = token character, section 3.2.6

use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{find, tables, CRLF_CRLF};

/// RFC 7231 section 4.1 request methods.
const METHODS: [&str; 8] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE",
];

/// Normalize a request that may have been modified by mutation strategies.
///
/// The head must still end with an empty line, even when the body is
/// empty; everything else is recovered permissively. If no valid method or
/// version is found the method defaults to `GET` or `POST` depending on
/// whether a body is present, and the version defaults to `HTTP/1.1`.
///
/// The output adheres strictly to RFC 7230 framing, but values such as the
/// request-target and host are only guaranteed to be *valid*, not correct:
/// a strategy that replaced them outright cannot be undone.
pub fn normalize_request(req: &[u8]) -> Result<Vec<u8>> {
    let idx =
        find(req, CRLF_CRLF).ok_or_else(|| Error::malformed("missing header/body separator"))?;
    let (head, body) = (&req[..idx], &req[idx + CRLF_CRLF.len()..]);

    let lines = split_crlf(head);
    if lines.is_empty() {
        return Err(Error::malformed("empty request head"));
    }

    let (method, path, version) = parse_request_line(lines[0])?;

    // Strategies can replace the method or version with arbitrary text.
    // The replacement cannot be recovered, so infer instead: POST when a
    // body is present, GET otherwise, and HTTP/1.1 for the version.
    let method = if method.is_empty() {
        if body.is_empty() { "GET" } else { "POST" }.to_string()
    } else {
        method
    };
    let version = if version.is_empty() {
        "HTTP/1.1".to_string()
    } else {
        version
    };

    // Clean the headers. Only one Host header is allowed; the first wins
    // and the rest are dropped.
    let mut headers: Vec<Vec<u8>> = Vec::with_capacity(lines.len());
    let mut host_found = false;
    for line in &lines[1..] {
        let h = clean_header(line)?;

        if h.starts_with(b"Host:") {
            if host_found {
                continue;
            }
            host_found = true;
        }

        headers.push(h);
    }

    let mut out = Vec::with_capacity(req.len());
    out.extend_from_slice(method.as_bytes());
    out.push(b' ');
    out.extend_from_slice(path.as_bytes());
    out.push(b' ');
    out.extend_from_slice(version.as_bytes());
    for h in &headers {
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(h);
    }
    out.extend_from_slice(CRLF_CRLF);
    out.extend_from_slice(body);
    Ok(out)
}

/// Tokenize and recover the request line.
///
/// Components are separated by at least one SP with any amount of OWS
/// around them, and strategies may have duplicated components or inserted
/// whitespace in the middle, so there can be more than three tokens. The
/// method is the first token (scanning left to right) that cleans to an
/// RFC 7231 method; the version is the first token from the right that
/// cleans to `HTTP/1.0` or `HTTP/1.1`; the request-target must sit
/// between them. Returns empty strings for an unrecovered method or
/// version; fewer than three tokens is an error.
fn parse_request_line(line: &[u8]) -> Result<(String, String, String)> {
    let mut components: Vec<&[u8]> = Vec::new();
    let mut rest = line;
    loop {
        rest = trim_ows(rest);
        if rest.is_empty() {
            break;
        }

        let sp = rest.iter().position(|&b| b == b' ').unwrap_or(rest.len());
        let comp = trim_ows(&rest[..sp]);
        if !comp.is_empty() {
            components.push(comp);
        }
        rest = &rest[sp..];
    }

    if components.len() < 3 {
        return Err(Error::malformed(format!(
            "request line has less than 3 components: {:?}",
            String::from_utf8_lossy(line)
        )));
    }

    let mut method = String::new();
    let mut m_idx = 0;
    for (i, comp) in components[..components.len() - 2].iter().enumerate() {
        let c = tables::clean(comp, tables::is_alpha);
        let m = String::from_utf8_lossy(&c).into_owned();
        if METHODS.contains(&m.as_str()) {
            method = m;
            m_idx = i;
            break;
        }
    }

    let mut version = String::new();
    let mut v_idx = components.len() - 1;
    for i in (2..components.len()).rev() {
        let c = tables::clean(components[i], tables::is_version_char);
        let v = String::from_utf8_lossy(&c).into_owned();
        if is_version_1x(&v) {
            version = v;
            v_idx = i;
            break;
        }
    }

    // The request-target must be between the method and version. When
    // either was not recovered its index stays at the corresponding end.
    let hi = v_idx.max(m_idx + 1);
    let mut path = find_path(&components[m_idx + 1..hi]);

    if path.is_empty() {
        // The target was overridden by a replace action; the original is
        // unrecoverable, so fall back to the root.
        debug!(
            line = %String::from_utf8_lossy(line),
            "no request-target recovered, defaulting to /"
        );
        path = "/".to_string();
    }

    Ok((method, path, version))
}

/// Search `components` for a request-target.
///
/// Each component is cleaned against the token table enlarged with `/`
/// and `:`; the first that already matches the origin, absolute, or
/// asterisk form wins. Failing that, assume valid characters were
/// inserted around the target and salvage a substring: an `http(s)://`
/// occurrence, then everything from the first `/`, then a bare `*`.
fn find_path(components: &[&[u8]]) -> String {
    let mut cleaned: Vec<Vec<u8>> = Vec::with_capacity(components.len());
    for comp in components {
        let c = tables::clean(comp, |b| tables::is_tchar(b) || b == b'/' || b == b':');
        if is_valid_path(&c) {
            return String::from_utf8_lossy(&c).into_owned();
        }

        cleaned.push(c);
    }

    for comp in &cleaned {
        // 'http(s)://' first, since '/' alone is also a valid form.
        let comp = comp.to_ascii_lowercase();
        if let Some(i) = find(&comp, b"http") {
            let mut j = i + 4;
            if comp.get(j) == Some(&b's') {
                j += 1;
            }
            if comp[j..].starts_with(b"://") {
                return String::from_utf8_lossy(&comp[i..]).into_owned();
            }
        }

        if let Some(i) = comp.iter().position(|&b| b == b'/') {
            return String::from_utf8_lossy(&comp[i..]).into_owned();
        }

        // '*' is the least common form, so check it last.
        if comp.contains(&b'*') {
            return "*".to_string();
        }
    }

    String::new()
}

/// True if `p` matches the origin, absolute, or asterisk request-target
/// form of RFC 7230 section 5.3. The authority form is not checked.
fn is_valid_path(p: &[u8]) -> bool {
    if p.is_empty() {
        return false;
    }
    if p[0] == b'/' {
        // origin-form
        return true;
    }
    if p.len() > 8 {
        // absolute-form
        let prefix = p[..8].to_ascii_lowercase();
        if prefix.starts_with(b"http://") || prefix == *b"https://" {
            return true;
        }
    }

    p == b"*" // asterisk-form
}

/// True if `v` is an HTTP/1.x version token.
fn is_version_1x(v: &str) -> bool {
    matches!(v, "HTTP/1.0" | "HTTP/1.1" | "http/1.0" | "http/1.1")
}

/// Clean a header line: split at the first `:`, remove invalid characters
/// from the name and value, and canonicalize the name. The host value is
/// cleaned against the RFC 3986 host table; other values are trimmed and
/// stripped of control characters, keeping HTAB. Whether the value starts
/// with exactly one separating space is preserved.
fn clean_header(h: &[u8]) -> Result<Vec<u8>> {
    let colon = h.iter().position(|&b| b == b':').ok_or_else(|| {
        Error::malformed(format!("invalid header: {:?}", String::from_utf8_lossy(h)))
    })?;
    let (name, value) = (&h[..colon], &h[colon + 1..]);

    let name = tables::clean(name, tables::is_tchar);
    let has_sep_ows = value.first() == Some(&b' ');
    let value = if has_sep_ows { &value[1..] } else { value };

    let cname = canonical_header_name(&name);
    let value = if cname == "Host" {
        tables::clean(value, tables::is_host_char)
    } else {
        tables::clean(trim_ows(value), tables::is_header_value_char)
    };

    let mut out = Vec::with_capacity(cname.len() + 2 + value.len());
    out.extend_from_slice(cname.as_bytes());
    out.push(b':');
    if has_sep_ows {
        out.push(b' ');
    }
    out.extend_from_slice(&value);
    Ok(out)
}

/// Canonical MIME capitalization of a header name: the first letter and
/// every letter following a `-` upper case, everything else lower case.
/// The name must already be cleaned to token characters.
pub(crate) fn canonical_header_name(name: &[u8]) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for &b in name {
        let b = if upper {
            b.to_ascii_uppercase()
        } else {
            b.to_ascii_lowercase()
        };
        upper = b == b'-';
        out.push(b as char);
    }
    out
}

/// Trim OWS (SP / HTAB / CR / LF) from both ends.
fn trim_ows(s: &[u8]) -> &[u8] {
    let is_ows = |b: &u8| matches!(*b, b' ' | b'\t' | b'\r' | b'\n');
    let start = s.iter().position(|b| !is_ows(b)).unwrap_or(s.len());
    let end = s.iter().rposition(|b| !is_ows(b)).map_or(start, |i| i + 1);
    &s[start..end]
}

/// Split on CRLF; a final unterminated line is kept.
fn split_crlf(mut head: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    while let Some(i) = find(head, b"\r\n") {
        lines.push(&head[..i]);
        head = &head[i + 2..];
    }
    if !head.is_empty() {
        lines.push(head);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_header() {
        let tests = [
            ("cleaned", "Host: example.com", "Host: example.com"),
            ("name: extra whitespace", " Host: example.com", "Host: example.com"),
            ("invalid host chars", "Host: e>xample.com", "Host: example.com"),
            (
                "value: non-printable chars",
                "Content-Type: \x10text/html; charset=utf-8",
                "Content-Type: text/html; charset=utf-8",
            ),
            (
                "name: invalid chars",
                "C>ontent-Type: text/html; charset=utf-8",
                "Content-Type: text/html; charset=utf-8",
            ),
            ("name: canonicalized", "content-length: 9", "Content-Length: 9"),
            ("empty value", "X-Empty:", "X-Empty:"),
        ];
        for (name, header, want) in tests {
            let got = clean_header(header.as_bytes()).unwrap();
            assert_eq!(got, want.as_bytes(), "{name}");
        }

        assert!(clean_header(b"no colon here").is_err());
    }

    #[test]
    fn test_parse_request_line() {
        let tests: [(&str, &str, (&str, &str, &str)); 10] = [
            ("no modifications", "GET / HTTP/1.1", ("GET", "/", "HTTP/1.1")),
            (
                "absolute URI",
                " GET http://example.com HTTP/1.1",
                ("GET", "http://example.com", "HTTP/1.1"),
            ),
            ("leading whitespace", " GET / HTTP/1.1", ("GET", "/", "HTTP/1.1")),
            ("excessive whitespace", "GET  /  HTTP/1.1", ("GET", "/", "HTTP/1.1")),
            ("invalid chars", "G>ET / HTTP/<1.1", ("GET", "/", "HTTP/1.1")),
            ("duplicate method", "GET GET / HTTP/1.1", ("GET", "/", "HTTP/1.1")),
            (
                "duplicate version",
                "GET / HTTP/1.1 HTTP/1.1",
                ("GET", "/", "HTTP/1.1"),
            ),
            ("invalid method", "GETX / HTTP/1.1", ("", "/", "HTTP/1.1")),
            ("invalid version", "GET / HTTP/1.1X", ("GET", "/", "HTTP/1.1")),
            ("space in path", "GET / home HTTP/1.1", ("GET", "/", "HTTP/1.1")),
        ];
        for (name, line, want) in tests {
            let (method, path, version) = parse_request_line(line.as_bytes()).unwrap();
            assert_eq!(
                (method.as_str(), path.as_str(), version.as_str()),
                want,
                "{name}"
            );
        }

        assert!(parse_request_line(b"GET HTTP/1.1").is_err());
    }

    #[test]
    fn test_normalize_request() {
        let tests = [
            (
                "no modifications",
                "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
                "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
            ),
            (
                "invalid method, default to GET",
                "GXET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
                "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
            ),
            (
                "invalid version, default to HTTP/1.1",
                "GET  /  version\r\nHost: example.com\r\n\r\n",
                "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
            ),
            (
                "clean header",
                "GET / HTTP/1.1\r\nHost: \r example.com\r\n\r\n",
                "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
            ),
            (
                "multiple headers",
                "GET / HTTP/1.1\r\nHost: example.com\r\nA: b\r\n\r\n",
                "GET / HTTP/1.1\r\nHost: example.com\r\nA: b\r\n\r\n",
            ),
            (
                "duplicate host dropped",
                "GET / HTTP/1.1\r\nHost: example.com\r\nHost: evil.com\r\n\r\n",
                "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
            ),
            (
                "body defaults method to POST",
                "XYZ / HTTP/1.1\r\nHost: example.com\r\n\r\nsome body",
                "POST / HTTP/1.1\r\nHost: example.com\r\n\r\nsome body",
            ),
        ];
        for (name, req, want) in tests {
            let got = normalize_request(req.as_bytes()).unwrap();
            assert_eq!(String::from_utf8_lossy(&got), want, "{name}");
        }
    }

    #[test]
    fn test_normalize_errors() {
        // missing head/body separator
        assert!(normalize_request(b"GET / HTTP/1.1\r\nHost: example.com").is_err());
        // missing component
        assert!(normalize_request(b"/ HTTP/<1.1\r\nHost: example.com\r\n\r\n").is_err());
    }

    #[test]
    fn test_normalize_idempotent() {
        let reqs: [&[u8]; 3] = [
            b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
            b" G>ET  /a b HTTP/1.1\r\nHost: ex>ample.com\r\n\r\n",
            b"XYZ /\x10path HTTP/1.1X\r\ncontent-type: \x01text/html\r\n\r\nbody",
        ];
        for req in reqs {
            let once = normalize_request(req).unwrap();
            let twice = normalize_request(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name(b"host"), "Host");
        assert_eq!(canonical_header_name(b"content-length"), "Content-Length");
        assert_eq!(canonical_header_name(b"HOST"), "Host");
        assert_eq!(canonical_header_name(b"x-forwarded-for"), "X-Forwarded-For");
    }
}
