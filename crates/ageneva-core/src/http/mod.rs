//! Minimal HTTP/1.x request model
//!
//! A deliberately thin structural view of a request: the start-line split
//! into its three components, the raw headers block, and the body bytes.
//! Header lines are neither parsed nor validated here; strategies need the
//! raw text so their edits land byte-for-byte on the wire.

pub mod normalize;
pub mod tables;

use crate::error::{Error, Result};

/// End-of-headers marker.
pub(crate) const CRLF_CRLF: &[u8] = b"\r\n\r\n";

/// A parsed HTTP/1.x request.
///
/// Only the start-line is interpreted; `headers` is the raw block between
/// the first CRLF and the blank line, without the terminating blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) version: String,
    pub(crate) headers: String,
    pub(crate) body: Vec<u8>,
}

impl Request {
    /// Parse `raw` into a request.
    ///
    /// The head must end with an empty line (`\r\n\r\n`), the start-line
    /// must split into exactly three space-separated components, and the
    /// version must be `HTTP/1.0` or `HTTP/1.1`. Anything after the empty
    /// line is taken as the body, unparsed.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let idx = find(raw, CRLF_CRLF)
            .ok_or_else(|| Error::malformed("missing header/body separator"))?;

        let head = std::str::from_utf8(&raw[..idx])
            .map_err(|_| Error::malformed("request head is not valid UTF-8"))?;
        let (start_line, headers) = match head.split_once("\r\n") {
            Some((sl, h)) => (sl, h),
            None => (head, ""),
        };

        let parts: Vec<&str> = start_line.split(' ').collect();
        if parts.len() != 3 {
            return Err(Error::malformed(format!(
                "start line must have 3 components: {start_line:?}"
            )));
        }
        if parts[2] != "HTTP/1.0" && parts[2] != "HTTP/1.1" {
            return Err(Error::malformed(format!("unsupported version: {:?}", parts[2])));
        }

        Ok(Self {
            method: parts[0].to_string(),
            path: parts[1].to_string(),
            version: parts[2].to_string(),
            headers: headers.to_string(),
            body: raw[idx + CRLF_CRLF.len()..].to_vec(),
        })
    }

    /// The request method component.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request-target component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP-version component.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The raw headers block, excluding the terminating blank line.
    pub fn headers(&self) -> &str {
        &self.headers
    }

    /// The body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serialize back into wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let head = format!(
            "{} {} {}\r\n{}\r\n\r\n",
            self.method, self.path, self.version, self.headers
        );

        let mut buf = Vec::with_capacity(head.len() + self.body.len());
        buf.extend_from_slice(head.as_bytes());
        buf.extend_from_slice(&self.body);
        buf
    }

    /// Find the raw header line whose field name matches `name`
    /// case-insensitively. Returns the whole line, name and value included.
    pub(crate) fn header_line(&self, name: &str) -> Option<&str> {
        self.headers.split("\r\n").find(|line| {
            line.split_once(':')
                .is_some_and(|(n, _)| n.eq_ignore_ascii_case(name))
        })
    }

    /// The Content-Length header value, if present and a valid unsigned
    /// integer.
    pub(crate) fn content_length(&self) -> Option<u64> {
        let line = self.header_line("content-length")?;
        let (_, value) = line.split_once(':')?;
        value.trim().parse().ok()
    }
}

/// First index of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
