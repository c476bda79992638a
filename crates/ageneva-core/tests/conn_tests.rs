//! Integration tests for the connection adapter
//!
//! Exercises the public Client/Conn surface against an in-memory duplex
//! transport, mirroring how a real socket would be driven.

use std::io::{self, Read, Write};

use ageneva_core::Client;

/// In-memory transport: writes land in `sent`, reads drain `responses`.
struct MockTransport {
    sent: Vec<u8>,
    responses: io::Cursor<Vec<u8>>,
    fail_writes: bool,
}

impl MockTransport {
    fn new() -> Self {
        Self {
            sent: Vec::new(),
            responses: io::Cursor::new(Vec::new()),
            fail_writes: false,
        }
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.responses.read(buf)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "transport gone"));
        }
        self.sent.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const REQ: &[u8] = b"GET /route HTTP/1.1\r\nHost: localhost\r\nContent-Length: 9\r\n\r\nsome data";
const WANT: &[u8] = b"GET /route HTTP/1.1\r\n Host: localhost\r\nContent-Length: 9\r\n\r\nsome data";

fn client() -> Client {
    Client::new("[HTTP:host:*]-insert{%20:start:name:1}-|").unwrap()
}

#[test]
fn single_write_is_mutated() {
    let mut conn = client().wrap(MockTransport::new());
    conn.write_all(REQ).unwrap();
    assert_eq!(conn.get_ref().sent, WANT);
}

#[test]
fn byte_at_a_time_writes_are_buffered() {
    let mut conn = client().wrap(MockTransport::new());
    for chunk in REQ.chunks(1) {
        conn.write_all(chunk).unwrap();
    }
    assert_eq!(conn.get_ref().sent, WANT);
}

#[test]
fn nothing_is_sent_until_headers_complete() {
    let mut conn = client().wrap(MockTransport::new());
    let head_end = REQ.windows(4).position(|w| w == b"\r\n\r\n").unwrap();

    conn.write_all(&REQ[..head_end]).unwrap();
    assert!(conn.get_ref().sent.is_empty());

    conn.write_all(&REQ[head_end..]).unwrap();
    assert_eq!(conn.get_ref().sent, WANT);
}

#[test]
fn missing_content_length_fails_without_sending() {
    let req: Vec<u8> = String::from_utf8_lossy(REQ)
        .replace("Content-Length: 9\r\n", "")
        .into_bytes();

    let mut conn = client().wrap(MockTransport::new());
    let err = conn.write_all(&req).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(conn.get_ref().sent.is_empty());

    // the adapter reset, so the connection still works for a good request
    conn.write_all(REQ).unwrap();
    assert_eq!(conn.get_ref().sent, WANT);
}

#[test]
fn transport_write_errors_surface_unchanged() {
    let mut transport = MockTransport::new();
    transport.fail_writes = true;

    let mut conn = client().wrap(transport);
    let err = conn.write_all(REQ).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn consecutive_requests_each_get_mutated() {
    let mut conn = client().wrap(MockTransport::new());
    for _ in 0..3 {
        conn.write_all(REQ).unwrap();
    }

    let mut want = Vec::new();
    for _ in 0..3 {
        want.extend_from_slice(WANT);
    }
    assert_eq!(conn.get_ref().sent, want);
}

#[test]
fn reads_pass_through() {
    let mut transport = MockTransport::new();
    transport.responses = io::Cursor::new(b"HTTP/1.1 204 No Content\r\n\r\n".to_vec());

    let mut conn = client().wrap(transport);
    let mut buf = String::new();
    conn.read_to_string(&mut buf).unwrap();
    assert_eq!(buf, "HTTP/1.1 204 No Content\r\n\r\n");
}
