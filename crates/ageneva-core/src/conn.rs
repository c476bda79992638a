//! Strategy-applying connection adapter
//!
//! Wraps a duplex byte stream and rewrites the first request of each
//! request/response cycle. Outbound bytes are buffered until the end of
//! the headers is visible, the strategy runs once over the buffered
//! prefix, and the body then streams through untouched while the adapter
//! counts it down via Content-Length.

use std::io::{self, Read, Write};
use std::sync::Arc;

use bytes::BytesMut;
use tracing::trace;

use crate::error::Error;
use crate::http::{find, Request, CRLF_CRLF};
use crate::strategy::Strategy;

/// A connection wrapper that applies a strategy to each HTTP request
/// written through it.
///
/// Not safe for concurrent writes: the buffer and body counter are owned
/// by a single writer. Reads pass straight through to the transport.
#[derive(Debug)]
pub struct Conn<T> {
    inner: T,
    strategy: Arc<Strategy>,
    /// Request bytes accumulated until the headers are complete.
    buf: BytesMut,
    /// Body bytes still to forward before the next request begins.
    remaining: u64,
    /// True once the current request's headers were seen and flushed.
    headers_seen: bool,
}

impl<T> Conn<T> {
    /// Wrap `inner`, applying `strategy` to requests written to it.
    pub fn new(inner: T, strategy: Arc<Strategy>) -> Self {
        Self {
            inner,
            strategy,
            buf: BytesMut::new(),
            remaining: 0,
            headers_seen: false,
        }
    }

    /// A reference to the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// A mutable reference to the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap into the underlying transport, discarding buffered bytes.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Reset for the next request on the same connection. Buffered bytes
    /// are discarded, so an aborted request never emits a partial
    /// mutation.
    fn reset(&mut self) {
        self.buf.clear();
        self.remaining = 0;
        self.headers_seen = false;
    }
}

impl<T: Write> Conn<T> {
    fn write_buffered(&mut self, p: &[u8]) -> io::Result<usize> {
        // The strategy cannot run until all the headers are here, so
        // buffer until the end-of-headers marker shows up.
        self.buf.extend_from_slice(p);
        if find(&self.buf, CRLF_CRLF).is_none() {
            return Ok(p.len());
        }

        let mut req = Request::parse(&self.buf).map_err(io::Error::from)?;

        // The body length decides when this request ends and the adapter
        // must re-arm for the next one. Without it the request cannot be
        // framed; chunked transfer encoding is not supported.
        let content_length = req
            .content_length()
            .ok_or(Error::MissingContentLength)
            .map_err(io::Error::from)?;

        self.strategy.apply(&mut req);
        let mutated = req.to_bytes();
        self.inner.write_all(&mutated)?;
        trace!(len = mutated.len(), "flushed mutated request head");

        // Part of the body may already have arrived with the headers.
        self.remaining = content_length.saturating_sub(req.body().len() as u64);
        self.headers_seen = true;
        Ok(p.len())
    }

    fn write_inner(&mut self, p: &[u8]) -> io::Result<usize> {
        if !self.headers_seen {
            return self.write_buffered(p);
        }

        let n = self.inner.write(p)?;
        self.remaining = self.remaining.saturating_sub(n as u64);
        Ok(n)
    }
}

impl<T: Read> Read for Conn<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: Write> Write for Conn<T> {
    /// Buffer or forward `p`, applying the strategy at the transition.
    ///
    /// While buffering, the return value reports the full input as
    /// accepted even though nothing reached the transport yet; the
    /// caller's contract is byte-stream append. Any error resets the
    /// adapter so the connection is usable for a fresh request.
    fn write(&mut self, p: &[u8]) -> io::Result<usize> {
        match self.write_inner(p) {
            Ok(n) => {
                if self.headers_seen && self.remaining == 0 {
                    self.reset();
                }
                Ok(n)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
