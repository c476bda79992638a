//! Client factory for strategy-applying connections
//!
//! A [`Client`] owns a parsed strategy and hands out connections that
//! transparently mutate the first request of each cycle. The strategy is
//! parsed once; construction from a bad strategy string fails permanently.

use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog;
use crate::conn::Conn;
use crate::error::{Error, Result};
use crate::strategy::Strategy;

/// A factory for connections that apply a strategy to outgoing HTTP
/// requests.
///
/// The inner strategy is shared read-only across every connection the
/// client produces, so a single client can serve many connections
/// concurrently.
#[derive(Debug, Clone)]
pub struct Client {
    strategy: Arc<Strategy>,
}

impl Client {
    /// Parse `strategy` and build a client. Returns an error if the
    /// strategy string is invalid.
    pub fn new(strategy: &str) -> Result<Self> {
        Ok(Self {
            strategy: Arc::new(Strategy::new(strategy)?),
        })
    }

    /// Build a client from the first catalog strategy for `country`,
    /// looked up case-insensitively. The first entry of each list was
    /// the most reliable at collection time.
    pub fn for_country(country: &str) -> Result<Self> {
        let strategy = catalog::strategies_for(country)
            .and_then(|list| list.first())
            .ok_or_else(|| {
                Error::InvalidRule(format!("no catalog strategies for country {country:?}"))
            })?;
        Self::new(strategy)
    }

    /// The parsed strategy this client applies.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Connect to `addr` over TCP and wrap the stream.
    pub fn connect<A: ToSocketAddrs>(&self, addr: A) -> Result<Conn<TcpStream>> {
        let stream = TcpStream::connect(addr)?;
        Ok(self.wrap(stream))
    }

    /// Connect to `addr` over TCP with a timeout and wrap the stream.
    pub fn connect_timeout(&self, addr: &SocketAddr, timeout: Duration) -> Result<Conn<TcpStream>> {
        let stream = TcpStream::connect_timeout(addr, timeout)?;
        Ok(self.wrap(stream))
    }

    /// Wrap any duplex transport in a strategy-applying connection.
    pub fn wrap<T: Write>(&self, transport: T) -> Conn<T> {
        Conn::new(transport, Arc::clone(&self.strategy))
    }
}
