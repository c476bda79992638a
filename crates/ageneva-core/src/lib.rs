//! # ageneva-core
//!
//! Application-layer Geneva: client-side HTTP request mutation for
//! censorship circumvention.
//!
//! Strategies written in the Geneva rule language transform an outgoing
//! HTTP/1.x request - inserting whitespace, duplicating headers, folding
//! case, replacing components - so that censoring middleboxes fail to
//! match hostnames and keywords while the origin server still parses the
//! request. The crate also ships the inverse: a permissive normalizer
//! that repairs a mutated request into strict RFC 7230 form for the
//! receiving side.
//!
//! ## Architecture
//!
//! - **Strategy language** - parser and evaluator for Geneva rules
//! - **Request model** - a minimal structural view of an HTTP request
//! - **Normalizer** - permissive recovery of method, target, version,
//!   and headers from a mutated request
//! - **Connection adapter** - wraps any duplex transport and mutates
//!   each request as it is written
//! - **Catalog** - strategy lists keyed by country
//!
//! ## Example
//!
//! ```rust,no_run
//! use ageneva_core::{catalog, Client};
//!
//! # fn main() -> ageneva_core::Result<()> {
//! let strategy = catalog::strategies_for("China").unwrap()[0];
//! let client = Client::new(strategy)?;
//!
//! let conn = client.connect("example.com:80")?;
//! // write requests through `conn` as usual; the strategy is applied
//! // transparently once the headers are complete.
//! # let _ = conn;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod check;
pub mod client;
pub mod conn;
pub mod error;
pub mod http;
pub mod strategy;

// Re-exports for convenience
pub use client::Client;
pub use conn::Conn;
pub use error::{Error, Result};
pub use http::normalize::normalize_request;
pub use http::Request;
pub use strategy::{Action, Field, Rule, Strategy, Trigger};
