//! Network Module
//!
//! The transport boundary and the default blocking HTTP/1.1 implementation.
//! The RPC client only ever sees the [`Transport`] trait; one client wraps
//! exactly one transport connection.

mod http;
mod transport;

pub use http::HttpTransport;
pub use transport::{RawResponse, Transport};
