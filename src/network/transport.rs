//! Transport boundary
//!
//! The client treats HTTP as a black box: anything that can carry a GET for a
//! path and hand back a status, a content-type, and a fully-read body will
//! do. Tests substitute a scripted transport here.

use bytes::Bytes;

use crate::error::Result;

/// A fully-read HTTP response.
///
/// `body` is the complete entity body; by the time a `RawResponse` exists the
/// underlying stream has been drained, so the connection is reusable for the
/// next call regardless of how the caller handles this response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// `content-type` header value, if the server sent one
    pub content_type: Option<String>,

    /// Complete response body
    pub body: Bytes,
}

/// Blocking request/response transport over one logical connection.
///
/// Implementations must read the entire response body before returning from
/// [`Transport::get`], on success and error statuses alike. Draining twice or
/// returning with bytes still buffered both corrupt the next call.
pub trait Transport {
    /// Issue a GET for `target` (path plus query) and return the full response
    fn get(&mut self, target: &str) -> Result<RawResponse>;

    /// Release the underlying connection. Must be idempotent.
    fn close(&mut self);
}
