//! # tycoon
//!
//! Synchronous client for the Tycoon key-value store RPC protocol: every
//! operation is an HTTP GET to `/rpc/<command>` with URL-encoded parameters,
//! answered with a tab/newline-delimited key-value body that may be base64,
//! quoted-printable, or URL encoded (signaled via a `colenc` content-type
//! parameter).
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Tycoon (client)                       │
//! │     one call pipeline shared by every command             │
//! └──────┬──────────────────┬───────────────────┬────────────┘
//!        │                  │                   │
//!        ▼                  ▼                   ▼
//! ┌─────────────┐   ┌──────────────┐   ┌───────────────────┐
//! │   request    │   │ command table │   │  colenc decoding  │
//! │ (build+esc)  │   │ (classify)    │   │ (body → pairs)    │
//! └─────────────┘   └──────────────┘   └───────────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  Transport   │  blocking HTTP/1.1 over one TcpStream
//! └─────────────┘
//! ```
//!
//! [`Cursor`] composes client calls into a stateful iterator over the store.
//!
//! ## Example
//!
//! ```no_run
//! use tycoon::{params, Config, Tycoon};
//!
//! # fn main() -> tycoon::Result<()> {
//! let mut client = Tycoon::open(&Config::default())?;
//! client.set(params! { "key" => "hello", "value" => "world" })?;
//! let record = client.get(params! { "key" => "hello" })?.unwrap();
//! assert_eq!(record.get("value"), Some("world"));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod cursor;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, TycoonError};
pub use config::Config;
pub use client::Tycoon;
pub use cursor::{Cursor, CursorRecord};
pub use network::{HttpTransport, RawResponse, Transport};
pub use protocol::Params;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the tycoon crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
