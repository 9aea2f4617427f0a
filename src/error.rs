//! Error types for the Tycoon client
//!
//! Provides a unified error type for all operations. Domain failures the
//! server signals with status 450/501 are a closed [`ErrorKind`] set carried
//! inside [`TycoonError::Rpc`] together with the command name, the status
//! code, and the server's `ERROR` message when one was returned.

use thiserror::Error;

/// Result type alias using TycoonError
pub type Result<T> = std::result::Result<T, TycoonError>;

/// Domain-specific failure kinds mapped from status 450/501 per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arbitrary logical error from a server-side script (`play_script`)
    Logical,

    /// Postprocessing command failed (`synchronize`)
    CommandFailed,

    /// An existing record was detected (`add`)
    RecordExists,

    /// No corresponding record was found (`replace`, `remove`, `get`)
    RecordNotExists,

    /// The existing record was not numerically compatible (`increment` family)
    NotCompatible,

    /// The old-value assumption failed (`cas`)
    AssumptionFailed,

    /// The cursor is invalidated (all `cur_*` operations)
    InvalidCursor,

    /// The backing engine has no support for the operation (backward cursor ops)
    NotImplemented,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Logical => "logical error",
            ErrorKind::CommandFailed => "command failed",
            ErrorKind::RecordExists => "record exists",
            ErrorKind::RecordNotExists => "record not found",
            ErrorKind::NotCompatible => "record not compatible",
            ErrorKind::AssumptionFailed => "assumption failed",
            ErrorKind::InvalidCursor => "invalid cursor",
            ErrorKind::NotImplemented => "not implemented",
        };
        f.write_str(s)
    }
}

/// Unified error type for Tycoon client operations
#[derive(Debug, Error)]
pub enum TycoonError {
    // -------------------------------------------------------------------------
    // Client-side, pre-flight
    // -------------------------------------------------------------------------
    #[error("{command}: required parameter `{param}` is missing")]
    RequiredArgument {
        command: &'static str,
        param: &'static str,
    },

    #[error("client is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Server-signaled outcomes
    // -------------------------------------------------------------------------
    #[error("{command}: {kind} (status {status}){msg}", msg = fmt_server_message(.message))]
    Rpc {
        kind: ErrorKind,
        command: &'static str,
        status: u16,
        message: Option<String>,
    },

    #[error("{command}: unexpected status {status}{msg}", msg = fmt_server_message(.message))]
    UnexpectedStatus {
        command: &'static str,
        status: u16,
        message: Option<String>,
    },

    // -------------------------------------------------------------------------
    // Transport and wire faults
    // -------------------------------------------------------------------------
    #[error("{command}: transport error: {source}")]
    Transport {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("body decode error: {0}")]
    Decode(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TycoonError {
    /// The domain error kind, if this is a classified server failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TycoonError::Rpc { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The server-supplied `ERROR` message, if one was attached.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TycoonError::Rpc { message, .. } | TycoonError::UnexpectedStatus { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

fn fmt_server_message(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}
