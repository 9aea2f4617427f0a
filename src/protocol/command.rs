//! Command table
//!
//! Static registry of every RPC command: its required parameters and the
//! mapping from HTTP status code to a typed outcome. The table is pure data;
//! classification never inspects the status value itself beyond membership.

use crate::error::{ErrorKind, Result, TycoonError};

/// Outcome a status code maps to, per command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call succeeded; the body carries the result
    Success,

    /// A domain-specific failure
    Error(ErrorKind),
}

/// How a concrete response status classifies for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    Error(ErrorKind),
    /// Status code absent from the command's table: protocol/compatibility fault
    Unexpected,
}

/// Descriptor of one RPC command
#[derive(Debug)]
pub struct CommandSpec {
    /// Command name as it appears under `/rpc/<name>`
    pub name: &'static str,

    /// Parameter names that must be present before any network I/O
    pub required: &'static [&'static str],

    /// Accepted status codes and what each means. 200 is always Success.
    pub statuses: &'static [(u16, Outcome)],
}

impl CommandSpec {
    /// Classify a response status against this command's table
    pub fn classify(&self, status: u16) -> Classification {
        for (code, outcome) in self.statuses {
            if *code == status {
                return match outcome {
                    Outcome::Success => Classification::Success,
                    Outcome::Error(kind) => Classification::Error(*kind),
                };
            }
        }
        Classification::Unexpected
    }
}

const OK: (u16, Outcome) = (200, Outcome::Success);

const fn err(status: u16, kind: ErrorKind) -> (u16, Outcome) {
    (status, Outcome::Error(kind))
}

/// Every supported command, defined once at process start.
///
/// `cur_get_key`, `cur_get_value`, `cur_get`, and `cur_delete` require only
/// `CUR`; the `step` flag and everything else on cursor reads is optional.
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "echo", required: &[], statuses: &[OK] },
    CommandSpec { name: "report", required: &[], statuses: &[OK] },
    CommandSpec {
        name: "play_script",
        required: &["name"],
        statuses: &[OK, err(450, ErrorKind::Logical)],
    },
    CommandSpec { name: "status", required: &[], statuses: &[OK] },
    CommandSpec { name: "clear", required: &[], statuses: &[OK] },
    CommandSpec {
        name: "synchronize",
        required: &[],
        statuses: &[OK, err(450, ErrorKind::CommandFailed)],
    },
    CommandSpec { name: "set", required: &["key", "value"], statuses: &[OK] },
    CommandSpec {
        name: "add",
        required: &["key", "value"],
        statuses: &[OK, err(450, ErrorKind::RecordExists)],
    },
    CommandSpec {
        name: "replace",
        required: &["key", "value"],
        statuses: &[OK, err(450, ErrorKind::RecordNotExists)],
    },
    CommandSpec { name: "append", required: &["key", "value"], statuses: &[OK] },
    CommandSpec {
        name: "increment",
        required: &["key", "num"],
        statuses: &[OK, err(450, ErrorKind::NotCompatible)],
    },
    CommandSpec {
        name: "increment_double",
        required: &["key", "num"],
        statuses: &[OK, err(450, ErrorKind::NotCompatible)],
    },
    CommandSpec {
        name: "cas",
        required: &["key"],
        statuses: &[OK, err(450, ErrorKind::AssumptionFailed)],
    },
    CommandSpec {
        name: "remove",
        required: &["key"],
        statuses: &[OK, err(450, ErrorKind::RecordNotExists)],
    },
    CommandSpec {
        name: "get",
        required: &["key"],
        statuses: &[OK, err(450, ErrorKind::RecordNotExists)],
    },
    CommandSpec { name: "set_bulk", required: &[], statuses: &[OK] },
    CommandSpec { name: "remove_bulk", required: &[], statuses: &[OK] },
    CommandSpec { name: "get_bulk", required: &[], statuses: &[OK] },
    CommandSpec { name: "vacuum", required: &[], statuses: &[OK] },
    CommandSpec {
        name: "cur_jump",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_jump_back",
        required: &["CUR"],
        statuses: &[
            OK,
            err(450, ErrorKind::InvalidCursor),
            err(501, ErrorKind::NotImplemented),
        ],
    },
    CommandSpec {
        name: "cur_step",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_step_back",
        required: &["CUR"],
        statuses: &[
            OK,
            err(450, ErrorKind::InvalidCursor),
            err(501, ErrorKind::NotImplemented),
        ],
    },
    CommandSpec {
        name: "cur_set_value",
        required: &["CUR", "value"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_remove",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_get_key",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_get_value",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_get",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
    CommandSpec {
        name: "cur_delete",
        required: &["CUR"],
        statuses: &[OK, err(450, ErrorKind::InvalidCursor)],
    },
];

/// Look up a command descriptor by name.
///
/// An unknown name is a programming error inside this crate, not a runtime
/// condition, so it surfaces as a protocol error rather than a domain kind.
pub fn lookup(name: &str) -> Result<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| TycoonError::Protocol(format!("unknown command: {}", name)))
}
