//! Protocol Module
//!
//! The Tycoon wire protocol: every operation is an HTTP GET to
//! `/rpc/<command>` with URL-encoded parameters, and the response is a
//! tab/newline-delimited key-value body.
//!
//! ## Request
//! ```text
//! GET /rpc/<command>?<k1>=<v1>&<k2>=<v2> HTTP/1.1
//! ```
//!
//! ## Response
//! ```text
//! status: 200 (success), 450 (domain failure), 501 (not implemented)
//! content-type: text/tab-separated-values[; colenc=<B|Q|U>]
//! body: one `key\tvalue` pair per line, each line transformed per colenc
//! ```
//!
//! The command table maps each command's status codes to typed outcomes;
//! statuses outside the table are protocol violations.

mod colenc;
mod command;
mod params;
mod request;

pub use colenc::{decode_body, parse_colenc, ColEnc};
pub use command::{lookup, Classification, CommandSpec, Outcome, COMMANDS};
pub use params::Params;
pub use request::{build_target, check_required, escape};
