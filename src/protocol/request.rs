//! Request target builder
//!
//! Renders `/rpc/<command>?<query>` from a command descriptor and a parameter
//! set. Required parameters are validated here, before any network I/O, so a
//! missing argument never costs a round trip.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Result, TycoonError};

use super::command::CommandSpec;
use super::params::Params;

/// Query component escape set: keep unreserved characters, escape the rest.
/// Space encodes as `%20`, tabs and newlines always escape, so key/value
/// payloads round-trip bit-for-bit.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one query component
pub fn escape(component: &str) -> String {
    utf8_percent_encode(component, QUERY).to_string()
}

/// Validate that every declared required parameter is present
pub fn check_required(spec: &'static CommandSpec, params: &Params) -> Result<()> {
    for &param in spec.required {
        if !params.contains(param) {
            return Err(TycoonError::RequiredArgument {
                command: spec.name,
                param,
            });
        }
    }
    Ok(())
}

/// Build the request target for a command.
///
/// Fails with [`TycoonError::RequiredArgument`] if a declared required
/// parameter is absent; this is a pure client-side check with zero side
/// effects. An empty parameter set builds a bare `/rpc/<name>` path.
pub fn build_target(spec: &'static CommandSpec, params: &Params) -> Result<String> {
    check_required(spec, params)?;

    if params.is_empty() {
        return Ok(format!("/rpc/{}", spec.name));
    }

    let mut target = format!("/rpc/{}?", spec.name);
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            target.push('&');
        }
        target.push_str(&escape(key));
        target.push('=');
        target.push_str(&escape(value));
    }
    Ok(target)
}
