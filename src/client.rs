//! RPC client
//!
//! [`Tycoon`] orchestrates one call end to end: pre-flight validation and
//! request building, one GET through the transport, status classification
//! against the command table, and colenc-driven body decoding. Every command
//! goes through the same private pipeline; the public methods are thin,
//! protocol-named wrappers.
//!
//! The client is strictly synchronous and holds exactly one transport
//! connection; `&mut self` on every operation is what enforces the
//! one-in-flight-call rule. Independent stores mean independent clients.

use crate::config::Config;
use crate::cursor::Cursor;
use crate::error::{Result, TycoonError};
use crate::network::{HttpTransport, Transport};
use crate::protocol::{
    build_target, check_required, decode_body, lookup, parse_colenc, Classification, ColEnc,
    CommandSpec, Params,
};

/// Client for one Tycoon server connection
pub struct Tycoon<T: Transport = HttpTransport> {
    transport: T,
    closed: bool,
}

impl Tycoon<HttpTransport> {
    /// Open a connection to the configured server
    pub fn open(config: &Config) -> Result<Self> {
        let transport = HttpTransport::connect(config)?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> Tycoon<T> {
    /// Wrap an already-established transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            closed: false,
        }
    }

    /// Release the connection. Idempotent; any operation afterwards fails
    /// with [`TycoonError::Closed`].
    pub fn close(&mut self) {
        if !self.closed {
            self.transport.close();
            self.closed = true;
        }
    }

    /// Whether [`Tycoon::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Invoke a command by protocol name.
    ///
    /// The typed per-command methods below are preferred; this exists for
    /// callers driving the protocol generically.
    pub fn invoke(&mut self, command: &str, params: Params) -> Result<Option<Params>> {
        let spec = lookup(command)?;
        self.call(spec, params)
    }

    /// The uniform call pipeline.
    ///
    /// Validation happens before any I/O; the transport drains the body on
    /// every path, so by the time classification runs the connection is
    /// already reusable. Error bodies still get decoded so the server's
    /// `ERROR` text rides along on the returned error.
    fn call(&mut self, spec: &'static CommandSpec, params: Params) -> Result<Option<Params>> {
        self.call_as(spec, spec, params)
    }

    /// Like [`Self::call`] but issuing the request for `wire`'s path while
    /// classifying under `spec`'s table. Only `cur_delete` needs the split:
    /// it goes out as `/rpc/cur_remove` (observed server-compatible behavior).
    fn call_as(
        &mut self,
        spec: &'static CommandSpec,
        wire: &'static CommandSpec,
        params: Params,
    ) -> Result<Option<Params>> {
        if self.closed {
            return Err(TycoonError::Closed);
        }

        // Required-parameter check against the logical command, zero I/O on
        // failure. The target is rendered from the wire command's path.
        check_required(spec, &params)?;
        let target = build_target(wire, &params)?;
        tracing::trace!(command = spec.name, url = %target, "rpc request");

        let response = self.transport.get(&target).map_err(|e| match e {
            TycoonError::Io(source) => TycoonError::Transport {
                command: spec.name,
                source,
            },
            other => other,
        })?;

        let colenc = response
            .content_type
            .as_deref()
            .map(parse_colenc)
            .unwrap_or(ColEnc::Raw);

        tracing::trace!(command = spec.name, status = response.status, "rpc response");

        match spec.classify(response.status) {
            Classification::Success => decode_body(colenc, &response.body),
            Classification::Error(kind) => Err(TycoonError::Rpc {
                kind,
                command: spec.name,
                status: response.status,
                message: server_error_text(colenc, &response.body),
            }),
            Classification::Unexpected => Err(TycoonError::UnexpectedStatus {
                command: spec.name,
                status: response.status,
                message: server_error_text(colenc, &response.body),
            }),
        }
    }

    // =========================================================================
    // Server-wide commands
    // =========================================================================

    /// `/rpc/echo`: echo the input records back, for testing
    pub fn echo(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("echo")?, params)
    }

    /// `/rpc/report`: server information report
    pub fn report(&mut self) -> Result<Option<Params>> {
        self.call(lookup("report")?, Params::new())
    }

    /// `/rpc/play_script`: call a server-side scripting procedure.
    /// Requires `name`; `_`-prefixed keys are passed as script records.
    pub fn play_script(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("play_script")?, params)
    }

    /// `/rpc/status`: record count and database size; `DB` selects the database
    pub fn status(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("status")?, params)
    }

    /// `/rpc/clear`: remove all records in a database
    pub fn clear(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("clear")?, params)
    }

    /// `/rpc/synchronize`: flush updates to the device; optional `hard` and
    /// postprocessing `command`
    pub fn synchronize(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("synchronize")?, params)
    }

    /// `/rpc/vacuum`: eliminate regions of expired records; optional `step`
    pub fn vacuum(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("vacuum")?, params)
    }

    // =========================================================================
    // Record commands
    // =========================================================================

    /// `/rpc/set`: set a record. Requires `key` and `value`; optional `DB`
    /// and `xt` (expiration from now in seconds, negative meaning absolute
    /// epoch time, passed through unmodified).
    pub fn set(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("set")?, params)
    }

    /// `/rpc/add`: add a record; an existing record is a
    /// [`crate::ErrorKind::RecordExists`] failure
    pub fn add(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("add")?, params)
    }

    /// `/rpc/replace`: replace an existing record's value
    pub fn replace(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("replace")?, params)
    }

    /// `/rpc/append`: append to a record's value
    pub fn append(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("append")?, params)
    }

    /// `/rpc/increment`: add `num` to an integer record; result under `num`
    pub fn increment(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("increment")?, params)
    }

    /// `/rpc/increment_double`: add `num` to a double record; result under `num`
    pub fn increment_double(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("increment_double")?, params)
    }

    /// `/rpc/cas`: compare-and-swap. Requires `key`; omitted `oval` asserts
    /// no prior record, omitted `nval` removes the record on match.
    pub fn cas(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cas")?, params)
    }

    /// `/rpc/remove`: remove a record by `key`
    pub fn remove(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("remove")?, params)
    }

    /// `/rpc/get`: retrieve a record by `key`; value under `value`, absolute
    /// expiration under `xt` when set
    pub fn get(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("get")?, params)
    }

    // =========================================================================
    // Bulk commands
    // =========================================================================

    /// `/rpc/set_bulk`: store records at once. `_`-prefixed keys are record
    /// key/value pairs; `num` in the result counts stored records.
    pub fn set_bulk(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("set_bulk")?, params)
    }

    /// `/rpc/remove_bulk`: remove records at once; missing keys are skipped,
    /// `num` counts the removed ones
    pub fn remove_bulk(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("remove_bulk")?, params)
    }

    /// `/rpc/get_bulk`: retrieve records at once; found records come back
    /// `_`-prefixed, `num` counts them
    pub fn get_bulk(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("get_bulk")?, params)
    }

    // =========================================================================
    // Cursor commands (low level; prefer Tycoon::cursor)
    // =========================================================================

    /// `/rpc/cur_jump`: position a cursor for forward scan
    pub fn cur_jump(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_jump")?, params)
    }

    /// `/rpc/cur_jump_back`: position a cursor for backward scan; engines
    /// without reverse-scan support answer 501
    pub fn cur_jump_back(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_jump_back")?, params)
    }

    /// `/rpc/cur_step`: step to the next record
    pub fn cur_step(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_step")?, params)
    }

    /// `/rpc/cur_step_back`: step to the previous record; may answer 501
    pub fn cur_step_back(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_step_back")?, params)
    }

    /// `/rpc/cur_set_value`: set the current record's value; optional `step`
    pub fn cur_set_value(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_set_value")?, params)
    }

    /// `/rpc/cur_remove`: remove the current record
    pub fn cur_remove(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_remove")?, params)
    }

    /// `/rpc/cur_get_key`: key of the current record; optional `step`
    pub fn cur_get_key(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_get_key")?, params)
    }

    /// `/rpc/cur_get_value`: value of the current record; optional `step`
    pub fn cur_get_value(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_get_value")?, params)
    }

    /// `/rpc/cur_get`: key and value of the current record; optional `step`
    pub fn cur_get(&mut self, params: Params) -> Result<Option<Params>> {
        self.call(lookup("cur_get")?, params)
    }

    /// `/rpc/cur_delete`: release a cursor.
    ///
    /// The deployed server wiring routes this through the `cur_remove`
    /// endpoint; the request therefore goes out as `/rpc/cur_remove` while
    /// classifying as `cur_delete`. Kept bit-compatible on purpose.
    pub fn cur_delete(&mut self, params: Params) -> Result<Option<Params>> {
        self.call_as(lookup("cur_delete")?, lookup("cur_remove")?, params)
    }

    /// Create a cursor with a caller-chosen identifier over this client
    pub fn cursor(&mut self, id: impl Into<String>) -> Cursor<'_, T> {
        Cursor::new(self, id.into(), None)
    }

    /// Create a cursor bound to a specific database
    pub fn cursor_on_db(&mut self, id: impl Into<String>, db: impl Into<String>) -> Cursor<'_, T> {
        Cursor::new(self, id.into(), Some(db.into()))
    }
}

/// Pull the server's `ERROR` field out of an error-response body, if the body
/// decodes at all. Error reporting must not mask the original failure, so
/// decode problems here degrade to no message.
fn server_error_text(colenc: ColEnc, body: &[u8]) -> Option<String> {
    match decode_body(colenc, body) {
        Ok(Some(pairs)) => pairs.get("ERROR").map(str::to_string),
        _ => None,
    }
}
