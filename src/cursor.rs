//! Remote cursors
//!
//! A [`Cursor`] turns a sequence of stateless `cur_*` RPC calls into a
//! stateful forward/backward iterator over a database's records. The server
//! tracks the position; the client side holds only the caller-chosen
//! identifier, the optional database, and a validity flag.
//!
//! State machine: fresh → positioned (after a successful jump/step) →
//! invalid (terminal; the server answered 450). Jumps are allowed from any
//! state, including invalid, because a jump re-positions the cursor on the
//! server; every other operation on an invalid cursor fails locally without a
//! round trip, which is observably identical to asking the server again.
//!
//! Cursors borrow the client mutably, so a cursor can never outlive its
//! client or interleave with other calls on the same connection.

use crate::client::Tycoon;
use crate::error::{ErrorKind, Result, TycoonError};
use crate::network::Transport;
use crate::protocol::Params;

/// One record read through a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorRecord {
    pub key: String,
    pub value: String,

    /// Absolute expiration time (epoch seconds), when the record has one
    pub xt: Option<i64>,
}

/// A server-side iteration position, referenced by client-chosen identifier
pub struct Cursor<'a, T: Transport> {
    client: &'a mut Tycoon<T>,
    id: String,
    db: Option<String>,
    valid: bool,
}

impl<'a, T: Transport> Cursor<'a, T> {
    pub(crate) fn new(client: &'a mut Tycoon<T>, id: String, db: Option<String>) -> Self {
        Self {
            client,
            id,
            db,
            valid: true,
        }
    }

    /// The cursor identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the server has invalidated this cursor
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn base_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("CUR", self.id.clone());
        if let Some(db) = &self.db {
            params.insert("DB", db.clone());
        }
        params
    }

    /// Local fail-fast for operations that cannot revive an invalid cursor
    fn check_valid(&self, command: &'static str) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(TycoonError::Rpc {
                kind: ErrorKind::InvalidCursor,
                command,
                status: 450,
                message: None,
            })
        }
    }

    /// Track validity from a call outcome: any server-signaled invalid-cursor
    /// failure flips the flag; success while positioned keeps it set.
    fn track<V>(&mut self, result: Result<V>) -> Result<V> {
        match &result {
            Ok(_) => self.valid = true,
            Err(e) if e.kind() == Some(ErrorKind::InvalidCursor) => self.valid = false,
            Err(_) => {}
        }
        result
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    /// Jump to the first record, or to `key`, for forward scan
    pub fn jump(&mut self, key: Option<&str>) -> Result<()> {
        let mut params = self.base_params();
        if let Some(key) = key {
            params.insert("key", key);
        }
        let result = self.client.cur_jump(params).map(|_| ());
        self.track(result)
    }

    /// Jump to the last record, or to `key`, for backward scan.
    ///
    /// Engines without reverse-scan support answer 501, surfaced as
    /// [`ErrorKind::NotImplemented`]: a capability limitation, distinct from
    /// an invalidated cursor.
    pub fn jump_back(&mut self, key: Option<&str>) -> Result<()> {
        let mut params = self.base_params();
        if let Some(key) = key {
            params.insert("key", key);
        }
        let result = self.client.cur_jump_back(params).map(|_| ());
        self.track(result)
    }

    /// Step to the next record
    pub fn step(&mut self) -> Result<()> {
        self.check_valid("cur_step")?;
        let result = self.client.cur_step(self.base_params()).map(|_| ());
        self.track(result)
    }

    /// Step to the previous record; may be [`ErrorKind::NotImplemented`]
    pub fn step_back(&mut self) -> Result<()> {
        self.check_valid("cur_step_back")?;
        let result = self.client.cur_step_back(self.base_params()).map(|_| ());
        self.track(result)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Key of the current record; `step` advances afterwards
    pub fn get_key(&mut self, step: bool) -> Result<String> {
        self.check_valid("cur_get_key")?;
        let mut params = self.base_params();
        if step {
            params.insert("step", "1");
        }
        let result = self.client.cur_get_key(params);
        let body = self.track(result)?;
        require_field(body, "key", "cur_get_key")
    }

    /// Value of the current record; `step` advances afterwards
    pub fn get_value(&mut self, step: bool) -> Result<String> {
        self.check_valid("cur_get_value")?;
        let mut params = self.base_params();
        if step {
            params.insert("step", "1");
        }
        let result = self.client.cur_get_value(params);
        let body = self.track(result)?;
        require_field(body, "value", "cur_get_value")
    }

    /// Key and value (and expiration, when set) of the current record;
    /// `step` advances afterwards
    pub fn get(&mut self, step: bool) -> Result<CursorRecord> {
        self.check_valid("cur_get")?;
        let mut params = self.base_params();
        if step {
            params.insert("step", "1");
        }
        let result = self.client.cur_get(params);
        let body = self.track(result)?;
        let body = body
            .ok_or_else(|| TycoonError::Protocol("cur_get: response carried no body".to_string()))?;
        let key = body
            .get("key")
            .ok_or_else(|| TycoonError::Protocol("cur_get: response missing `key`".to_string()))?
            .to_string();
        let value = body
            .get("value")
            .ok_or_else(|| TycoonError::Protocol("cur_get: response missing `value`".to_string()))?
            .to_string();
        let xt = body.get("xt").and_then(|s| s.parse().ok());
        Ok(CursorRecord { key, value, xt })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Set the value of the current record. `step` advances afterwards; `xt`
    /// is the expiration from now in seconds, passed through unmodified.
    pub fn set_value(&mut self, value: &str, step: bool, xt: Option<i64>) -> Result<()> {
        self.check_valid("cur_set_value")?;
        let mut params = self.base_params();
        params.insert("value", value);
        if step {
            params.insert("step", "1");
        }
        if let Some(xt) = xt {
            params.insert("xt", xt.to_string());
        }
        let result = self.client.cur_set_value(params).map(|_| ());
        self.track(result)
    }

    /// Remove the current record
    pub fn remove(&mut self) -> Result<()> {
        self.check_valid("cur_remove")?;
        let result = self.client.cur_remove(self.base_params()).map(|_| ());
        self.track(result)
    }

    /// Release the cursor identifier for reuse.
    ///
    /// On the wire this is the `cur_delete` command, which the deployed
    /// server routes through the `cur_remove` endpoint (see
    /// [`Tycoon::cur_delete`]). The local handle is unusable afterwards
    /// except through a fresh jump.
    pub fn delete(&mut self) -> Result<()> {
        self.check_valid("cur_delete")?;
        let result = self.client.cur_delete(self.base_params()).map(|_| ());
        let result = self.track(result);
        if result.is_ok() {
            self.valid = false;
        }
        result
    }
}

fn require_field(body: Option<Params>, field: &str, command: &str) -> Result<String> {
    body.as_ref()
        .and_then(|b| b.get(field))
        .map(str::to_string)
        .ok_or_else(|| {
            TycoonError::Protocol(format!("{}: response missing `{}`", command, field))
        })
}
