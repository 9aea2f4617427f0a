//! Shared test support: a scripted transport standing in for the HTTP layer.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bytes::Bytes;
use tycoon::error::{Result, TycoonError};
use tycoon::{RawResponse, Transport};

/// Shared log of request targets issued through a [`MockTransport`]
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn targets(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Transport that replays a script of canned responses in order
pub struct MockTransport {
    script: VecDeque<RawResponse>,
    log: CallLog,
    pub closed: bool,
}

impl MockTransport {
    pub fn new(script: Vec<RawResponse>) -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                script: script.into(),
                log: log.clone(),
                closed: false,
            },
            log,
        )
    }
}

impl Transport for MockTransport {
    fn get(&mut self, target: &str) -> Result<RawResponse> {
        self.log.0.borrow_mut().push(target.to_string());
        self.script
            .pop_front()
            .ok_or_else(|| TycoonError::Protocol("mock transport script exhausted".to_string()))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// 200 response with a raw tab-separated body
pub fn ok(body: &str) -> RawResponse {
    RawResponse {
        status: 200,
        content_type: Some("text/tab-separated-values".to_string()),
        body: Bytes::from(body.to_string()),
    }
}

/// 200 response with no body at all
pub fn ok_empty() -> RawResponse {
    RawResponse {
        status: 200,
        content_type: Some("text/tab-separated-values".to_string()),
        body: Bytes::new(),
    }
}

/// Arbitrary-status response with a raw body (e.g. an `ERROR\t...` line)
pub fn status(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("text/tab-separated-values".to_string()),
        body: Bytes::from(body.to_string()),
    }
}

/// 200 response with an explicit content-type (for colenc bodies)
pub fn ok_with_content_type(content_type: &str, body: &[u8]) -> RawResponse {
    RawResponse {
        status: 200,
        content_type: Some(content_type.to_string()),
        body: Bytes::from(body.to_vec()),
    }
}
