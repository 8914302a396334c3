//! Scripted caller for tests
//!
//! Replies are queued in the order calls are expected. A call that does not
//! match the head of the queue is rejected with a transport error, which
//! aborts the operation under test.

use crate::rpc::Caller;
use async_trait::async_trait;
use gandi_hosting::TransportError;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// A call observed by [`MockCaller`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub args: Vec<Value>,
}

#[derive(Debug)]
struct Expectation {
    method: String,
    args: Option<Vec<Value>>,
    reply: Result<Value, TransportError>,
}

#[derive(Debug, Default)]
pub struct MockCaller {
    expected: Mutex<VecDeque<Expectation>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a call to `method` with any arguments
    pub fn expect(&self, method: &str, reply: Value) -> &Self {
        self.push(method, None, Ok(reply))
    }

    /// Expects a call to `method` with exactly `args`
    pub fn expect_with(&self, method: &str, args: Vec<Value>, reply: Value) -> &Self {
        self.push(method, Some(args), Ok(reply))
    }

    /// Expects a call to `method` that fails in the transport
    pub fn expect_err(&self, method: &str, err: TransportError) -> &Self {
        self.push(method, None, Err(err))
    }

    /// Queues one `operation.info` reply per status
    pub fn expect_statuses(&self, op_id: i64, statuses: &[&str]) -> &Self {
        for status in statuses {
            self.expect_with(
                "operation.info",
                vec![Value::from(op_id)],
                serde_json::json!({"id": op_id, "step": status}),
            );
        }
        self
    }

    fn push(
        &self,
        method: &str,
        args: Option<Vec<Value>>,
        reply: Result<Value, TransportError>,
    ) -> &Self {
        locked(&self.expected).push_back(Expectation {
            method: method.to_string(),
            args,
            reply,
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        locked(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        locked(&self.calls)
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    /// Expectations not consumed yet
    pub fn remaining(&self) -> usize {
        locked(&self.expected).len()
    }
}

#[async_trait]
impl Caller for MockCaller {
    async fn send(&self, method: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        locked(&self.calls).push(RecordedCall {
            method: method.to_string(),
            args: args.clone(),
        });

        let mut expected = locked(&self.expected);
        let Some(head) = expected.front() else {
            return Err(TransportError::Rejected(format!(
                "unexpected call to {method}"
            )));
        };
        if head.method != method {
            return Err(TransportError::Rejected(format!(
                "expected {} but got {method}",
                head.method
            )));
        }
        if let Some(want) = &head.args {
            if *want != args {
                return Err(TransportError::Rejected(format!(
                    "{method} called with {args:?}, expected {want:?}"
                )));
            }
        }
        match expected.pop_front() {
            Some(expectation) => expectation.reply,
            None => Err(TransportError::Rejected(format!(
                "unexpected call to {method}"
            ))),
        }
    }
}
