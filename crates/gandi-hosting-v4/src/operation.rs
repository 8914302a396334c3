//! Operation poller
//!
//! Every mutating v4 call returns operations, handles on remote jobs that
//! move through WAIT, RUN and BILL before reaching DONE. Any other status
//! is a failure.

use crate::rpc::Caller;
use crate::wire::{Operation, OperationInfo, decode};
use gandi_hosting::{HostingError, Result};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

pub const OPERATION_INFO: &str = "operation.info";

/// Status reported by `operation.info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Wait,
    Run,
    Bill,
    Done,
    /// Any status outside the known set, including ERROR
    Failed(String),
}

impl OperationStatus {
    pub fn parse(step: &str) -> Self {
        match step {
            "WAIT" => OperationStatus::Wait,
            "RUN" => OperationStatus::Run,
            "BILL" => OperationStatus::Bill,
            "DONE" => OperationStatus::Done,
            other => OperationStatus::Failed(other.to_string()),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OperationStatus::Wait | OperationStatus::Run | OperationStatus::Bill
        )
    }
}

/// Polling behaviour
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between two status queries
    pub interval: Duration,
    /// Give up after this long; `None` waits forever
    pub timeout: Option<Duration>,
    /// Stops every poll sharing this token, including queries in flight.
    ///
    /// A client keeps its token for its whole life: once cancelled, every
    /// later wait on that client fails with `Cancelled`. Give a client
    /// a `child_token()` of an application-wide token to stop one client
    /// without touching the others.
    pub cancel: CancellationToken,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            timeout: Some(Self::DEFAULT_TIMEOUT),
            cancel: CancellationToken::new(),
        }
    }
}

/// Waits until `op` reaches DONE.
///
/// The first query is sent immediately. A transport failure on any query
/// is returned as is, without another attempt. The deadline and the
/// cancellation token bound the status queries as well as the sleeps
/// between them.
pub async fn await_completion<C: Caller + ?Sized>(
    caller: &C,
    config: &PollConfig,
    op: &Operation,
) -> Result<()> {
    let started = Instant::now();
    let deadline = config.timeout.map(|timeout| started + timeout);
    let mut last_step = op.step.clone();
    let mut queries = 0_u32;

    loop {
        queries += 1;
        let reply = tokio::select! {
            biased;
            _ = config.cancel.cancelled() => return Err(cancelled(op)),
            _ = expiry(deadline) => return Err(timed_out(op, last_step, started)),
            reply = caller.send(OPERATION_INFO, vec![Value::from(op.id)]) => reply?,
        };
        let info: OperationInfo = decode(OPERATION_INFO, reply)?;
        let status = OperationStatus::parse(&info.step);

        tracing::debug!(op_id = op.id, step = %info.step, queries, "operation status");

        match status {
            OperationStatus::Done => return Ok(()),
            OperationStatus::Failed(status) => {
                return Err(HostingError::OperationFailed {
                    op_id: op.id,
                    status,
                });
            }
            _ => last_step = info.step,
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(timed_out(op, last_step, started));
        }

        tokio::select! {
            biased;
            _ = config.cancel.cancelled() => return Err(cancelled(op)),
            _ = expiry(deadline) => return Err(timed_out(op, last_step, started)),
            _ = sleep(config.interval) => {}
        }
    }
}

/// Resolves at `deadline`, never without one
async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn cancelled(op: &Operation) -> HostingError {
    tracing::info!(op_id = op.id, "stopped waiting for operation");
    HostingError::Cancelled { op_id: op.id }
}

fn timed_out(op: &Operation, status: String, started: Instant) -> HostingError {
    HostingError::OperationTimeout {
        op_id: op.id,
        status,
        waited: started.elapsed(),
    }
}

/// The operation to wait for among those returned by one call: the last
/// one, since the platform completes them in order
pub fn last_operation(method: &str, ops: &[Operation]) -> Result<Operation> {
    ops.last()
        .cloned()
        .ok_or_else(|| HostingError::parse(format!("{method} response"), "no operation returned"))
}
