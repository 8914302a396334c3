//! v4 hosting client

use crate::config::HostingConfig;
use crate::operation::{PollConfig, await_completion};
use crate::rpc::{ApiKeyCaller, Caller};
use crate::wire::{Operation, decode};
use gandi_hosting::{Hosting, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Gandi hosting through the v4 API
///
/// Holds no state besides its caller and polling settings: every operation
/// works on the values it is given.
pub struct HostingV4<C> {
    caller: C,
    poll: PollConfig,
}

impl<C: Caller> HostingV4<C> {
    pub fn new(caller: C) -> Self {
        Self::with_poll_config(caller, PollConfig::default())
    }

    pub fn with_poll_config(caller: C, poll: PollConfig) -> Self {
        Self { caller, poll }
    }

    /// Builds a client sending through `transport` with the configured key
    /// and polling settings
    pub fn from_config(config: &HostingConfig, transport: C) -> HostingV4<ApiKeyCaller<C>> {
        HostingV4::with_poll_config(config.authenticate(transport), config.poll_config())
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Sends `method` and decodes its reply
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        args: Vec<Value>,
    ) -> Result<T> {
        tracing::debug!(method, args = args.len(), "rpc call");
        let reply = self.caller.send(method, args).await?;
        decode(method, reply)
    }

    pub(crate) async fn wait(&self, op: &Operation) -> Result<()> {
        await_completion(&self.caller, &self.poll, op).await
    }

    /// Sends a call returning a single operation and waits for it
    pub(crate) async fn call_and_wait(
        &self,
        method: &'static str,
        args: Vec<Value>,
    ) -> Result<Operation> {
        let op: Operation = self.call(method, args).await?;
        self.wait(&op).await?;
        Ok(op)
    }
}

impl<C: Caller> Hosting for HostingV4<C> {
    fn api_version(&self) -> &'static str {
        "v4"
    }
}

impl<C> std::fmt::Debug for HostingV4<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostingV4")
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}
