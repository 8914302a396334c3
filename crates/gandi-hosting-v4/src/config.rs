//! Client configuration

use crate::operation::PollConfig;
use crate::rpc::{ApiKeyCaller, Caller};
use gandi_hosting::{HostingError, Result};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://rpc.gandi.net/xmlrpc/";

#[derive(Debug, Clone)]
pub struct HostingConfig {
    /// Endpoint the transport should talk to
    pub api_url: String,
    pub api_key: String,
    pub poll_interval: Duration,
    /// `None` polls without deadline
    pub poll_timeout: Option<Duration>,
}

impl HostingConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            poll_interval: PollConfig::DEFAULT_INTERVAL,
            poll_timeout: Some(PollConfig::DEFAULT_TIMEOUT),
        }
    }

    /// Create HostingConfig from environment variables
    ///
    /// `GANDI_API_KEY` is required. `GANDI_API_URL`, `GANDI_POLL_INTERVAL_SECS`
    /// and `GANDI_POLL_TIMEOUT_SECS` are optional, a timeout of 0 disables it.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GANDI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| HostingError::Config("GANDI_API_KEY is not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("GANDI_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Some(secs) = secs_from_env("GANDI_POLL_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(HostingError::Config(
                    "GANDI_POLL_INTERVAL_SECS must be greater than 0".to_string(),
                ));
            }
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = secs_from_env("GANDI_POLL_TIMEOUT_SECS")? {
            config.poll_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            timeout: self.poll_timeout,
            ..PollConfig::default()
        }
    }

    /// Wraps `transport` so every call carries the API key
    pub fn authenticate<T: Caller>(&self, transport: T) -> ApiKeyCaller<T> {
        ApiKeyCaller::new(transport, self.api_key.clone())
    }
}

fn secs_from_env(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| HostingError::Config(format!("{name} is not a number of seconds: {value}"))),
        Err(_) => Ok(None),
    }
}
