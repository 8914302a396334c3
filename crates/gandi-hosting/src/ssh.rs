//! SSH keys

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: String,
    pub name: String,
    pub value: String,
    pub fingerprint: String,
}

/// SSH keys stored on the platform, referenced by name when creating VMs
#[async_trait]
pub trait SshKeyManager: Send + Sync {
    async fn create_key(&self, name: &str, value: &str) -> Result<SshKey>;

    async fn delete_key(&self, key: &SshKey) -> Result<()>;

    async fn key_from_name(&self, name: &str) -> Result<SshKey>;

    async fn list_keys(&self) -> Result<Vec<SshKey>>;
}
