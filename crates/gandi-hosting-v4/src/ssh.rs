//! SSH keys

use crate::client::HostingV4;
use crate::convert::key_from_wire;
use crate::identifiers::required_id;
use crate::params::{ParamSet, WireField};
use crate::rpc::Caller;
use crate::wire::SshKeyV4;
use async_trait::async_trait;
use gandi_hosting::{HostingError, Result, SshKey, SshKeyManager};
use serde_json::Value;

impl<C: Caller> HostingV4<C> {
    /// Wire id of the key registered under `name`
    pub(crate) async fn key_id_from_name(&self, name: &str) -> Result<i64> {
        let mut filter = ParamSet::new();
        filter.insert(WireField::Name, name);
        let keys: Vec<SshKeyV4> = self
            .call("hosting.ssh.list", vec![filter.into_value()])
            .await?;
        keys.first()
            .map(|key| key.id)
            .ok_or_else(|| HostingError::not_found("SSHKey", name))
    }

    async fn key_from_id(&self, id: i64) -> Result<SshKey> {
        let key: SshKeyV4 = self.call("hosting.ssh.info", vec![Value::from(id)]).await?;
        Ok(key_from_wire(key))
    }
}

#[async_trait]
impl<C: Caller> SshKeyManager for HostingV4<C> {
    async fn create_key(&self, name: &str, value: &str) -> Result<SshKey> {
        if name.is_empty() {
            return Err(HostingError::missing("CreateKey", "SSHKey", "Name"));
        }
        if value.is_empty() {
            return Err(HostingError::missing("CreateKey", "SSHKey", "Value"));
        }
        let mut params = ParamSet::new();
        params.insert(WireField::Name, name).insert(WireField::Value, value);

        // Key creation is synchronous, no operation to wait for
        let created: SshKeyV4 = self
            .call("hosting.ssh.create", vec![params.into_value()])
            .await?;
        tracing::info!(name, id = created.id, "SSH key created");
        self.key_from_id(created.id).await
    }

    async fn delete_key(&self, key: &SshKey) -> Result<()> {
        let id = required_id("DeleteKey", "SSHKey", "ID", &key.id)?;
        let deleted: bool = self.call("hosting.ssh.delete", vec![Value::from(id)]).await?;
        if !deleted {
            return Err(HostingError::not_found("SSHKey", &key.id));
        }
        tracing::info!(name = %key.name, id, "SSH key deleted");
        Ok(())
    }

    async fn key_from_name(&self, name: &str) -> Result<SshKey> {
        if name.is_empty() {
            return Err(HostingError::missing("KeyFromName", "-", "name"));
        }
        let id = self.key_id_from_name(name).await?;
        self.key_from_id(id).await
    }

    async fn list_keys(&self) -> Result<Vec<SshKey>> {
        let keys: Vec<SshKeyV4> = self.call("hosting.ssh.list", Vec::new()).await?;
        Ok(keys.into_iter().map(key_from_wire).collect())
    }
}
