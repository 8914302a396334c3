//! Private networks

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: String,
    pub name: String,
    pub gateway: String,
    pub subnet: String,
    pub region_id: String,
}

/// Parameters to create a private network; `region_id` and `name` are required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanSpec {
    pub name: String,
    pub gateway: String,
    pub subnet: String,
    pub region_id: String,
}

/// Criteria to list vlans; empty lists and strings are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanFilter {
    pub ids: Vec<String>,
    pub region_ids: Vec<String>,
    pub name: String,
}

#[async_trait]
pub trait VlanManager: Send + Sync {
    async fn create_vlan(&self, spec: &VlanSpec) -> Result<Vlan>;

    async fn list_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>>;

    async fn vlan_from_name(&self, name: &str) -> Result<Vlan>;

    async fn update_vlan_gateway(&self, vlan: &Vlan, gateway: &str) -> Result<Vlan>;

    async fn rename_vlan(&self, vlan: &Vlan, name: &str) -> Result<Vlan>;

    /// Fails remotely while private addresses still reference the vlan
    async fn delete_vlan(&self, vlan: &Vlan) -> Result<()>;
}
