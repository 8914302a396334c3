//! Wire representations of v4 resources
//!
//! Responses are sparse: every field defaults when the platform leaves it
//! out.

use chrono::{DateTime, Utc};
use gandi_hosting::{HostingError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Handle on an asynchronous remote job
///
/// The result ids are zero until the job produced the matching resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub id: i64,
    pub vm_id: i64,
    pub disk_id: i64,
    pub iface_id: i64,
    pub ip_id: i64,
    pub step: String,
    #[serde(rename = "type")]
    pub op_type: String,
}

/// Reply of `operation.info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationInfo {
    pub id: i64,
    pub step: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmV4 {
    pub id: i64,
    pub hostname: String,
    pub datacenter_id: i64,
    pub farm: String,
    pub description: String,
    pub cores: u32,
    pub memory: u64,
    pub date_created: Option<DateTime<Utc>>,
    pub ifaces: Vec<IfaceV4>,
    pub disks: Vec<DiskV4>,
    pub state: String,
}

/// Network interface, the v4 owner of IP addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IfaceV4 {
    pub id: i64,
    pub datacenter_id: i64,
    pub vm_id: i64,
    pub ips: Vec<IpAddressV4>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpAddressV4 {
    pub id: i64,
    pub ip: String,
    pub datacenter_id: i64,
    pub version: i64,
    pub vm_id: i64,
    pub iface_id: i64,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskV4 {
    pub id: i64,
    pub name: String,
    /// Size in MiB
    pub size: u64,
    pub datacenter_id: i64,
    pub state: String,
    #[serde(rename = "type")]
    pub disk_type: String,
    pub vms_id: Vec<i64>,
    pub is_boot_disk: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlanV4 {
    pub id: i64,
    pub name: String,
    pub gateway: String,
    pub subnet: String,
    pub datacenter_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshKeyV4 {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionV4 {
    pub id: i64,
    pub dc_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskImageV4 {
    pub id: i64,
    pub disk_id: i64,
    pub datacenter_id: i64,
    pub label: String,
    /// Size in MiB
    pub size: u64,
}

/// Decodes the reply of `method`
pub fn decode<T: DeserializeOwned>(method: &str, reply: Value) -> Result<T> {
    serde_json::from_value(reply)
        .map_err(|e| HostingError::parse(format!("{method} response"), e.to_string()))
}
