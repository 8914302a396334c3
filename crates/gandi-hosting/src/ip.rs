//! IP addresses
//!
//! The platform attaches addresses to VMs through network interfaces. The
//! domain model hides interfaces: callers only handle addresses.

use crate::error::{HostingError, Result};
use crate::region::Region;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Bandwidth an interface is created with, so it doesn't default to 1Mbps
pub const DEFAULT_BANDWIDTH: f64 = 102400.0;

/// IP protocol version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    #[default]
    V4,
    V6,
}

impl IpVersion {
    /// Integer used by the wire protocol
    pub fn as_i64(self) -> i64 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }
}

impl TryFrom<i64> for IpVersion {
    type Error = HostingError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            4 => Ok(IpVersion::V4),
            6 => Ok(IpVersion::V6),
            other => Err(HostingError::invalid(
                "_conversion",
                "IPAddress",
                "Version",
                format!("unknown IP version {other}"),
            )),
        }
    }
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

/// A Gandi IP address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: String,
    pub ip: String,
    pub region_id: String,
    pub version: IpVersion,
    /// ID of the VM owning the address, empty when unattached
    pub vm_id: String,
    pub state: String,
}

/// Criteria to search addresses; unset fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpFilter {
    pub id: String,
    pub region_id: String,
    pub version: Option<IpVersion>,
    pub ip: String,
}

#[async_trait]
pub trait IpManager: Send + Sync {
    async fn create_ip(&self, region: &Region, version: IpVersion) -> Result<IpAddress>;

    async fn list_ips(&self, filter: &IpFilter) -> Result<Vec<IpAddress>>;

    /// Releases the address and returns the caller's view marked as deleted
    async fn delete_ip(&self, ip: &IpAddress) -> Result<IpAddress>;
}
