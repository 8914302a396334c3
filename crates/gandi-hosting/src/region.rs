//! Regions (datacenters)

use crate::error::{HostingError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A Gandi datacenter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    /// Datacenter code, e.g. "FR-SD3"
    pub name: String,
    pub country: String,
}

/// Read-only access to the datacenters offered by the platform
#[async_trait]
pub trait RegionManager: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<Region>>;

    /// Returns the region whose datacenter code is `code`
    async fn region_by_code(&self, code: &str) -> Result<Region>;
}

/// Enforces the region consistency invariant between two resources.
///
/// Must run before anything is sent: a mismatch is a precondition failure.
pub fn ensure_same_region(
    operation: &'static str,
    left: (&'static str, &str),
    right: (&'static str, &str),
) -> Result<()> {
    if left.1 != right.1 {
        return Err(HostingError::RegionMismatch {
            operation,
            left: left.0,
            left_region: left.1.to_string(),
            right: right.0,
            right_region: right.1.to_string(),
        });
    }
    Ok(())
}
