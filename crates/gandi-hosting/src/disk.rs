//! Disks

use crate::error::Result;
use crate::image::DiskImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// State given locally to a resource once its deletion has completed
pub const DELETED_STATE: &str = "deleted";

/// A Gandi disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub id: String,
    pub name: String,
    /// Size in GiB
    pub size: u64,
    pub region_id: String,
    pub state: String,
    pub disk_type: String,
    /// IDs of the VMs the disk is attached to
    pub vm_ids: Vec<String>,
    pub boot_disk: bool,
}

/// Parameters to create a new disk
///
/// `region_id` is the only mandatory field. Empty or zero fields are left
/// for the platform to default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpec {
    pub region_id: String,
    pub name: String,
    /// Size in GiB
    pub size: u64,
}

/// Criteria to search disks; unset fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskFilter {
    pub id: String,
    pub region_id: String,
    pub name: String,
    pub vm_id: String,
}

#[async_trait]
pub trait DiskManager: Send + Sync {
    async fn create_disk(&self, spec: &DiskSpec) -> Result<Disk>;

    /// Creates a disk cloned from `image`; both must be in the same region
    async fn create_disk_from_image(&self, spec: &DiskSpec, image: &DiskImage) -> Result<Disk>;

    async fn list_disks(&self, filter: &DiskFilter) -> Result<Vec<Disk>>;

    async fn list_all_disks(&self) -> Result<Vec<Disk>> {
        self.list_disks(&DiskFilter::default()).await
    }

    async fn disk_from_name(&self, name: &str) -> Result<Disk>;

    /// Deletes the disk and returns the caller's view marked as deleted
    async fn delete_disk(&self, disk: &Disk) -> Result<Disk>;

    /// Grows the disk by `size` GiB
    async fn extend_disk(&self, disk: &Disk, size: u64) -> Result<Disk>;

    async fn rename_disk(&self, disk: &Disk, name: &str) -> Result<Disk>;
}
