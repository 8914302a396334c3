//! Disk images

use crate::error::Result;
use crate::region::Region;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An OS image offered by Gandi, used as the source of system disks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskImage {
    pub id: String,
    /// Disk the image is cloned from; this is what creation calls reference
    pub disk_id: String,
    pub region_id: String,
    pub name: String,
    /// Size in GiB
    pub size: u64,
}

#[async_trait]
pub trait ImageManager: Send + Sync {
    /// Returns the image labelled `name` in `region`
    async fn image_by_name(&self, name: &str, region: &Region) -> Result<DiskImage>;

    async fn list_images_in_region(&self, region: &Region) -> Result<Vec<DiskImage>>;
}
