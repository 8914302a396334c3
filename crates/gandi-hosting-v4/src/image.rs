//! Disk images

use crate::client::HostingV4;
use crate::convert::image_from_wire;
use crate::identifiers::required_id;
use crate::params::{ParamSet, WireField};
use crate::rpc::Caller;
use crate::wire::DiskImageV4;
use async_trait::async_trait;
use gandi_hosting::{DiskImage, HostingError, ImageManager, Region, Result};

#[async_trait]
impl<C: Caller> ImageManager for HostingV4<C> {
    async fn image_by_name(&self, name: &str, region: &Region) -> Result<DiskImage> {
        let region_id = required_id("ImageByName", "Region", "ID", &region.id)?;
        let filter = ParamSet::new()
            .with(WireField::Label, name)
            .with(WireField::DatacenterId, &region_id);
        let images: Vec<DiskImageV4> = self
            .call("hosting.image.list", vec![filter.into_value()])
            .await?;
        images
            .into_iter()
            .next()
            .map(image_from_wire)
            .ok_or_else(|| HostingError::not_found("DiskImage", name))
    }

    async fn list_images_in_region(&self, region: &Region) -> Result<Vec<DiskImage>> {
        let region_id = required_id("ListImagesInRegion", "Region", "ID", &region.id)?;
        let filter = ParamSet::new().with(WireField::DatacenterId, &region_id);
        let images: Vec<DiskImageV4> = self
            .call("hosting.image.list", vec![filter.into_value()])
            .await?;
        Ok(images.into_iter().map(image_from_wire).collect())
    }
}
