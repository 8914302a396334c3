//! Disks

use crate::client::HostingV4;
use crate::convert::{disk_from_wire, total_mib};
use crate::identifiers::required_id;
use crate::params::{ParamSet, ToParams, WireField, list_args};
use crate::rpc::Caller;
use crate::wire::DiskV4;
use async_trait::async_trait;
use gandi_hosting::{
    DELETED_STATE, Disk, DiskFilter, DiskImage, DiskManager, DiskSpec, HostingError, Result,
    ensure_same_region,
};
use serde_json::Value;

impl<C: Caller> HostingV4<C> {
    pub(crate) async fn disk_from_id(&self, id: i64) -> Result<Disk> {
        let disk: DiskV4 = self.call("hosting.disk.info", vec![Value::from(id)]).await?;
        Ok(disk_from_wire(disk))
    }

    async fn update_disk(&self, operation: &'static str, disk: &Disk, update: ParamSet) -> Result<Disk> {
        let id = required_id(operation, "Disk", "ID", &disk.id)?;
        self.call_and_wait("hosting.disk.update", vec![Value::from(id), update.into_value()])
            .await?;
        self.disk_from_id(id).await
    }
}

#[async_trait]
impl<C: Caller> DiskManager for HostingV4<C> {
    async fn create_disk(&self, spec: &DiskSpec) -> Result<Disk> {
        if spec.region_id.is_empty() {
            return Err(HostingError::missing("CreateDisk", "DiskSpec", "RegionID"));
        }
        let params = spec.to_params()?;

        tracing::info!(name = %spec.name, region = %spec.region_id, "creating disk");
        let op = self
            .call_and_wait("hosting.disk.create", vec![params.into_value()])
            .await?;
        tracing::info!(name = %spec.name, id = op.disk_id, "disk created");
        self.disk_from_id(op.disk_id).await
    }

    async fn create_disk_from_image(&self, spec: &DiskSpec, image: &DiskImage) -> Result<Disk> {
        const OPERATION: &str = "CreateDiskFromImage";
        if spec.region_id.is_empty() {
            return Err(HostingError::missing(OPERATION, "DiskSpec", "RegionID"));
        }
        ensure_same_region(
            OPERATION,
            ("DiskSpec", spec.region_id.as_str()),
            ("DiskImage", image.region_id.as_str()),
        )?;
        let source = required_id(OPERATION, "DiskImage", "DiskID", &image.disk_id)?;
        let params = spec.to_params()?;

        tracing::info!(name = %spec.name, image = %image.name, "creating disk from image");
        let op = self
            .call_and_wait(
                "hosting.disk.create_from",
                vec![params.into_value(), Value::from(source)],
            )
            .await?;
        tracing::info!(name = %spec.name, id = op.disk_id, "disk created");
        self.disk_from_id(op.disk_id).await
    }

    async fn list_disks(&self, filter: &DiskFilter) -> Result<Vec<Disk>> {
        let params = filter.to_params()?;
        let disks: Vec<DiskV4> = self.call("hosting.disk.list", list_args(params)).await?;
        Ok(disks.into_iter().map(disk_from_wire).collect())
    }

    async fn disk_from_name(&self, name: &str) -> Result<Disk> {
        if name.is_empty() {
            return Err(HostingError::missing("DiskFromName", "-", "name"));
        }
        let filter = DiskFilter {
            name: name.to_string(),
            ..Default::default()
        };
        self.list_disks(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HostingError::not_found("Disk", name))
    }

    async fn delete_disk(&self, disk: &Disk) -> Result<Disk> {
        let id = required_id("DeleteDisk", "Disk", "ID", &disk.id)?;
        self.call_and_wait("hosting.disk.delete", vec![Value::from(id)])
            .await?;
        tracing::info!(id, "disk deleted");
        Ok(Disk {
            state: DELETED_STATE.to_string(),
            ..disk.clone()
        })
    }

    async fn extend_disk(&self, disk: &Disk, size: u64) -> Result<Disk> {
        if size == 0 {
            return Err(HostingError::invalid(
                "ExtendDisk",
                "Disk",
                "Size",
                "extension must be at least 1 GiB",
            ));
        }
        let mut update = ParamSet::new();
        update.insert(WireField::Size, total_mib("ExtendDisk", "Disk", disk.size, size)?);
        self.update_disk("ExtendDisk", disk, update).await
    }

    async fn rename_disk(&self, disk: &Disk, name: &str) -> Result<Disk> {
        if name.is_empty() {
            return Err(HostingError::missing("RenameDisk", "Disk", "Name"));
        }
        let mut update = ParamSet::new();
        update.insert(WireField::Name, name);
        self.update_disk("RenameDisk", disk, update).await
    }
}
