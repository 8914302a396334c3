//! Virtual machines

use crate::disk::Disk;
use crate::error::Result;
use crate::image::DiskImage;
use crate::ip::{IpAddress, IpVersion};
use crate::workflow::WorkflowResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Gandi virtual machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub id: String,
    pub hostname: String,
    pub region_id: String,
    pub farm: String,
    pub description: String,
    pub cores: u32,
    /// Memory in MiB
    pub memory: u64,
    pub date_created: Option<DateTime<Utc>>,
    /// Addresses of every interface, in interface order
    pub ips: Vec<IpAddress>,
    /// Attached disks, boot disk first
    pub disks: Vec<Disk>,
    /// Names of the SSH keys the VM was created with.
    ///
    /// The platform never reports them back, so only views returned by a
    /// creation call carry them.
    pub ssh_keys: Vec<String>,
    pub state: String,
}

/// Parameters to create a VM
///
/// `region_id` is mandatory. Empty or zero fields are left for the
/// platform to default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSpec {
    pub region_id: String,
    pub hostname: String,
    pub farm: String,
    /// Memory in MiB
    pub memory: u64,
    pub cores: u32,
    /// Names of SSH keys already registered on the platform
    pub ssh_keys: Vec<String>,
    pub login: String,
    pub password: String,
}

/// Criteria to search VMs; unset fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmFilter {
    pub region_id: String,
    pub farm: String,
    pub hostname: String,
    pub id: String,
    pub state: String,
}

/// The three resources a VM creation leaves behind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmCreation {
    pub vm: Vm,
    /// First address of the new VM
    pub ip: IpAddress,
    /// System disk of the new VM
    pub disk: Disk,
}

#[async_trait]
pub trait VmManager: Send + Sync {
    /// Creates a VM together with a new system disk cloned from `image`
    /// and a new address of `version`. `disk_size` is in GiB, 0 keeps the
    /// image size.
    async fn create_vm(
        &self,
        spec: &VmSpec,
        image: &DiskImage,
        version: IpVersion,
        disk_size: u64,
    ) -> WorkflowResult<VmCreation>;

    /// Creates a VM with a new system disk on an address that already exists
    async fn create_vm_with_existing_ip(
        &self,
        spec: &VmSpec,
        image: &DiskImage,
        ip: &IpAddress,
        disk_size: u64,
    ) -> WorkflowResult<VmCreation>;

    /// Creates a VM booting from an existing disk, with a new address
    async fn create_vm_with_existing_disk(
        &self,
        spec: &VmSpec,
        version: IpVersion,
        disk: &Disk,
    ) -> WorkflowResult<VmCreation>;

    async fn create_vm_with_existing_disk_and_ip(
        &self,
        spec: &VmSpec,
        ip: &IpAddress,
        disk: &Disk,
    ) -> WorkflowResult<VmCreation>;

    async fn attach_disk(&self, vm: &Vm, disk: &Disk) -> Result<(Vm, Disk)>;

    /// Attaches `disk` at slot `position` among the VM's disks, swapping
    /// out whatever was there
    async fn attach_disk_at_position(
        &self,
        vm: &Vm,
        disk: &Disk,
        position: u32,
    ) -> Result<(Vm, Disk)>;

    /// Fails remotely for a boot disk
    async fn detach_disk(&self, vm: &Vm, disk: &Disk) -> Result<(Vm, Disk)>;

    async fn attach_ip(&self, vm: &Vm, ip: &IpAddress) -> Result<(Vm, IpAddress)>;

    /// Frees the address so it can be attached to another VM
    async fn detach_ip(&self, vm: &Vm, ip: &IpAddress) -> Result<(Vm, IpAddress)>;

    async fn start_vm(&self, vm: &Vm) -> Result<()>;

    async fn stop_vm(&self, vm: &Vm) -> Result<()>;

    async fn reboot_vm(&self, vm: &Vm) -> Result<()>;

    /// Deletes the VM and returns the caller's view marked as deleted
    async fn delete_vm(&self, vm: &Vm) -> Result<Vm>;

    async fn list_vms(&self, filter: &VmFilter) -> Result<Vec<Vm>>;

    async fn list_all_vms(&self) -> Result<Vec<Vm>> {
        self.list_vms(&VmFilter::default()).await
    }

    async fn vm_from_name(&self, name: &str) -> Result<Vm>;

    /// Memory in MiB, may be lower than the current value
    async fn update_vm_memory(&self, vm: &Vm, memory: u64) -> Result<Vm>;

    async fn update_vm_cores(&self, vm: &Vm, cores: u32) -> Result<Vm>;

    async fn rename_vm(&self, vm: &Vm, hostname: &str) -> Result<Vm>;
}
