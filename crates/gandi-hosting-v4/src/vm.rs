//! Virtual machines
//!
//! VM creation is the one place where several remote resources come to
//! life in a single call: depending on what the caller already has, the
//! platform creates a system disk, an interface with its address, and the
//! VM itself. Each creation runs the same steps:
//!
//! 1. local checks (mandatory fields, identifiers, region consistency)
//! 2. SSH key names resolved to ids
//! 3. for an existing address, lookup of the interface owning it
//! 4. the creation call, returning one operation per created resource
//! 5. wait for the last operation, which the platform finishes last
//! 6. fetch of the new VM
//!
//! Nothing is rolled back on failure. The returned [`WorkflowError`] tells
//! how far the workflow went and which resources it left behind.

use crate::client::HostingV4;
use crate::convert::{gib_to_mib, vm_from_wire, vm_spec_params};
use crate::identifiers::{required_id, to_domain_id, to_wire_id};
use crate::operation::last_operation;
use crate::params::{ParamSet, ToParams, WireField, list_args};
use crate::rpc::Caller;
use crate::wire::{Operation, VmV4};
use async_trait::async_trait;
use gandi_hosting::{
    DEFAULT_BANDWIDTH, DELETED_STATE, Disk, DiskImage, HostingError, IpAddress, IpVersion,
    ResourceKind, ResourceRef, Result, Vm, VmCreation, VmFilter, VmManager, VmSpec,
    WorkflowProgress, WorkflowResult, WorkflowStep, ensure_same_region,
};
use serde_json::Value;

/// What a VM creation starts from
struct Creation<'a> {
    workflow: &'static str,
    spec: &'a VmSpec,
    /// Source of a new system disk
    image: Option<&'a DiskImage>,
    /// New system disk size in GiB, 0 keeps the image size
    disk_size: u64,
    /// Existing system disk
    disk: Option<&'a Disk>,
    /// Existing address
    ip: Option<&'a IpAddress>,
    /// Version of a new address
    version: IpVersion,
}

/// Wire ids of a creation's inputs, known valid before anything is sent
struct CheckedCreation {
    region: i64,
    disk_size_mib: u64,
    image_disk: Option<i64>,
    disk: Option<i64>,
    ip: Option<i64>,
}

impl Creation<'_> {
    fn check(&self) -> Result<CheckedCreation> {
        let workflow = self.workflow;
        if self.spec.region_id.is_empty() {
            return Err(HostingError::missing(workflow, "VMSpec", "RegionID"));
        }
        let region = to_wire_id("VMSpec", "RegionID", &self.spec.region_id)?;
        if self.spec.ssh_keys.iter().any(String::is_empty) {
            return Err(HostingError::missing(workflow, "VMSpec", "SSHKeys"));
        }
        let vm_region = ("VMSpec", self.spec.region_id.as_str());

        let disk = match self.disk {
            Some(disk) => {
                ensure_same_region(workflow, vm_region, ("Disk", disk.region_id.as_str()))?;
                Some(required_id(workflow, "Disk", "ID", &disk.id)?)
            }
            None => None,
        };
        let ip = match self.ip {
            Some(ip) => {
                ensure_same_region(workflow, vm_region, ("IPAddress", ip.region_id.as_str()))?;
                Some(required_id(workflow, "IPAddress", "ID", &ip.id)?)
            }
            None => None,
        };
        let image_disk = match self.image {
            Some(image) => {
                ensure_same_region(workflow, vm_region, ("DiskImage", image.region_id.as_str()))?;
                Some(required_id(workflow, "DiskImage", "DiskID", &image.disk_id)?)
            }
            None => None,
        };

        let disk_size_mib = gib_to_mib(workflow, "VMSpec", self.disk_size)?;

        Ok(CheckedCreation {
            region,
            disk_size_mib,
            image_disk,
            disk,
            ip,
        })
    }
}

/// Resources an operation reports as produced, minus those supplied by the caller
fn produced_by(op: &Operation, existing: &[(ResourceKind, i64)]) -> Vec<ResourceRef> {
    [
        (ResourceKind::Disk, op.disk_id),
        (ResourceKind::Interface, op.iface_id),
        (ResourceKind::IpAddress, op.ip_id),
        (ResourceKind::Vm, op.vm_id),
    ]
    .into_iter()
    .filter(|(kind, id)| *id != 0 && !existing.contains(&(*kind, *id)))
    .map(|(kind, id)| ResourceRef::new(kind, to_domain_id(id)))
    .collect()
}

impl<C: Caller> HostingV4<C> {
    pub(crate) async fn vm_from_id(&self, id: i64) -> Result<Vm> {
        let vm: VmV4 = self.call("hosting.vm.info", vec![Value::from(id)]).await?;
        vm_from_wire(vm)
    }

    async fn resolve_keys(&self, names: &[String]) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            ids.push(self.key_id_from_name(name).await?);
        }
        Ok(ids)
    }

    async fn create(&self, creation: Creation<'_>) -> WorkflowResult<VmCreation> {
        let mut progress = WorkflowProgress::new(creation.workflow);
        match self.run_creation(&creation, &mut progress).await {
            Ok(created) => Ok(created),
            Err(error) => {
                tracing::warn!(
                    workflow = creation.workflow,
                    last_step = ?progress.last_step(),
                    pending = progress.pending.len(),
                    confirmed = progress.confirmed.len(),
                    "VM creation aborted"
                );
                Err(progress.fail(error))
            }
        }
    }

    async fn run_creation(
        &self,
        creation: &Creation<'_>,
        progress: &mut WorkflowProgress,
    ) -> Result<VmCreation> {
        let checked = creation.check()?;
        progress.record(WorkflowStep::Validated);

        let key_ids = self.resolve_keys(&creation.spec.ssh_keys).await?;
        progress.record(WorkflowStep::KeysResolved);

        let mut params = vm_spec_params(creation.spec, &key_ids)?;
        let mut existing = Vec::new();

        match checked.ip {
            Some(ip_id) => {
                let iface = self.iface_id_from_ip_id(ip_id).await?;
                progress.record(WorkflowStep::InterfaceResolved);
                params.insert(WireField::IfaceId, iface);
                existing.push((ResourceKind::IpAddress, ip_id));
                existing.push((ResourceKind::Interface, iface));
            }
            None => {
                params
                    .insert(WireField::IpVersion, creation.version.as_i64())
                    .insert(WireField::Bandwidth, DEFAULT_BANDWIDTH);
            }
        }
        if let Some(disk_id) = checked.disk {
            params.insert(WireField::SysDiskId, disk_id);
            existing.push((ResourceKind::Disk, disk_id));
        }

        let (method, args) = match checked.image_disk {
            Some(source) => {
                let disk_params = ParamSet::new()
                    .with(WireField::DatacenterId, &checked.region)
                    .with(WireField::Size, &checked.disk_size_mib);
                (
                    "hosting.vm.create_from",
                    vec![params.into_value(), disk_params.into_value(), Value::from(source)],
                )
            }
            None => ("hosting.vm.create", vec![params.into_value()]),
        };

        let hostname = creation.spec.hostname.as_str();
        tracing::info!(hostname, method, "creating VM");
        let ops: Vec<Operation> = self.call(method, args).await?;
        progress.record(WorkflowStep::Submitted);
        for op in &ops {
            for resource in produced_by(op, &existing) {
                progress.add_pending(resource);
            }
        }

        let last = last_operation(method, &ops)?;
        self.wait(&last).await?;
        progress.record(WorkflowStep::Completed);
        progress.confirm_pending();
        tracing::info!(hostname, id = last.vm_id, "VM created");

        let mut vm = self.vm_from_id(last.vm_id).await?;
        progress.record(WorkflowStep::Fetched);

        // Key names are never echoed back
        vm.ssh_keys = creation.spec.ssh_keys.clone();
        let ip = vm
            .ips
            .first()
            .cloned()
            .ok_or_else(|| HostingError::not_found("IPAddress", format!("on VM {}", vm.id)))?;
        let disk = vm
            .disks
            .first()
            .cloned()
            .ok_or_else(|| HostingError::not_found("Disk", format!("on VM {}", vm.id)))?;
        Ok(VmCreation { vm, ip, disk })
    }

    async fn disk_attach_detach(
        &self,
        operation: &'static str,
        method: &'static str,
        vm: &Vm,
        disk: &Disk,
        position: Option<u32>,
    ) -> Result<(Vm, Disk)> {
        ensure_same_region(
            operation,
            ("VM", vm.region_id.as_str()),
            ("Disk", disk.region_id.as_str()),
        )?;
        let vm_id = required_id(operation, "VM", "ID", &vm.id)?;
        let disk_id = required_id(operation, "Disk", "ID", &disk.id)?;

        let mut args = vec![Value::from(vm_id), Value::from(disk_id)];
        if let Some(position) = position {
            let mut options = ParamSet::new();
            options.insert(WireField::Position, position);
            args.push(options.into_value());
        }
        self.call_and_wait(method, args).await?;

        let mut vm_after = self.vm_from_id(vm_id).await?;
        vm_after.ssh_keys = vm.ssh_keys.clone();
        let disk_after = self.disk_from_id(disk_id).await?;
        Ok((vm_after, disk_after))
    }

    async fn ip_attach_detach(
        &self,
        operation: &'static str,
        method: &'static str,
        vm: &Vm,
        ip: &IpAddress,
    ) -> Result<(Vm, IpAddress)> {
        ensure_same_region(
            operation,
            ("VM", vm.region_id.as_str()),
            ("IPAddress", ip.region_id.as_str()),
        )?;
        let vm_id = required_id(operation, "VM", "ID", &vm.id)?;
        let ip_id = required_id(operation, "IPAddress", "ID", &ip.id)?;

        // Addresses move with their interface
        let iface = self.iface_id_from_ip_id(ip_id).await?;
        self.call_and_wait(method, vec![Value::from(vm_id), Value::from(iface)])
            .await?;

        let mut vm_after = self.vm_from_id(vm_id).await?;
        vm_after.ssh_keys = vm.ssh_keys.clone();
        let ip_after = self.ip_from_id(ip_id).await?;
        Ok((vm_after, ip_after))
    }

    async fn vm_verb(&self, operation: &'static str, method: &'static str, vm: &Vm) -> Result<()> {
        let id = required_id(operation, "VM", "ID", &vm.id)?;
        self.call_and_wait(method, vec![Value::from(id)]).await?;
        tracing::info!(hostname = %vm.hostname, id, method, "VM operation done");
        Ok(())
    }

    async fn update_vm(&self, operation: &'static str, vm: &Vm, update: ParamSet) -> Result<Vm> {
        let id = required_id(operation, "VM", "ID", &vm.id)?;
        self.call_and_wait("hosting.vm.update", vec![Value::from(id), update.into_value()])
            .await?;
        let mut updated = self.vm_from_id(id).await?;
        updated.ssh_keys = vm.ssh_keys.clone();
        Ok(updated)
    }
}

#[async_trait]
impl<C: Caller> VmManager for HostingV4<C> {
    async fn create_vm(
        &self,
        spec: &VmSpec,
        image: &DiskImage,
        version: IpVersion,
        disk_size: u64,
    ) -> WorkflowResult<VmCreation> {
        self.create(Creation {
            workflow: "CreateVM",
            spec,
            image: Some(image),
            disk_size,
            disk: None,
            ip: None,
            version,
        })
        .await
    }

    async fn create_vm_with_existing_ip(
        &self,
        spec: &VmSpec,
        image: &DiskImage,
        ip: &IpAddress,
        disk_size: u64,
    ) -> WorkflowResult<VmCreation> {
        self.create(Creation {
            workflow: "CreateVMWithExistingIP",
            spec,
            image: Some(image),
            disk_size,
            disk: None,
            ip: Some(ip),
            version: ip.version,
        })
        .await
    }

    async fn create_vm_with_existing_disk(
        &self,
        spec: &VmSpec,
        version: IpVersion,
        disk: &Disk,
    ) -> WorkflowResult<VmCreation> {
        self.create(Creation {
            workflow: "CreateVMWithExistingDisk",
            spec,
            image: None,
            disk_size: 0,
            disk: Some(disk),
            ip: None,
            version,
        })
        .await
    }

    async fn create_vm_with_existing_disk_and_ip(
        &self,
        spec: &VmSpec,
        ip: &IpAddress,
        disk: &Disk,
    ) -> WorkflowResult<VmCreation> {
        self.create(Creation {
            workflow: "CreateVMWithExistingDiskAndIP",
            spec,
            image: None,
            disk_size: 0,
            disk: Some(disk),
            ip: Some(ip),
            version: ip.version,
        })
        .await
    }

    async fn attach_disk(&self, vm: &Vm, disk: &Disk) -> Result<(Vm, Disk)> {
        self.disk_attach_detach("AttachDisk", "hosting.vm.disk_attach", vm, disk, None)
            .await
    }

    async fn attach_disk_at_position(
        &self,
        vm: &Vm,
        disk: &Disk,
        position: u32,
    ) -> Result<(Vm, Disk)> {
        self.disk_attach_detach(
            "AttachDiskAtPosition",
            "hosting.vm.disk_attach",
            vm,
            disk,
            Some(position),
        )
        .await
    }

    async fn detach_disk(&self, vm: &Vm, disk: &Disk) -> Result<(Vm, Disk)> {
        self.disk_attach_detach("DetachDisk", "hosting.vm.disk_detach", vm, disk, None)
            .await
    }

    async fn attach_ip(&self, vm: &Vm, ip: &IpAddress) -> Result<(Vm, IpAddress)> {
        self.ip_attach_detach("AttachIP", "hosting.vm.iface_attach", vm, ip)
            .await
    }

    async fn detach_ip(&self, vm: &Vm, ip: &IpAddress) -> Result<(Vm, IpAddress)> {
        self.ip_attach_detach("DetachIP", "hosting.vm.iface_detach", vm, ip)
            .await
    }

    async fn start_vm(&self, vm: &Vm) -> Result<()> {
        self.vm_verb("StartVM", "hosting.vm.start", vm).await
    }

    async fn stop_vm(&self, vm: &Vm) -> Result<()> {
        self.vm_verb("StopVM", "hosting.vm.stop", vm).await
    }

    async fn reboot_vm(&self, vm: &Vm) -> Result<()> {
        self.vm_verb("RebootVM", "hosting.vm.reboot", vm).await
    }

    async fn delete_vm(&self, vm: &Vm) -> Result<Vm> {
        self.vm_verb("DeleteVM", "hosting.vm.delete", vm).await?;
        Ok(Vm {
            state: DELETED_STATE.to_string(),
            ..vm.clone()
        })
    }

    async fn list_vms(&self, filter: &VmFilter) -> Result<Vec<Vm>> {
        let params = filter.to_params()?;
        let listed: Vec<VmV4> = self.call("hosting.vm.list", list_args(params)).await?;

        // vm.list leaves out interfaces and disks
        let mut vms = Vec::with_capacity(listed.len());
        for entry in listed {
            match self.vm_from_id(entry.id).await {
                Ok(vm) => vms.push(vm),
                Err(e) => {
                    tracing::warn!(
                        hostname = %entry.hostname,
                        id = entry.id,
                        error = %e,
                        "Cannot describe VM, excluded from list"
                    );
                }
            }
        }
        Ok(vms)
    }

    async fn vm_from_name(&self, name: &str) -> Result<Vm> {
        if name.is_empty() {
            return Err(HostingError::missing("VMFromName", "-", "name"));
        }
        let filter = VmFilter {
            hostname: name.to_string(),
            ..Default::default()
        };
        self.list_vms(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HostingError::not_found("VM", name))
    }

    async fn update_vm_memory(&self, vm: &Vm, memory: u64) -> Result<Vm> {
        if memory == 0 {
            return Err(HostingError::invalid("UpdateVMMemory", "VM", "Memory", "must be greater than 0"));
        }
        let mut update = ParamSet::new();
        update.insert(WireField::Memory, memory);
        self.update_vm("UpdateVMMemory", vm, update).await
    }

    async fn update_vm_cores(&self, vm: &Vm, cores: u32) -> Result<Vm> {
        if cores == 0 {
            return Err(HostingError::invalid("UpdateVMCores", "VM", "Cores", "must be greater than 0"));
        }
        let mut update = ParamSet::new();
        update.insert(WireField::Cores, cores);
        self.update_vm("UpdateVMCores", vm, update).await
    }

    async fn rename_vm(&self, vm: &Vm, hostname: &str) -> Result<Vm> {
        if hostname.is_empty() {
            return Err(HostingError::missing("RenameVM", "VM", "Hostname"));
        }
        let mut update = ParamSet::new();
        update.insert(WireField::Hostname, hostname);
        self.update_vm("RenameVM", vm, update).await
    }
}
