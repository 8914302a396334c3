//! Conversions between domain values and v4 wire values
//!
//! Disk sizes are GiB in the domain model and MiB on the wire.

use crate::identifiers::{optional_id, to_domain_id, to_optional_domain_id};
use crate::params::{ParamSet, ToParams, WireField};
use crate::wire::{DiskImageV4, DiskV4, IpAddressV4, RegionV4, SshKeyV4, VlanV4, VmV4};
use gandi_hosting::{
    Disk, DiskFilter, DiskImage, DiskSpec, HostingError, IpAddress, IpFilter, IpVersion, Region,
    Result, SshKey, Vlan, VlanFilter, VlanSpec, Vm, VmFilter, VmSpec,
};

pub const MIB_PER_GIB: u64 = 1024;

/// MiB count of `gib`, a Validation error when it does not fit a wire integer
pub fn gib_to_mib(operation: &'static str, resource: &'static str, gib: u64) -> Result<u64> {
    gib.checked_mul(MIB_PER_GIB)
        .filter(|mib| *mib <= MAX_WIRE_SIZE)
        .ok_or_else(|| size_out_of_range(operation, resource, gib))
}

/// Sum of two GiB sizes in MiB, with the same range check
pub fn total_mib(
    operation: &'static str,
    resource: &'static str,
    gib: u64,
    extra_gib: u64,
) -> Result<u64> {
    gib.checked_add(extra_gib)
        .ok_or_else(|| size_out_of_range(operation, resource, gib))
        .and_then(|total| gib_to_mib(operation, resource, total))
}

const MAX_WIRE_SIZE: u64 = i64::MAX as u64;

fn size_out_of_range(operation: &'static str, resource: &'static str, gib: u64) -> HostingError {
    HostingError::invalid(operation, resource, "Size", format!("{gib} GiB is out of range"))
}

pub fn mib_to_gib(mib: u64) -> u64 {
    mib / MIB_PER_GIB
}

pub fn vm_from_wire(vm: VmV4) -> Result<Vm> {
    // Addresses hang off interfaces on the wire
    let ips = vm
        .ifaces
        .into_iter()
        .flat_map(|iface| iface.ips)
        .map(ip_from_wire)
        .collect::<Result<Vec<_>>>()?;
    let disks = vm.disks.into_iter().map(disk_from_wire).collect();

    Ok(Vm {
        id: to_domain_id(vm.id),
        hostname: vm.hostname,
        region_id: to_domain_id(vm.datacenter_id),
        farm: vm.farm,
        description: vm.description,
        cores: vm.cores,
        memory: vm.memory,
        date_created: vm.date_created,
        ips,
        disks,
        ssh_keys: Vec::new(),
        state: vm.state,
    })
}

pub fn disk_from_wire(disk: DiskV4) -> Disk {
    Disk {
        id: to_domain_id(disk.id),
        name: disk.name,
        size: mib_to_gib(disk.size),
        region_id: to_domain_id(disk.datacenter_id),
        state: disk.state,
        disk_type: disk.disk_type,
        vm_ids: disk.vms_id.into_iter().map(to_domain_id).collect(),
        boot_disk: disk.is_boot_disk,
    }
}

pub fn ip_from_wire(ip: IpAddressV4) -> Result<IpAddress> {
    Ok(IpAddress {
        id: to_domain_id(ip.id),
        ip: ip.ip,
        region_id: to_domain_id(ip.datacenter_id),
        version: IpVersion::try_from(ip.version)?,
        vm_id: to_optional_domain_id(ip.vm_id),
        state: ip.state,
    })
}

pub fn vlan_from_wire(vlan: VlanV4) -> Vlan {
    Vlan {
        id: to_domain_id(vlan.id),
        name: vlan.name,
        gateway: vlan.gateway,
        subnet: vlan.subnet,
        region_id: to_domain_id(vlan.datacenter_id),
    }
}

pub fn key_from_wire(key: SshKeyV4) -> SshKey {
    SshKey {
        id: to_domain_id(key.id),
        name: key.name,
        value: key.value,
        fingerprint: key.fingerprint,
    }
}

pub fn region_from_wire(region: RegionV4) -> Region {
    Region {
        id: to_domain_id(region.id),
        name: region.dc_code,
        country: region.country,
    }
}

pub fn image_from_wire(image: DiskImageV4) -> DiskImage {
    DiskImage {
        id: to_domain_id(image.id),
        disk_id: to_domain_id(image.disk_id),
        region_id: to_domain_id(image.datacenter_id),
        name: image.label,
        size: mib_to_gib(image.size),
    }
}

/// Marshals a VM spec whose SSH key names were already resolved to ids
pub fn vm_spec_params(spec: &VmSpec, key_ids: &[i64]) -> Result<ParamSet> {
    let region = optional_id("VMSpec", "RegionID", &spec.region_id)?;
    let params = ParamSet::new()
        .with(WireField::DatacenterId, &region)
        .with(WireField::Hostname, &spec.hostname)
        .with(WireField::Farm, &spec.farm)
        .with(WireField::Memory, &spec.memory)
        .with(WireField::Cores, &spec.cores)
        .with(WireField::Keys, key_ids)
        .with(WireField::Login, &spec.login)
        .with(WireField::Password, &spec.password);
    params.debug_assert_within(VM_SPEC_FIELDS);
    Ok(params)
}

/// Fields [`vm_spec_params`] may produce
pub const VM_SPEC_FIELDS: &[WireField] = &[
    WireField::DatacenterId,
    WireField::Hostname,
    WireField::Farm,
    WireField::Memory,
    WireField::Cores,
    WireField::Keys,
    WireField::Login,
    WireField::Password,
];

impl ToParams for VmFilter {
    const FIELDS: &'static [WireField] = &[
        WireField::DatacenterId,
        WireField::Farm,
        WireField::Hostname,
        WireField::Id,
        WireField::State,
    ];

    fn marshal(&self) -> Result<ParamSet> {
        let region = optional_id("VMFilter", "RegionID", &self.region_id)?;
        let id = optional_id("VMFilter", "ID", &self.id)?;
        Ok(ParamSet::new()
            .with(WireField::DatacenterId, &region)
            .with(WireField::Farm, &self.farm)
            .with(WireField::Hostname, &self.hostname)
            .with(WireField::Id, &id)
            .with(WireField::State, &self.state))
    }
}

impl ToParams for DiskSpec {
    const FIELDS: &'static [WireField] =
        &[WireField::DatacenterId, WireField::Name, WireField::Size];

    fn marshal(&self) -> Result<ParamSet> {
        let region = optional_id("DiskSpec", "RegionID", &self.region_id)?;
        Ok(ParamSet::new()
            .with(WireField::DatacenterId, &region)
            .with(WireField::Name, &self.name)
            .with(WireField::Size, &gib_to_mib("CreateDisk", "DiskSpec", self.size)?))
    }
}

impl ToParams for DiskFilter {
    const FIELDS: &'static [WireField] = &[
        WireField::Id,
        WireField::DatacenterId,
        WireField::Name,
        WireField::VmId,
    ];

    fn marshal(&self) -> Result<ParamSet> {
        let id = optional_id("DiskFilter", "ID", &self.id)?;
        let region = optional_id("DiskFilter", "RegionID", &self.region_id)?;
        let vm = optional_id("DiskFilter", "VMID", &self.vm_id)?;
        Ok(ParamSet::new()
            .with(WireField::Id, &id)
            .with(WireField::DatacenterId, &region)
            .with(WireField::Name, &self.name)
            .with(WireField::VmId, &vm))
    }
}

impl ToParams for IpFilter {
    const FIELDS: &'static [WireField] = &[
        WireField::Id,
        WireField::DatacenterId,
        WireField::Version,
        WireField::Ip,
    ];

    fn marshal(&self) -> Result<ParamSet> {
        let id = optional_id("IPFilter", "ID", &self.id)?;
        let region = optional_id("IPFilter", "RegionID", &self.region_id)?;
        let version = self.version.map(IpVersion::as_i64);
        Ok(ParamSet::new()
            .with(WireField::Id, &id)
            .with(WireField::DatacenterId, &region)
            .with(WireField::Version, &version)
            .with(WireField::Ip, &self.ip))
    }
}

impl ToParams for VlanSpec {
    const FIELDS: &'static [WireField] = &[
        WireField::Name,
        WireField::Gateway,
        WireField::Subnet,
        WireField::DatacenterId,
    ];

    fn marshal(&self) -> Result<ParamSet> {
        let region = optional_id("VlanSpec", "RegionID", &self.region_id)?;
        Ok(ParamSet::new()
            .with(WireField::Name, &self.name)
            .with(WireField::Gateway, &self.gateway)
            .with(WireField::Subnet, &self.subnet)
            .with(WireField::DatacenterId, &region))
    }
}

impl ToParams for VlanFilter {
    const FIELDS: &'static [WireField] =
        &[WireField::Id, WireField::DatacenterId, WireField::Name];

    fn marshal(&self) -> Result<ParamSet> {
        let ids = wire_ids("VlanFilter", "ID", &self.ids)?;
        let regions = wire_ids("VlanFilter", "RegionID", &self.region_ids)?;
        Ok(ParamSet::new()
            .with(WireField::Id, &ids)
            .with(WireField::DatacenterId, &regions)
            .with(WireField::Name, &self.name))
    }
}

// Empty entries are skipped like unset scalar criteria
fn wire_ids(resource: &'static str, field: &'static str, ids: &[String]) -> Result<Vec<i64>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(id) = optional_id(resource, field, id)? {
            out.push(id);
        }
    }
    Ok(out)
}
