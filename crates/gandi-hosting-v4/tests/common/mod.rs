//! Shared fixtures for the v4 provider tests

#![allow(dead_code)]

use gandi_hosting::{Disk, DiskImage, IpAddress, IpVersion, Vm, VmSpec};
use gandi_hosting_v4::{HostingV4, MockCaller};
use serde_json::{Value, json};
use std::sync::Arc;

/// A client over a shared mock, so tests keep a handle on the recorded calls
pub fn hosting() -> (Arc<MockCaller>, HostingV4<Arc<MockCaller>>) {
    let caller = Arc::new(MockCaller::new());
    (caller.clone(), HostingV4::new(caller))
}

pub fn spec(region: &str, hostname: &str) -> VmSpec {
    VmSpec {
        region_id: region.to_string(),
        hostname: hostname.to_string(),
        ..Default::default()
    }
}

pub fn image(region: &str) -> DiskImage {
    DiskImage {
        id: "1".to_string(),
        disk_id: "100".to_string(),
        region_id: region.to_string(),
        name: "Debian 12".to_string(),
        size: 3,
    }
}

pub fn disk(id: &str, region: &str, size: u64) -> Disk {
    Disk {
        id: id.to_string(),
        name: format!("disk{id}"),
        size,
        region_id: region.to_string(),
        state: "created".to_string(),
        disk_type: "data".to_string(),
        ..Default::default()
    }
}

pub fn ip(id: &str, region: &str) -> IpAddress {
    IpAddress {
        id: id.to_string(),
        ip: "10.0.0.9".to_string(),
        region_id: region.to_string(),
        version: IpVersion::V4,
        ..Default::default()
    }
}

pub fn vm(id: &str, region: &str) -> Vm {
    Vm {
        id: id.to_string(),
        hostname: "TestVM".to_string(),
        region_id: region.to_string(),
        state: "running".to_string(),
        ..Default::default()
    }
}

/// `hosting.vm.info` reply for a VM with one boot disk and one address
pub fn wire_vm(id: i64, hostname: &str, version: i64) -> Value {
    let address = if version == 6 { "2001:db8::9" } else { "10.0.0.9" };
    json!({
        "id": id,
        "hostname": hostname,
        "datacenter_id": 4,
        "farm": "",
        "cores": 1,
        "memory": 512,
        "date_created": "2024-03-01T10:00:00Z",
        "state": "running",
        "ifaces": [{
            "id": 7,
            "datacenter_id": 4,
            "vm_id": id,
            "ips": [{"id": 9, "ip": address, "datacenter_id": 4, "version": version, "vm_id": id, "iface_id": 7, "state": "used"}]
        }],
        "disks": [{"id": 3, "name": "sys_TestVM", "size": 10240, "datacenter_id": 4, "state": "used", "type": "data", "vms_id": [id], "is_boot_disk": true}]
    })
}

pub fn wire_disk(id: i64, size: u64, vms: &[i64]) -> Value {
    json!({
        "id": id,
        "name": format!("disk{id}"),
        "size": size,
        "datacenter_id": 4,
        "state": if vms.is_empty() { "created" } else { "used" },
        "type": "data",
        "vms_id": vms,
        "is_boot_disk": false
    })
}
