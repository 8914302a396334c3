mod common;

use common::{disk, hosting, image, spec, vm, wire_disk, wire_vm};
use gandi_hosting::{
    DiskManager, HostingError, IpVersion, ResourceKind, ResourceRef, SshKeyManager, VmManager,
    WorkflowStep,
};
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn test_create_vm_from_scratch() {
    let (caller, hosting) = hosting();
    caller
        .expect_with(
            "hosting.vm.create_from",
            vec![
                json!({"datacenter_id": 4, "hostname": "TestVM", "ip_version": 4, "bandwidth": 102400.0}),
                json!({"datacenter_id": 4, "size": 10240}),
                json!(100),
            ],
            json!([
                {"id": 1, "disk_id": 3, "step": "WAIT", "type": "disk_create"},
                {"id": 2, "iface_id": 7, "ip_id": 9, "step": "WAIT", "type": "iface_create"},
                {"id": 3, "vm_id": 42, "step": "WAIT", "type": "vm_create"}
            ]),
        )
        .expect_statuses(3, &["WAIT", "RUN", "BILL", "DONE"])
        .expect_with("hosting.vm.info", vec![json!(42)], wire_vm(42, "TestVM", 4));

    let created = hosting
        .create_vm(&spec("4", "TestVM"), &image("4"), IpVersion::V4, 10)
        .await
        .unwrap();

    assert_eq!(caller.calls_to("hosting.vm.create_from"), 1);
    assert_eq!(caller.calls_to("operation.info"), 4);
    assert_eq!(caller.calls_to("hosting.vm.info"), 1);
    assert_eq!(caller.remaining(), 0);

    assert_eq!(created.vm.hostname, "TestVM");
    assert_eq!(created.vm.region_id, "4");
    assert_eq!(created.vm.disks.len(), 1);
    assert!(created.disk.boot_disk);
    assert_eq!(created.disk.size, 10);
    assert_eq!(created.vm.ips.len(), 1);
    assert_eq!(created.ip.version, IpVersion::V4);
    assert_eq!(created.ip.vm_id, "42");
}

#[tokio::test(start_paused = true)]
async fn test_create_vm_resolves_key_names() {
    let (caller, hosting) = hosting();
    caller
        .expect_with(
            "hosting.ssh.list",
            vec![json!({"name": "laptop"})],
            json!([{"id": 12, "name": "laptop"}]),
        )
        .expect_with(
            "hosting.vm.create_from",
            vec![
                json!({"datacenter_id": 4, "hostname": "TestVM", "keys": [12], "ip_version": 6, "bandwidth": 102400.0}),
                json!({"datacenter_id": 4}),
                json!(100),
            ],
            json!([{"id": 1, "disk_id": 3}, {"id": 2, "vm_id": 42}]),
        )
        .expect_statuses(2, &["DONE"])
        .expect("hosting.vm.info", wire_vm(42, "TestVM", 6));

    let mut vm_spec = spec("4", "TestVM");
    vm_spec.ssh_keys = vec!["laptop".to_string()];
    let created = hosting
        .create_vm(&vm_spec, &image("4"), IpVersion::V6, 0)
        .await
        .unwrap();

    assert_eq!(created.vm.ssh_keys, vec!["laptop".to_string()]);
    assert_eq!(created.ip.version, IpVersion::V6);
}

#[tokio::test(start_paused = true)]
async fn test_create_with_existing_ip_reuses_interface() {
    let (caller, hosting) = hosting();
    caller
        .expect_with(
            "hosting.ip.info",
            vec![json!(9)],
            json!({"id": 9, "iface_id": 7, "version": 4, "datacenter_id": 4}),
        )
        .expect_with(
            "hosting.vm.create_from",
            vec![
                json!({"datacenter_id": 4, "hostname": "TestVM", "iface_id": 7}),
                json!({"datacenter_id": 4, "size": 20480}),
                json!(100),
            ],
            json!([{"id": 1, "disk_id": 3}, {"id": 2, "iface_id": 7}, {"id": 3, "vm_id": 42}]),
        )
        .expect_statuses(3, &["DONE"])
        .expect("hosting.vm.info", wire_vm(42, "TestVM", 4));

    let created = hosting
        .create_vm_with_existing_ip(&spec("4", "TestVM"), &image("4"), &common::ip("9", "4"), 20)
        .await
        .unwrap();
    assert_eq!(created.ip.id, "9");
}

#[tokio::test(start_paused = true)]
async fn test_failed_creation_reports_leftovers() {
    let (caller, hosting) = hosting();
    caller
        .expect(
            "hosting.vm.create_from",
            json!([{"id": 1, "disk_id": 3}, {"id": 2, "iface_id": 7, "ip_id": 9}, {"id": 3, "vm_id": 42}]),
        )
        .expect_statuses(3, &["WAIT", "ERROR"]);

    let err = hosting
        .create_vm(&spec("4", "TestVM"), &image("4"), IpVersion::V4, 10)
        .await
        .unwrap_err();

    assert!(matches!(err.error, HostingError::OperationFailed { op_id: 3, ref status } if status == "ERROR"));
    assert!(err.progress.has_reached(WorkflowStep::Submitted));
    assert!(!err.progress.has_reached(WorkflowStep::Completed));
    assert!(err.progress.may_have_orphans());
    assert!(err.progress.pending.contains(&ResourceRef::new(ResourceKind::Disk, "3")));
    assert!(err.progress.pending.contains(&ResourceRef::new(ResourceKind::Vm, "42")));
    assert_eq!(err.progress.pending.len(), 4);

    // No cleanup call after the failure
    assert_eq!(caller.call_count(), 3);

    let plain: HostingError = err.into();
    assert!(matches!(plain, HostingError::OperationFailed { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_attach_disk_at_position_zero() {
    let (caller, hosting) = hosting();
    let mut attached = wire_vm(42, "TestVM", 4);
    attached["disks"] = json!([
        wire_disk(5, 20480, &[42]),
        {"id": 3, "name": "sys_TestVM", "size": 10240, "datacenter_id": 4, "type": "data", "vms_id": [42], "is_boot_disk": true}
    ]);
    caller
        .expect_with(
            "hosting.vm.disk_attach",
            vec![json!(42), json!(5), json!({"position": 0})],
            json!({"id": 11, "vm_id": 42, "disk_id": 5}),
        )
        .expect_statuses(11, &["RUN", "DONE"])
        .expect_with("hosting.vm.info", vec![json!(42)], attached)
        .expect_with("hosting.disk.info", vec![json!(5)], wire_disk(5, 20480, &[42]));

    let (vm_after, disk_after) = hosting
        .attach_disk_at_position(&vm("42", "4"), &disk("5", "4", 20), 0)
        .await
        .unwrap();

    assert_eq!(vm_after.disks[0].id, "5");
    assert_eq!(disk_after.vm_ids, vec!["42".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_plain_attach_sends_two_arguments() {
    let (caller, hosting) = hosting();
    caller
        .expect_with(
            "hosting.vm.disk_attach",
            vec![json!(42), json!(5)],
            json!({"id": 11}),
        )
        .expect_statuses(11, &["DONE"])
        .expect("hosting.vm.info", wire_vm(42, "TestVM", 4))
        .expect("hosting.disk.info", wire_disk(5, 20480, &[42]));

    hosting
        .attach_disk(&vm("42", "4"), &disk("5", "4", 20))
        .await
        .unwrap();
    assert_eq!(caller.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_extend_disk_sends_total_size() {
    let (caller, hosting) = hosting();
    caller
        .expect_with(
            "hosting.disk.update",
            vec![json!(5), json!({"size": 12288})],
            json!({"id": 12, "disk_id": 5}),
        )
        .expect_statuses(12, &["DONE"])
        .expect_with("hosting.disk.info", vec![json!(5)], wire_disk(5, 12288, &[]));

    let extended = hosting.extend_disk(&disk("5", "4", 10), 2).await.unwrap();
    assert_eq!(extended.size, 12);
}

#[tokio::test(start_paused = true)]
async fn test_vm_lifecycle() {
    let (caller, hosting) = hosting();
    caller
        .expect_with("hosting.vm.stop", vec![json!(42)], json!({"id": 20}))
        .expect_statuses(20, &["RUN", "DONE"])
        .expect_with("hosting.vm.start", vec![json!(42)], json!({"id": 21}))
        .expect_statuses(21, &["DONE"])
        .expect_with("hosting.vm.reboot", vec![json!(42)], json!({"id": 22}))
        .expect_statuses(22, &["DONE"]);

    let target = vm("42", "4");
    hosting.stop_vm(&target).await.unwrap();
    hosting.start_vm(&target).await.unwrap();
    hosting.reboot_vm(&target).await.unwrap();
    assert_eq!(caller.remaining(), 0);
}

#[tokio::test]
async fn test_delete_key_reports_missing() {
    let (caller, hosting) = hosting();
    caller.expect_with("hosting.ssh.delete", vec![json!(12)], json!(false));

    let key = gandi_hosting::SshKey {
        id: "12".to_string(),
        name: "laptop".to_string(),
        ..Default::default()
    };
    let err = hosting.delete_key(&key).await.unwrap_err();
    assert!(matches!(err, HostingError::NotFound { .. }));
}
