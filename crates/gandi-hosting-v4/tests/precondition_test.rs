//! Operations whose inputs span two regions must fail before any call

mod common;

use common::{disk, hosting, image, ip, spec, vm};
use gandi_hosting::{DiskManager, DiskSpec, HostingError, IpVersion, VmManager};

fn assert_mismatch(err: &HostingError) {
    assert!(
        matches!(err, HostingError::RegionMismatch { .. }),
        "expected a region mismatch, got {err:?}"
    );
    assert!(err.is_precondition());
}

#[tokio::test]
async fn test_creations_check_regions_first() {
    let (caller, hosting) = hosting();
    let vm_spec = spec("4", "TestVM");

    let err = hosting
        .create_vm(&vm_spec, &image("3"), IpVersion::V4, 10)
        .await
        .unwrap_err();
    assert_mismatch(&err.error);
    assert!(err.progress.steps.is_empty());

    let err = hosting
        .create_vm_with_existing_ip(&vm_spec, &image("4"), &ip("9", "3"), 10)
        .await
        .unwrap_err();
    assert_mismatch(&err.error);

    let err = hosting
        .create_vm_with_existing_disk(&vm_spec, IpVersion::V6, &disk("5", "3", 10))
        .await
        .unwrap_err();
    assert_mismatch(&err.error);

    let err = hosting
        .create_vm_with_existing_disk_and_ip(&vm_spec, &ip("9", "4"), &disk("5", "3", 10))
        .await
        .unwrap_err();
    assert_mismatch(&err.error);

    let err = hosting
        .create_vm_with_existing_disk_and_ip(&vm_spec, &ip("9", "3"), &disk("5", "4", 10))
        .await
        .unwrap_err();
    assert_mismatch(&err.error);

    let err = hosting
        .create_disk_from_image(
            &DiskSpec {
                region_id: "4".to_string(),
                ..Default::default()
            },
            &image("3"),
        )
        .await
        .unwrap_err();
    assert_mismatch(&err);

    assert_eq!(caller.call_count(), 0);
}

#[tokio::test]
async fn test_attachments_check_regions_first() {
    let (caller, hosting) = hosting();
    let target = vm("42", "4");
    let far_disk = disk("5", "3", 10);
    let far_ip = ip("9", "3");

    assert_mismatch(&hosting.attach_disk(&target, &far_disk).await.unwrap_err());
    assert_mismatch(
        &hosting
            .attach_disk_at_position(&target, &far_disk, 0)
            .await
            .unwrap_err(),
    );
    assert_mismatch(&hosting.detach_disk(&target, &far_disk).await.unwrap_err());
    assert_mismatch(&hosting.attach_ip(&target, &far_ip).await.unwrap_err());
    assert_mismatch(&hosting.detach_ip(&target, &far_ip).await.unwrap_err());

    assert_eq!(caller.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_ids_never_reach_the_wire() {
    let (caller, hosting) = hosting();

    let err = hosting
        .attach_disk(&vm("vm-42", "4"), &disk("5", "4", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, HostingError::Parse { ref what, .. } if what == "VM.ID"));

    let err = hosting
        .create_vm(&spec("four", "TestVM"), &image("four"), IpVersion::V4, 10)
        .await
        .unwrap_err();
    assert!(matches!(err.error, HostingError::Parse { .. }));

    let err = hosting
        .create_vm_with_existing_disk(&spec("4", "TestVM"), IpVersion::V4, &disk("", "4", 10))
        .await
        .unwrap_err();
    assert!(matches!(err.error, HostingError::Validation { resource: "Disk", .. }));

    let err = hosting.extend_disk(&disk("5", "4", 10), 0).await.unwrap_err();
    assert!(err.is_precondition());

    assert_eq!(caller.call_count(), 0);
}
