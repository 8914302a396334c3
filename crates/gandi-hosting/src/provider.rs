//! Hosting provider trait

use crate::disk::DiskManager;
use crate::image::ImageManager;
use crate::ip::IpManager;
use crate::region::RegionManager;
use crate::ssh::SshKeyManager;
use crate::vlan::VlanManager;
use crate::vm::VmManager;

/// Every capability of the Gandi hosting platform
///
/// A client can be handed around as `&dyn Hosting` or `Arc<dyn Hosting>`.
pub trait Hosting:
    VmManager + DiskManager + IpManager + SshKeyManager + VlanManager + RegionManager + ImageManager
{
    /// API generation served by this provider, e.g. "v4"
    fn api_version(&self) -> &'static str;
}
