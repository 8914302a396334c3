//! Gandi Hosting
//!
//! Provider-neutral resource model for the Gandi IaaS platform: virtual
//! machines, disks, IP addresses, private networks, SSH keys, regions and
//! disk images, with one manager trait per resource.
//!
//! Resources are plain values. Every operation takes the caller's current
//! view and returns a new one; nothing is cached between calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 gandi-hosting                    │
//! │  trait Hosting: VmManager + DiskManager + ...    │
//! │  resource types, specs, filters, errors          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               gandi-hosting-v4                   │
//! │  ids, params, converters, operation poller       │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait Caller { send(method, args) }      │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod disk;
pub mod error;
pub mod image;
pub mod ip;
pub mod provider;
pub mod region;
pub mod ssh;
pub mod vlan;
pub mod vm;
pub mod workflow;

// Re-exports
pub use disk::{DELETED_STATE, Disk, DiskFilter, DiskManager, DiskSpec};
pub use error::{HostingError, Result, TransportError};
pub use image::{DiskImage, ImageManager};
pub use ip::{DEFAULT_BANDWIDTH, IpAddress, IpFilter, IpManager, IpVersion};
pub use provider::Hosting;
pub use region::{Region, RegionManager, ensure_same_region};
pub use ssh::{SshKey, SshKeyManager};
pub use vlan::{Vlan, VlanFilter, VlanManager, VlanSpec};
pub use vm::{Vm, VmCreation, VmFilter, VmManager, VmSpec};
pub use workflow::{
    ResourceKind, ResourceRef, WorkflowError, WorkflowProgress, WorkflowResult, WorkflowStep,
};
