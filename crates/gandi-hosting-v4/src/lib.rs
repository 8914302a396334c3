//! Gandi hosting v4 provider
//!
//! This crate implements the gandi-hosting manager traits on top of the
//! v4 RPC API.
//!
//! # Features
//!
//! - VM creation from an image, an existing disk, an existing address or both
//! - Disk, IP address, vlan and SSH key management
//! - Operation polling with interval, timeout and cancellation
//!
//! # Transport
//!
//! The crate does not talk to the network itself. Anything implementing
//! [`Caller`] can carry the calls; [`HostingConfig::authenticate`] wraps it
//! so every call carries the API key, and [`MockCaller`] replays scripted
//! replies in tests.
//!
//! # Example
//!
//! ```ignore
//! use gandi_hosting::{DiskImage, ImageManager, IpVersion, RegionManager, VmManager, VmSpec};
//! use gandi_hosting_v4::{HostingConfig, HostingV4};
//!
//! let config = HostingConfig::from_env()?;
//! let hosting = HostingV4::from_config(&config, transport);
//!
//! let region = hosting.region_by_code("FR-SD5").await?;
//! let image = hosting.image_by_name("Debian 12", &region).await?;
//! let spec = VmSpec {
//!     region_id: region.id.clone(),
//!     hostname: "web".to_string(),
//!     ..Default::default()
//! };
//! let created = hosting.create_vm(&spec, &image, IpVersion::V4, 20).await?;
//! ```

pub mod client;
pub mod config;
pub mod convert;
pub mod disk;
pub mod identifiers;
pub mod image;
pub mod ip;
pub mod mock;
pub mod operation;
pub mod params;
pub mod region;
pub mod rpc;
pub mod ssh;
pub mod vlan;
pub mod vm;
pub mod wire;

pub use client::HostingV4;
pub use config::{DEFAULT_API_URL, HostingConfig};
pub use identifiers::{optional_id, required_id, to_domain_id, to_wire_id};
pub use mock::{MockCaller, RecordedCall};
pub use operation::{OperationStatus, PollConfig, await_completion, last_operation};
pub use params::{ParamSet, ToParams, WireField, WireValue, list_args};
pub use rpc::{ApiKeyCaller, Caller};
pub use wire::Operation;

pub use gandi_hosting;
