//! Cirrus Metadata
//!
//! Model of the Akamai (Linode) metadata service as seen by a booting node,
//! and the client contract the platform adapter fetches it through.
//!
//! The service answers three questions:
//!
//! - `instance` - who am I (id, label, region, plan)
//! - `network` - which addresses were assigned to me
//! - `user-data` - what machine configuration was I given
//!
//! # Example
//!
//! ```
//! use cirrus_metadata::{InstanceMetadata, NetworkMetadata, StaticMetadataClient};
//!
//! let instance = InstanceMetadata::new(79475478, "node-1")
//!     .with_region("us-ord")
//!     .with_instance_type("g6-standard-2");
//!
//! let network: NetworkMetadata = serde_json::from_str(r#"{
//!     "ipv4": {"public": ["192.0.2.10/24"], "private": []},
//!     "ipv6": {"ranges": [], "link_local": "fe80::f03c:94ff:fe12:3456/64"}
//! }"#).unwrap();
//!
//! let client = StaticMetadataClient::new(instance, network);
//! assert_eq!(client.instance().label, "node-1");
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{MetadataClient, StaticMetadataClient};
pub use error::{MetadataError, Result};
pub use types::{
    InstanceBackups, InstanceImage, InstanceMetadata, InstanceSpecs, Ipv4Data, Ipv6Data,
    NetworkInterface, NetworkMetadata,
};
