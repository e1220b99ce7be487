//! Metadata types
//!
//! Instance and network documents served by the metadata service. Field
//! names follow the service's JSON; unknown fields are ignored and optional
//! ones default, so newer service versions keep decoding.

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

/// Instance metadata
///
/// Immutable snapshot fetched once per network configuration cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceMetadata {
    /// Numeric Linode id
    pub id: i64,

    /// Instance label, usually the hostname
    #[serde(default)]
    pub label: String,

    /// Region slug, e.g. `us-ord`
    #[serde(default)]
    pub region: String,

    /// Plan slug, e.g. `g6-standard-2`
    #[serde(rename = "type", default)]
    pub instance_type: String,

    /// UUID of the hypervisor host
    #[serde(default)]
    pub host_uuid: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub specs: InstanceSpecs,

    #[serde(default)]
    pub backups: InstanceBackups,

    #[serde(default)]
    pub image: Option<InstanceImage>,

    /// User-data, when it was fetched alongside the instance document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

impl InstanceMetadata {
    /// Create instance metadata with the required fields
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = instance_type.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }
}

/// Plan resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpecs {
    #[serde(default)]
    pub vcpus: u32,
    /// MiB
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub gpus: u32,
    /// GB per month
    #[serde(default)]
    pub transfer: u64,
    /// MiB
    #[serde(default)]
    pub disk: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceBackups {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceImage {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Network metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetadata {
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
    pub ipv4: Ipv4Data,
    pub ipv6: Ipv6Data,
}

/// A VPC or VLAN interface attached to the instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub ipam_address: Option<IpNetwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv4Data {
    #[serde(default)]
    pub public: Vec<IpNetwork>,
    #[serde(default)]
    pub private: Vec<IpNetwork>,
    /// Addresses shared with other instances for failover
    #[serde(default)]
    pub shared: Vec<IpNetwork>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Data {
    /// SLAAC address the instance autoconfigures
    #[serde(default)]
    pub slaac: Option<IpNetwork>,
    /// Routed ranges
    #[serde(default)]
    pub ranges: Vec<IpNetwork>,
    pub link_local: IpNetwork,
    #[serde(default)]
    pub shared_ranges: Vec<IpNetwork>,
}
