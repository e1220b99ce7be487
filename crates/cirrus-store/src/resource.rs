//! Typed resources
//!
//! Resources are addressed by namespace, kind and id. The adapter only deals
//! with two kinds: META keys in the runtime namespace and the SMBIOS-derived
//! system information in the hardware namespace.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const RUNTIME_NAMESPACE: &str = "runtime";
pub const HARDWARE_NAMESPACE: &str = "hardware";

/// Well-known META key tags
pub mod meta {
    /// Replacement for the SMBIOS system UUID
    pub const UUID_OVERRIDE: u8 = 0x0c;
}

/// Address of a resource in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub namespace: String,
    pub kind: String,
    pub id: String,
}

impl ResourceId {
    pub fn new(
        namespace: impl Into<String>,
        kind: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.kind, self.id)
    }
}

/// A tagged string value persisted across reboots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaKey {
    pub tag: u8,
    pub value: String,
}

impl MetaKey {
    pub const KIND: &'static str = "MetaKey";

    pub fn new(tag: u8, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Id of the meta key holding `tag`, e.g. `0x0c`
    pub fn resource_id(tag: u8) -> ResourceId {
        ResourceId::new(RUNTIME_NAMESPACE, Self::KIND, format!("0x{:02x}", tag))
    }
}

/// SMBIOS system information discovered by the runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInformation {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub serial_number: String,
}

impl SystemInformation {
    pub const KIND: &'static str = "SystemInformation";
    pub const ID: &'static str = "systeminformation";

    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Default::default()
        }
    }

    pub fn resource_id() -> ResourceId {
        ResourceId::new(HARDWARE_NAMESPACE, Self::KIND, Self::ID)
    }
}

/// Any resource the store can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum Resource {
    MetaKey(MetaKey),
    SystemInformation(SystemInformation),
}

impl Resource {
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::MetaKey(key) => MetaKey::resource_id(key.tag),
            Resource::SystemInformation(_) => SystemInformation::resource_id(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resource::MetaKey(_) => MetaKey::KIND,
            Resource::SystemInformation(_) => SystemInformation::KIND,
        }
    }
}

impl From<MetaKey> for Resource {
    fn from(key: MetaKey) -> Self {
        Resource::MetaKey(key)
    }
}

impl From<SystemInformation> for Resource {
    fn from(info: SystemInformation) -> Self {
        Resource::SystemInformation(info)
    }
}
