//! Network enums and flags
//!
//! Numeric values match the Linux rtnetlink constants so a config applier
//! can pass them through unchanged.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Family {
    #[default]
    Unspec = 0,
    Inet4 = 2,
    Inet6 = 10,
}

/// Address and route scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Scope {
    #[default]
    Global = 0,
    Site = 200,
    Link = 253,
    Host = 254,
    Nowhere = 255,
}

/// Routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RoutingTable {
    #[default]
    Unspec = 0,
    Default = 253,
    Main = 254,
    Local = 255,
}

/// Who installed a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RouteProtocol {
    #[default]
    Unspec = 0,
    Redirect = 1,
    Kernel = 2,
    Boot = 3,
    Static = 4,
}

/// Route type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RouteType {
    #[default]
    Unspec = 0,
    Unicast = 1,
    Local = 2,
    Broadcast = 3,
    Anycast = 4,
    Multicast = 5,
    Blackhole = 6,
    Unreachable = 7,
    Prohibit = 8,
}

/// Provenance of a configuration item
///
/// Later layers override earlier ones when the runtime merges specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLayer {
    #[default]
    Default,
    Cmdline,
    Platform,
    Operator,
    Configuration,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigLayer::Default => "default",
            ConfigLayer::Cmdline => "cmdline",
            ConfigLayer::Platform => "platform",
            ConfigLayer::Operator => "operator",
            ConfigLayer::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Address flags (IFA_F_*)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AddressFlags: u32 {
        const TEMPORARY = 0x01;
        const NODAD = 0x02;
        const OPTIMISTIC = 0x04;
        const DADFAILED = 0x08;
        const HOMEADDRESS = 0x10;
        const DEPRECATED = 0x20;
        const TENTATIVE = 0x40;
        const PERMANENT = 0x80;
        /// Kernel manages temporary (privacy) addresses derived from this one
        const MANAGETEMPADDR = 0x100;
        const NOPREFIXROUTE = 0x200;
        const MCAUTOJOIN = 0x400;
        const STABLE_PRIVACY = 0x800;
    }
}

/// Operating mode reported by a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cloud,
    Container,
    Metal,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Cloud => "cloud",
            Mode::Container => "container",
            Mode::Metal => "metal",
        };
        f.write_str(name)
    }
}
