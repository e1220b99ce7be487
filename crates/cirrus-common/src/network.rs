//! Platform network configuration
//!
//! The specs a platform produces for the node runtime to apply: hostnames,
//! addresses, routes, plus external IPs and a descriptive metadata summary.

use crate::error::NetworkError;
use crate::nethelpers::{AddressFlags, ConfigLayer, Family, RouteProtocol, RouteType, RoutingTable, Scope};
use crate::Result;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Metric assigned to routes that do not set one
pub const DEFAULT_ROUTE_METRIC: u32 = 1024;

const MAX_FQDN_LEN: usize = 253;
const MAX_HOSTNAME_LEN: usize = 63;

/// Hostname and domain name, split from an FQDN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameSpec {
    pub hostname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domainname: String,
    pub config_layer: ConfigLayer,
}

impl HostnameSpec {
    /// Split `fqdn` at its first dot
    ///
    /// Fails if the whole name exceeds 253 bytes, or the host part is empty
    /// or exceeds 63 bytes.
    pub fn parse_fqdn(fqdn: &str, config_layer: ConfigLayer) -> Result<Self> {
        if fqdn.len() > MAX_FQDN_LEN {
            return Err(NetworkError::FqdnTooLong(fqdn.len()));
        }

        let (hostname, domainname) = fqdn.split_once('.').unwrap_or((fqdn, ""));

        if hostname.is_empty() {
            return Err(NetworkError::EmptyHostname(fqdn.to_string()));
        }

        if hostname.len() > MAX_HOSTNAME_LEN {
            return Err(NetworkError::HostnameTooLong(hostname.len()));
        }

        Ok(Self {
            hostname: hostname.to_string(),
            domainname: domainname.to_string(),
            config_layer,
        })
    }

    pub fn fqdn(&self) -> String {
        if self.domainname.is_empty() {
            self.hostname.clone()
        } else {
            format!("{}.{}", self.hostname, self.domainname)
        }
    }
}

/// An address to assign to a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpec {
    pub address: IpNetwork,
    pub link_name: String,
    pub family: Family,
    pub scope: Scope,
    pub flags: AddressFlags,
    pub config_layer: ConfigLayer,
}

/// A route to install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub family: Family,
    /// `None` is the default route
    pub destination: Option<IpNetwork>,
    pub source: Option<IpAddr>,
    pub gateway: Option<IpAddr>,
    pub out_link_name: String,
    pub table: RoutingTable,
    pub priority: u32,
    pub scope: Scope,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub protocol: RouteProtocol,
    #[serde(default)]
    pub mtu: u32,
    pub config_layer: ConfigLayer,
}

impl RouteSpec {
    pub fn new(config_layer: ConfigLayer) -> Self {
        Self {
            family: Family::Unspec,
            destination: None,
            source: None,
            gateway: None,
            out_link_name: String::new(),
            table: RoutingTable::Unspec,
            priority: 0,
            scope: Scope::Global,
            route_type: RouteType::Unspec,
            protocol: RouteProtocol::Unspec,
            mtu: 0,
            config_layer,
        }
    }

    /// Canonicalize the route and return its family
    ///
    /// A zero-length destination becomes the default route, an unspecified
    /// gateway is dropped, an unset family is inferred from the addresses and
    /// an unset priority becomes [`DEFAULT_ROUTE_METRIC`]. Routes through a
    /// gateway get global scope, on-link routes get link scope.
    pub fn normalize(&mut self) -> Family {
        if self.destination.is_some_and(|dst| dst.prefix() == 0) {
            self.destination = None;
        }

        if self.gateway.is_some_and(|gw| gw.is_unspecified()) {
            self.gateway = None;
        }

        let is_v6 = self.destination.is_some_and(|dst| dst.is_ipv6())
            || self.source.is_some_and(|src| src.is_ipv6())
            || self.gateway.is_some_and(|gw| gw.is_ipv6());

        let family = if is_v6 { Family::Inet6 } else { Family::Inet4 };

        if self.family == Family::Unspec {
            self.family = family;
        }

        if self.priority == 0 {
            self.priority = DEFAULT_ROUTE_METRIC;
        }

        if self.gateway.is_some() {
            self.scope = Scope::Global;
        } else if self.destination.is_some() {
            self.scope = Scope::Link;
        }

        family
    }
}

/// Descriptive facts about the instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetadata {
    pub platform: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_id: String,
    #[serde(default)]
    pub spot: bool,
}

/// Everything a platform contributes to the node's network configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformNetworkConfig {
    pub hostnames: Vec<HostnameSpec>,
    pub addresses: Vec<AddressSpec>,
    pub routes: Vec<RouteSpec>,
    #[serde(rename = "externalIPs")]
    pub external_ips: Vec<IpAddr>,
    pub metadata: Option<PlatformMetadata>,
}
