//! Metadata to network config translation
//!
//! Pure function from the instance and network documents to the
//! [`PlatformNetworkConfig`] the node runtime applies. Every emitted entry is tagged
//! with the platform config layer and bound to the primary link.
//!
//! | source | scope | flags | family |
//! |--------|-------|-------|--------|
//! | `ipv4.public`, `ipv4.private` | global | permanent | inet4 |
//! | `ipv6.ranges` | global | managetempaddr | inet6 |
//! | `ipv6.link_local` | link | none | inet6 |
//!
//! The IPv6 default gateway is not advertised by the metadata service. It is
//! derived from the link-local address: the first colon-separated group
//! followed by `::1`, so `fe80::abcd:1/64` routes via `fe80::1`.

use crate::error::TranslateError;
use cirrus_common::{
    AddressFlags, AddressSpec, ConfigLayer, Family, HostnameSpec, PlatformMetadata,
    PlatformNetworkConfig, RouteProtocol, RouteSpec, RouteType, RoutingTable, Scope,
};
use cirrus_metadata::{InstanceMetadata, NetworkMetadata};
use ipnetwork::IpNetwork;
use std::net::IpAddr;
use tracing::debug;

/// Platform name reported in metadata
pub const PLATFORM_NAME: &str = "akamai";

/// Link every platform address and route is bound to
pub const PRIMARY_LINK: &str = "eth0";

/// Metric of the derived IPv6 route
pub const IPV6_ROUTE_PRIORITY: u32 = 1024;

/// Translate instance and network metadata into a network config
///
/// A malformed label or derived gateway fails the whole translation.
pub fn parse_metadata(
    instance: &InstanceMetadata,
    network: &NetworkMetadata,
) -> Result<PlatformNetworkConfig, TranslateError> {
    let mut config = PlatformNetworkConfig::default();

    if !instance.label.is_empty() {
        let hostname = HostnameSpec::parse_fqdn(&instance.label, ConfigLayer::Platform).map_err(
            |source| TranslateError::InvalidHostname {
                label: instance.label.clone(),
                source,
            },
        )?;
        config.hostnames.push(hostname);
    }

    let ipv4 = network.ipv4.public.iter().chain(&network.ipv4.private);
    for address in ipv4 {
        config.addresses.push(platform_address(
            *address,
            Scope::Global,
            AddressFlags::PERMANENT,
            Family::Inet4,
        ));
    }

    for range in &network.ipv6.ranges {
        config.addresses.push(platform_address(
            *range,
            Scope::Global,
            AddressFlags::MANAGETEMPADDR,
            Family::Inet6,
        ));
    }

    let link_local = network.ipv6.link_local;
    config.addresses.push(platform_address(
        link_local,
        Scope::Link,
        AddressFlags::empty(),
        Family::Inet6,
    ));

    let mut route = RouteSpec::new(ConfigLayer::Platform);
    route.gateway = Some(link_local_gateway(&link_local)?);
    route.out_link_name = PRIMARY_LINK.to_string();
    route.destination = Some(link_local);
    route.table = RoutingTable::Main;
    route.protocol = RouteProtocol::Static;
    route.route_type = RouteType::Unicast;
    route.family = Family::Inet6;
    route.priority = IPV6_ROUTE_PRIORITY;
    route.normalize();
    config.routes.push(route);

    config.external_ips = network
        .ipv4
        .public
        .iter()
        .chain(&network.ipv6.ranges)
        .map(IpNetwork::ip)
        .collect();

    config.metadata = Some(PlatformMetadata {
        platform: PLATFORM_NAME.to_string(),
        hostname: instance.label.clone(),
        region: instance.region.clone(),
        instance_type: instance.instance_type.clone(),
        instance_id: instance.id.to_string(),
        provider_id: format!("linode://{}", instance.id),
        ..Default::default()
    });

    debug!(
        addresses = config.addresses.len(),
        external_ips = config.external_ips.len(),
        "translated platform metadata"
    );

    Ok(config)
}

fn platform_address(
    address: IpNetwork,
    scope: Scope,
    flags: AddressFlags,
    family: Family,
) -> AddressSpec {
    AddressSpec {
        address,
        link_name: PRIMARY_LINK.to_string(),
        family,
        scope,
        flags,
        config_layer: ConfigLayer::Platform,
    }
}

/// First group of the link-local address with `::1` appended
fn link_local_gateway(link_local: &IpNetwork) -> Result<IpAddr, TranslateError> {
    let text = link_local.to_string();
    let first_group = text.split(':').next().unwrap_or_default();
    let candidate = format!("{}::1", first_group);

    candidate
        .parse()
        .map_err(|source| TranslateError::InvalidGateway {
            candidate,
            link_local: *link_local,
            source,
        })
}
