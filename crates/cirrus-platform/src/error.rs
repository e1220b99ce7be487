//! Error types for the platform adapter
//!
//! Each stage of a network configuration cycle wraps the error of the stage
//! below it with a short prefix, so the caller sees e.g.
//! `parse metadata: invalid hostname "..."`.

use cirrus_common::{ContextError, NetworkError};
use cirrus_metadata::MetadataError;
use cirrus_store::StoreError;
use ipnetwork::IpNetwork;
use std::net::AddrParseError;
use thiserror::Error;

/// Metadata could not be translated into a network config
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("invalid hostname {label:?}: {source}")]
    InvalidHostname {
        label: String,
        #[source]
        source: NetworkError,
    },

    #[error("invalid IPv6 gateway {candidate:?} derived from link-local {link_local}: {source}")]
    InvalidGateway {
        candidate: String,
        link_local: IpNetwork,
        #[source]
        source: AddrParseError,
    },
}

/// The UUID override could not be reconciled
#[derive(Debug, Error)]
pub enum UuidError {
    #[error("failed to get UUID override: {0}")]
    ReadOverride(#[source] StoreError),

    #[error("failed to get system information: {0}")]
    SystemInformation(#[source] StoreError),

    #[error("failed to create UUID override for invalid SMBIOS UUID {uuid:?}: {source}")]
    CreateOverride {
        uuid: String,
        #[source]
        source: StoreError,
    },
}

/// Error type for platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("wait for network: {0}")]
    NetworkWait(String),

    #[error("get instance data: {0}")]
    GetInstance(#[source] MetadataError),

    #[error("failed to ensure valid UUID: {0}")]
    EnsureUuid(#[from] UuidError),

    #[error("get network data: {0}")]
    GetNetwork(#[source] MetadataError),

    #[error("parse metadata: {0}")]
    ParseMetadata(#[from] TranslateError),

    #[error("get user data: {0}")]
    GetUserData(#[source] MetadataError),

    #[error("no configuration source")]
    NoConfigSource,

    #[error("network config receiver closed")]
    ChannelClosed,

    #[error(transparent)]
    Cancelled(#[from] ContextError),
}

impl PlatformError {
    /// Whether the cycle was aborted by its context rather than a failure
    pub fn is_cancelled(&self) -> bool {
        let metadata_cancelled = |e: &MetadataError| matches!(e, MetadataError::Cancelled(_));
        let store_cancelled = |e: &StoreError| matches!(e, StoreError::Cancelled(_));

        match self {
            PlatformError::Cancelled(_) => true,
            PlatformError::GetInstance(e)
            | PlatformError::GetNetwork(e)
            | PlatformError::GetUserData(e) => metadata_cancelled(e),
            PlatformError::EnsureUuid(UuidError::ReadOverride(e))
            | PlatformError::EnsureUuid(UuidError::SystemInformation(e))
            | PlatformError::EnsureUuid(UuidError::CreateOverride { source: e, .. }) => {
                store_cancelled(e)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
