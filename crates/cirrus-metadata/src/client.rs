//! Metadata client contract
//!
//! The adapter never talks HTTP itself. It fetches through a
//! [`MetadataClient`], and every call observes the caller's [`Context`].

use crate::error::Result;
use crate::types::{InstanceMetadata, NetworkMetadata};
use async_trait::async_trait;
use cirrus_common::Context;

/// Source of instance metadata
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Fetch the instance document
    async fn get_instance(&self, ctx: &Context) -> Result<InstanceMetadata>;

    /// Fetch the network document
    async fn get_network(&self, ctx: &Context) -> Result<NetworkMetadata>;

    /// Fetch user-data; an empty string means none was configured
    async fn get_user_data(&self, ctx: &Context) -> Result<String>;
}

/// Client serving fixed documents
#[derive(Debug, Clone)]
pub struct StaticMetadataClient {
    instance: InstanceMetadata,
    network: NetworkMetadata,
}

impl StaticMetadataClient {
    pub fn new(instance: InstanceMetadata, network: NetworkMetadata) -> Self {
        Self { instance, network }
    }

    /// Decode both documents from their JSON form
    pub fn from_json(instance: &str, network: &str) -> Result<Self> {
        Ok(Self {
            instance: serde_json::from_str(instance)?,
            network: serde_json::from_str(network)?,
        })
    }

    pub fn instance(&self) -> &InstanceMetadata {
        &self.instance
    }

    pub fn network(&self) -> &NetworkMetadata {
        &self.network
    }
}

#[async_trait]
impl MetadataClient for StaticMetadataClient {
    async fn get_instance(&self, ctx: &Context) -> Result<InstanceMetadata> {
        ctx.check()?;
        Ok(self.instance.clone())
    }

    async fn get_network(&self, ctx: &Context) -> Result<NetworkMetadata> {
        ctx.check()?;
        Ok(self.network.clone())
    }

    async fn get_user_data(&self, ctx: &Context) -> Result<String> {
        ctx.check()?;
        Ok(self.instance.user_data.clone().unwrap_or_default())
    }
}
