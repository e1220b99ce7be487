//! Akamai platform
//!
//! Sequences one network configuration cycle against the metadata service
//! and the resource store, and serves user-data as the machine config.

use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use crate::readiness::{AlwaysReady, NetworkReadiness};
use crate::translate::{parse_metadata, PLATFORM_NAME};
use crate::uuid::ensure_valid_uuid;
use async_trait::async_trait;
use cirrus_common::{Context, Mode, PlatformNetworkConfig};
use cirrus_metadata::MetadataClient;
use cirrus_store::ResourceStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Akamai (Linode) platform
pub struct Akamai {
    client: Arc<dyn MetadataClient>,
    store: Arc<dyn ResourceStore>,
    readiness: Arc<dyn NetworkReadiness>,
}

impl Akamai {
    /// Create the platform over a metadata client and resource store
    pub fn new(client: Arc<dyn MetadataClient>, store: Arc<dyn ResourceStore>) -> Self {
        Self {
            client,
            store,
            readiness: Arc::new(AlwaysReady),
        }
    }

    /// Set the network readiness precondition
    pub fn with_readiness(mut self, readiness: Arc<dyn NetworkReadiness>) -> Self {
        self.readiness = readiness;
        self
    }

    /// Get the resource store
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }
}

#[async_trait]
impl Platform for Akamai {
    fn name(&self) -> &'static str {
        PLATFORM_NAME
    }

    fn mode(&self) -> Mode {
        Mode::Cloud
    }

    async fn configuration(&self, ctx: &Context) -> Result<Vec<u8>> {
        self.readiness.wait(ctx).await?;

        let user_data = self
            .client
            .get_user_data(ctx)
            .await
            .map_err(PlatformError::GetUserData)?;

        if user_data.is_empty() {
            return Err(PlatformError::NoConfigSource);
        }

        Ok(user_data.into_bytes())
    }

    async fn network_configuration(
        &self,
        ctx: &Context,
        ch: &mpsc::Sender<PlatformNetworkConfig>,
    ) -> Result<()> {
        self.readiness.wait(ctx).await?;

        let instance = self
            .client
            .get_instance(ctx)
            .await
            .map_err(PlatformError::GetInstance)?;

        debug!(linode_id = instance.id, region = %instance.region, "fetched instance metadata");

        ensure_valid_uuid(self.store.as_ref(), ctx, instance.id).await?;

        let network = self
            .client
            .get_network(ctx)
            .await
            .map_err(PlatformError::GetNetwork)?;

        let config = parse_metadata(&instance, &network)?;

        info!(
            linode_id = instance.id,
            addresses = config.addresses.len(),
            routes = config.routes.len(),
            "sending platform network config"
        );

        tokio::select! {
            biased;
            err = ctx.done() => Err(PlatformError::Cancelled(err)),
            sent = ch.send(config) => sent.map_err(|_| PlatformError::ChannelClosed),
        }
    }
}
