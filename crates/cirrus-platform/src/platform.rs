//! Platform contract

use crate::error::Result;
use async_trait::async_trait;
use cirrus_common::{Context, Mode, PlatformNetworkConfig};
use tokio::sync::mpsc;

/// A cloud or metal platform the node can boot on
#[async_trait]
pub trait Platform: Send + Sync {
    /// Short platform name, e.g. `akamai`
    fn name(&self) -> &'static str;

    fn mode(&self) -> Mode;

    /// Fetch the raw machine configuration
    async fn configuration(&self, ctx: &Context) -> Result<Vec<u8>>;

    /// Produce one network config and hand it to `ch`
    ///
    /// The send races `ctx`: either the config is delivered or the call
    /// returns a cancellation error.
    async fn network_configuration(
        &self,
        ctx: &Context,
        ch: &mpsc::Sender<PlatformNetworkConfig>,
    ) -> Result<()>;
}
