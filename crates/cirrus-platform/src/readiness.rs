//! Network readiness precondition
//!
//! Metadata requests only make sense once the primary link is up and has
//! an address. How that is detected belongs to the node runtime; the adapter
//! just waits on a [`NetworkReadiness`].

use crate::error::Result;
use async_trait::async_trait;
use cirrus_common::Context;

/// Waits until the network can reach the metadata service
#[async_trait]
pub trait NetworkReadiness: Send + Sync {
    /// Block until the network is ready or `ctx` is done
    async fn wait(&self, ctx: &Context) -> Result<()>;
}

/// Readiness that is satisfied immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

#[async_trait]
impl NetworkReadiness for AlwaysReady {
    async fn wait(&self, ctx: &Context) -> Result<()> {
        ctx.check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use cirrus_common::ContextError;

    #[tokio::test]
    async fn test_always_ready() {
        assert!(AlwaysReady.wait(&Context::background()).await.is_ok());

        let (_tx, rx) = tokio::sync::watch::channel(true);
        let err = AlwaysReady.wait(&Context::new(rx)).await.unwrap_err();
        assert!(matches!(err, PlatformError::Cancelled(ContextError::Cancelled)));
    }
}
