use super::MetadataArgs;
use cirrus_common::Context;
use cirrus_platform::{Akamai, Platform};
use cirrus_store::{get_meta_key, meta, MemoryStore, ResourceStore, SystemInformation};
use clap::Args;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct NetworkArgs {
    #[command(flatten)]
    pub metadata: MetadataArgs,

    /// SMBIOS UUID the node reports; omit to simulate early boot
    #[arg(long)]
    pub system_uuid: Option<String>,

    /// Abort the cycle after this many seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

pub async fn run(args: NetworkArgs, shutdown: watch::Receiver<bool>) -> Result<()> {
    let client = args.metadata.load().await?;
    let ctx = Context::new(shutdown).with_timeout(Duration::from_secs(args.timeout_secs));

    let store = Arc::new(MemoryStore::new());
    if let Some(uuid) = args.system_uuid {
        store
            .create(&ctx, SystemInformation::new(uuid).into())
            .await
            .wrap_err("Failed to seed system information")?;
    }

    let platform = Akamai::new(Arc::new(client), store.clone());
    let (tx, mut rx) = mpsc::channel(1);

    platform
        .network_configuration(&ctx, &tx)
        .await
        .wrap_err("Network configuration failed")?;
    drop(tx);

    let config = rx
        .recv()
        .await
        .ok_or_else(|| eyre!("No network config was produced"))?;

    match get_meta_key(store.as_ref(), &ctx, meta::UUID_OVERRIDE).await {
        Ok(key) => info!(uuid = %key.value, "UUID override in effect"),
        Err(e) if e.is_not_found() => debug!("No UUID override needed"),
        Err(e) => return Err(e).wrap_err("Failed to read UUID override"),
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
