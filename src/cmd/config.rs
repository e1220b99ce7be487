use super::MetadataArgs;
use cirrus_common::Context;
use cirrus_platform::{Akamai, Platform};
use cirrus_store::MemoryStore;
use color_eyre::eyre::{Result, WrapErr};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::watch;

pub async fn run(args: MetadataArgs, shutdown: watch::Receiver<bool>) -> Result<()> {
    let client = args.load().await?;
    let platform = Akamai::new(Arc::new(client), Arc::new(MemoryStore::new()));

    let config = platform
        .configuration(&Context::new(shutdown))
        .await
        .wrap_err("Failed to fetch machine configuration")?;

    std::io::stdout().write_all(&config)?;
    Ok(())
}
