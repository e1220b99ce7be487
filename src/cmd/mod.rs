use cirrus_metadata::StaticMetadataClient;
use clap::Args;
use color_eyre::eyre::{Result, WrapErr};
use std::path::PathBuf;
use tokio::fs;

pub mod config;
pub mod network;
pub mod translate;
pub mod uuid;

/// Metadata documents as served by the metadata service
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Path to the instance document (JSON)
    #[arg(long)]
    pub instance: PathBuf,

    /// Path to the network document (JSON)
    #[arg(long)]
    pub network: PathBuf,
}

impl MetadataArgs {
    /// Build a client serving the two documents
    pub async fn load(&self) -> Result<StaticMetadataClient> {
        let instance = fs::read_to_string(&self.instance)
            .await
            .wrap_err_with(|| format!("Failed to read {}", self.instance.display()))?;
        let network = fs::read_to_string(&self.network)
            .await
            .wrap_err_with(|| format!("Failed to read {}", self.network.display()))?;

        StaticMetadataClient::from_json(&instance, &network).wrap_err("Failed to decode metadata")
    }
}
