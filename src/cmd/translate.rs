use super::MetadataArgs;
use cirrus_platform::parse_metadata;
use color_eyre::eyre::{Result, WrapErr};

pub async fn run(args: MetadataArgs) -> Result<()> {
    let client = args.load().await?;

    let config = parse_metadata(client.instance(), client.network())
        .wrap_err("Failed to translate metadata")?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
