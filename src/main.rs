// Main binary that drives the Akamai platform adapter from metadata fixtures
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::stderr;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

mod cmd;

#[derive(Parser, Debug)]
#[command(author, version, about = "Akamai metadata adapter for node network bootstrap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one network configuration cycle and print the resulting config
    Network(cmd::network::NetworkArgs),
    /// Translate metadata documents without touching the store
    Translate(cmd::MetadataArgs),
    /// Print the machine configuration served as user-data
    Config(cmd::MetadataArgs),
    /// Print the synthetic SMBIOS UUID for a Linode id
    Uuid(cmd::uuid::UuidArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Respect RUST_LOG, fall back to verbose/info for our crates. Logs go to
    // stderr so stdout carries only command output.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "cirrus={level},cirrus_platform={level},cirrus_store={level},cirrus_metadata={level}",
        level = default_level
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    registry().with(filter).with(fmt::layer().with_writer(stderr)).init();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, sending shutdown signal...");
            let _ = shutdown_tx.send(true);
        }
    });

    match cli.command {
        Commands::Network(args) => cmd::network::run(args, shutdown_rx).await,
        Commands::Translate(args) => cmd::translate::run(args).await,
        Commands::Config(args) => cmd::config::run(args, shutdown_rx).await,
        Commands::Uuid(args) => cmd::uuid::run(args),
    }
}
