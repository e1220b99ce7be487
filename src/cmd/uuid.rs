use cirrus_platform::generate_linode_uuid;
use clap::Args;
use color_eyre::eyre::{bail, Result};

#[derive(Args, Debug)]
pub struct UuidArgs {
    /// Linode instance id
    pub linode_id: i64,
}

pub fn run(args: UuidArgs) -> Result<()> {
    if args.linode_id <= 0 {
        bail!("Linode id must be positive, got {}", args.linode_id);
    }

    println!("{}", generate_linode_uuid(args.linode_id));
    Ok(())
}
