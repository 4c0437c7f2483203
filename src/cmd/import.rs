use anyhow::Result;

use crate::auth::{Credentials, EndpointRole};
use crate::cli::ImportArgs;
use crate::registry::RegistryClient;
use crate::replicate::Replicator;
use crate::snapshot::SnapshotDir;

pub fn run(args: &ImportArgs) -> Result<()> {
    let dir = SnapshotDir::open(&args.save_dir)?;

    let credentials = Credentials::acquire(EndpointRole::Target)?;
    let target = RegistryClient::connect(&args.target_url, credentials)?;

    let report = Replicator::new(&dir, &target).run()?;
    super::print_report("Import complete", &report);
    Ok(())
}
