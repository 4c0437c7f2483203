use anyhow::Result;

use crate::auth::{Credentials, EndpointRole};
use crate::cli::ExportArgs;
use crate::registry::RegistryClient;
use crate::replicate::LiveSource;
use crate::snapshot::{SnapshotDir, export_to_dir};

pub fn run(args: &ExportArgs) -> Result<()> {
    // Directory precondition comes first so a typo fails before anyone types
    // a password.
    let dir = SnapshotDir::create(&args.save_dir)?;

    let credentials = Credentials::acquire(EndpointRole::Source)?;
    let client = RegistryClient::connect(&args.source_url, credentials)?;
    let source = LiveSource {
        client: &client,
        bucket_id: args.bucket_id.clone(),
        flow_id: args.flow_id.clone(),
    };

    let version_count = export_to_dir(&source, &dir)?;
    println!(
        "Exported {} version(s) to {}",
        version_count,
        dir.path().display()
    );
    Ok(())
}
