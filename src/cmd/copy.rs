use anyhow::Result;

use crate::auth::{Credentials, EndpointRole};
use crate::cli::CopyArgs;
use crate::registry::RegistryClient;
use crate::replicate::{LiveSource, Replicator};

pub fn run(args: &CopyArgs) -> Result<()> {
    // Both credential sets are captured up front, before any network call.
    let source_credentials = Credentials::acquire(EndpointRole::Source)?;
    let target_credentials = Credentials::acquire(EndpointRole::Target)?;

    let source_client = RegistryClient::connect(&args.source_url, source_credentials)?;
    let target = RegistryClient::connect(&args.target_url, target_credentials)?;
    let source = LiveSource {
        client: &source_client,
        bucket_id: args.bucket_id.clone(),
        flow_id: args.flow_id.clone(),
    };

    let report = Replicator::new(&source, &target).run()?;
    super::print_report("Copy complete", &report);
    Ok(())
}
