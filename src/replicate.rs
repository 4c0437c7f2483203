use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::registry::{Bucket, Flow, RegistryClient, VersionSnapshot};
use crate::rewrite::rewrite_identifiers;

/// Where source-side documents come from: a live registry for direct copies
/// and exports, or an on-disk snapshot for imports. Every fetch is a required
/// read, so absence is fatal rather than an `Option`.
pub trait FlowSource {
    fn fetch_bucket(&self) -> Result<Bucket>;
    fn fetch_flow(&self) -> Result<Flow>;
    fn fetch_version(&self, number: u32) -> Result<VersionSnapshot>;
}

/// A bucket and flow addressed on a live registry.
pub struct LiveSource<'a> {
    pub client: &'a RegistryClient,
    pub bucket_id: String,
    pub flow_id: String,
}

impl FlowSource for LiveSource<'_> {
    fn fetch_bucket(&self) -> Result<Bucket> {
        self.client.get_bucket(&self.bucket_id)?.ok_or_else(|| {
            anyhow!(
                "bucket {} not found on {}",
                self.bucket_id,
                self.client.base_url()
            )
        })
    }

    fn fetch_flow(&self) -> Result<Flow> {
        self.client
            .get_flow(&self.bucket_id, &self.flow_id)?
            .ok_or_else(|| {
                anyhow!(
                    "flow {} not found in bucket {} on {}",
                    self.flow_id,
                    self.bucket_id,
                    self.client.base_url()
                )
            })
    }

    fn fetch_version(&self, number: u32) -> Result<VersionSnapshot> {
        self.client
            .get_version(&self.bucket_id, &self.flow_id, number)?
            .ok_or_else(|| {
                anyhow!(
                    "version {} of flow {} not found on {}",
                    number,
                    self.flow_id,
                    self.client.base_url()
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    AlreadyPresent,
}

/// Matched source and target copies of one entity.
#[derive(Debug, Clone)]
pub struct Pair<T> {
    pub source: T,
    pub target: T,
}

#[derive(Debug)]
pub struct ReplicationReport {
    pub bucket: SyncOutcome,
    pub flow: SyncOutcome,
    pub versions: Vec<(u32, SyncOutcome)>,
}

impl ReplicationReport {
    pub fn versions_created(&self) -> usize {
        self.versions
            .iter()
            .filter(|(_, outcome)| *outcome == SyncOutcome::Created)
            .count()
    }

    pub fn versions_skipped(&self) -> usize {
        self.versions.len() - self.versions_created()
    }
}

/// Copies one bucket, one flow, and every numbered version of that flow onto
/// a target registry, rewriting source identifiers to their target
/// equivalents along the way. Each stage reuses entities that already exist
/// on the target, so reruns create nothing.
pub struct Replicator<'a> {
    source: &'a dyn FlowSource,
    target: &'a RegistryClient,
}

impl<'a> Replicator<'a> {
    pub fn new(source: &'a dyn FlowSource, target: &'a RegistryClient) -> Self {
        Self { source, target }
    }

    /// Run the full bucket -> flow -> versions sequence.
    pub fn run(&self) -> Result<ReplicationReport> {
        let (buckets, bucket) = self.sync_bucket()?;
        let (flows, flow) = self.sync_flow(&buckets)?;
        let versions = self.sync_versions(&buckets, &flows)?;
        Ok(ReplicationReport {
            bucket,
            flow,
            versions,
        })
    }

    pub fn sync_bucket(&self) -> Result<(Pair<Bucket>, SyncOutcome)> {
        let source = self.source.fetch_bucket()?;
        let (target, outcome) = match self.target.find_bucket_by_name(&source.name)? {
            Some(existing) => {
                info!("bucket {} already exists on the target", existing.name);
                (existing, SyncOutcome::AlreadyPresent)
            }
            None => {
                info!("creating bucket {}", source.name);
                let created = self
                    .target
                    .create_bucket(&source)
                    .context("failed to create bucket on the target")?;
                (created, SyncOutcome::Created)
            }
        };
        info!("bucket: {} ({})", target.name, target.identifier);
        Ok((Pair { source, target }, outcome))
    }

    pub fn sync_flow(&self, buckets: &Pair<Bucket>) -> Result<(Pair<Flow>, SyncOutcome)> {
        let source = self.source.fetch_flow()?;
        // A flow document embeds its owning bucket identifier.
        let rewritten: Flow = rewrite_identifiers(
            &source,
            &[(
                buckets.source.identifier.clone(),
                buckets.target.identifier.clone(),
            )],
        )?;
        let (target, outcome) = match self
            .target
            .find_flow_by_name(&buckets.target.identifier, &rewritten.name)?
        {
            Some(existing) => {
                info!("flow {} already exists on the target", existing.name);
                (existing, SyncOutcome::AlreadyPresent)
            }
            None => {
                info!("creating flow {}", rewritten.name);
                let created = self
                    .target
                    .create_flow(&buckets.target.identifier, &rewritten)
                    .context("failed to create flow on the target")?;
                (created, SyncOutcome::Created)
            }
        };
        info!("flow: {} ({})", target.name, target.identifier);
        Ok((Pair { source, target }, outcome))
    }

    /// Versions are copied in order 1..=versionCount; later versions may build
    /// on earlier ones, and version numbers are positional. A version that
    /// fails to create halts the run.
    pub fn sync_versions(
        &self,
        buckets: &Pair<Bucket>,
        flows: &Pair<Flow>,
    ) -> Result<Vec<(u32, SyncOutcome)>> {
        let mappings = [
            (
                buckets.source.identifier.clone(),
                buckets.target.identifier.clone(),
            ),
            (
                flows.source.identifier.clone(),
                flows.target.identifier.clone(),
            ),
        ];
        let mut outcomes = Vec::with_capacity(flows.source.version_count as usize);
        for number in 1..=flows.source.version_count {
            let payload: VersionSnapshot =
                rewrite_identifiers(&self.source.fetch_version(number)?, &mappings)?;
            let existing =
                self.target
                    .get_version(&buckets.target.identifier, &flows.target.identifier, number)?;
            let outcome = if existing.is_some() {
                info!("version {number} already exists on the target");
                SyncOutcome::AlreadyPresent
            } else {
                info!("creating version {number}");
                let created = self
                    .target
                    .create_version(&buckets.target.identifier, &flows.target.identifier, &payload)
                    .with_context(|| format!("failed to create version {number} on the target"))?;
                info!("version: {}", created.snapshot_metadata.version);
                SyncOutcome::Created
            };
            outcomes.push((number, outcome));
        }
        Ok(outcomes)
    }
}
