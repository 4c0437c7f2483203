use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::registry::{Bucket, Flow, VersionSnapshot};
use crate::replicate::FlowSource;

pub const BUCKET_FILE: &str = "bucket.json";
pub const FLOW_FILE: &str = "flow.json";

pub fn version_file(number: u32) -> String {
    format!("version_{number}.json")
}

/// An on-disk snapshot of one flow: the bucket and flow documents plus every
/// numbered version, each written verbatim as pretty-printed JSON matching
/// the registry API schema.
#[derive(Debug)]
pub struct SnapshotDir {
    root: PathBuf,
}

impl SnapshotDir {
    /// Create a fresh snapshot directory. The path must not already exist.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            bail!(
                "directory {} already exists; choose a different snapshot location or remove it first",
                path.display()
            );
        }
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Open an existing snapshot directory for import.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            bail!("directory {} does not exist", path.display());
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn write_bucket(&self, bucket: &Bucket) -> Result<()> {
        self.write_json(BUCKET_FILE, bucket)
    }

    pub fn write_flow(&self, flow: &Flow) -> Result<()> {
        self.write_json(FLOW_FILE, flow)
    }

    pub fn write_version(&self, number: u32, version: &VersionSnapshot) -> Result<()> {
        self.write_json(&version_file(number), version)
    }

    pub fn read_bucket(&self) -> Result<Bucket> {
        self.read_json(BUCKET_FILE)
    }

    pub fn read_flow(&self) -> Result<Flow> {
        self.read_json(FLOW_FILE)
    }

    pub fn read_version(&self, number: u32) -> Result<VersionSnapshot> {
        self.read_json(&version_file(number))
    }

    fn write_json<T: Serialize>(&self, name: &str, document: &T) -> Result<()> {
        let path = self.root.join(name);
        let rendered = serde_json::to_string_pretty(document)
            .with_context(|| format!("failed to render {name}"))?;
        fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.root.join(name);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl FlowSource for SnapshotDir {
    fn fetch_bucket(&self) -> Result<Bucket> {
        self.read_bucket()
    }

    fn fetch_flow(&self) -> Result<Flow> {
        self.read_flow()
    }

    fn fetch_version(&self, number: u32) -> Result<VersionSnapshot> {
        self.read_version(number)
    }
}

/// Write the bucket, flow, and every numbered version from `source` into
/// `dir`, untouched. Rewriting happens at import time, once the target
/// identifiers are known. Returns the number of versions written.
pub fn export_to_dir(source: &dyn FlowSource, dir: &SnapshotDir) -> Result<u32> {
    let bucket = source.fetch_bucket()?;
    dir.write_bucket(&bucket)?;
    info!("exported bucket: {} ({})", bucket.name, bucket.identifier);

    let flow = source.fetch_flow()?;
    dir.write_flow(&flow)?;
    info!("exported flow: {} ({})", flow.name, flow.identifier);

    for number in 1..=flow.version_count {
        let version = source.fetch_version(number)?;
        dir.write_version(number, &version)?;
        info!("exported version: {number}");
    }
    Ok(flow.version_count)
}
