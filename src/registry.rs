use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::auth::Credentials;

/// A top-level namespace grouping flows in the registry. Fields the migration
/// does not interpret are carried verbatim in `extra` so the full document can
/// be replayed as a create payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub identifier: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named, versioned flow definition stored under a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub identifier: String,
    pub name: String,
    pub bucket_identifier: String,
    #[serde(default)]
    pub version_count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One immutable, numbered snapshot of a flow. The flow contents subtree and
/// any sibling fields live in `extra`; the migration only inspects the
/// snapshot metadata and rewrites identifiers wherever they occur.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub snapshot_metadata: SnapshotMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub version: u32,
    pub bucket_identifier: String,
    pub flow_identifier: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug)]
pub enum RegistryError {
    Http(reqwest::Error),
    Conflict(Option<String>),
    Status(StatusCode, Option<String>),
    InvalidResponse(anyhow::Error),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Http(err) => write!(f, "http error: {err}"),
            RegistryError::Conflict(body) => {
                if let Some(body) = body {
                    write!(f, "create rejected as a duplicate: {body}")
                } else {
                    write!(f, "create rejected as a duplicate")
                }
            }
            RegistryError::Status(code, body) => {
                if let Some(body) = body {
                    write!(f, "unexpected status {code}: {body}")
                } else {
                    write!(f, "unexpected status {code}")
                }
            }
            RegistryError::InvalidResponse(err) => write!(f, "invalid response: {err}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<reqwest::Error> for RegistryError {
    fn from(value: reqwest::Error) -> Self {
        RegistryError::Http(value)
    }
}

/// One authenticated session against a registry REST endpoint. Lookups return
/// `Ok(None)` for anything other than a 200 response so callers can branch on
/// existence; only transport failures surface as errors.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    credentials: Credentials,
    http: Client,
}

impl RegistryClient {
    pub fn connect(endpoint: &str, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            credentials,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get_bucket(&self, identifier: &str) -> Result<Option<Bucket>, RegistryError> {
        self.api_get(&format!("buckets/{identifier}"), false)
    }

    pub fn find_bucket_by_name(&self, name: &str) -> Result<Option<Bucket>, RegistryError> {
        let buckets: Option<Vec<Bucket>> = self.api_get("buckets", true)?;
        Ok(buckets.and_then(|buckets| buckets.into_iter().find(|bucket| bucket.name == name)))
    }

    pub fn create_bucket(&self, payload: &Bucket) -> Result<Bucket, RegistryError> {
        self.api_post("buckets", payload)
    }

    pub fn get_flow(&self, bucket_id: &str, identifier: &str) -> Result<Option<Flow>, RegistryError> {
        self.api_get(&format!("buckets/{bucket_id}/flows/{identifier}"), false)
    }

    pub fn find_flow_by_name(
        &self,
        bucket_id: &str,
        name: &str,
    ) -> Result<Option<Flow>, RegistryError> {
        let flows: Option<Vec<Flow>> = self.api_get(&format!("buckets/{bucket_id}/flows"), true)?;
        Ok(flows.and_then(|flows| flows.into_iter().find(|flow| flow.name == name)))
    }

    pub fn create_flow(&self, bucket_id: &str, payload: &Flow) -> Result<Flow, RegistryError> {
        self.api_post(&format!("buckets/{bucket_id}/flows"), payload)
    }

    /// Version lookups are always quiet: absence is the expected answer when
    /// checking whether an idempotent create can be skipped.
    pub fn get_version(
        &self,
        bucket_id: &str,
        flow_id: &str,
        number: u32,
    ) -> Result<Option<VersionSnapshot>, RegistryError> {
        self.api_get(
            &format!("buckets/{bucket_id}/flows/{flow_id}/versions/{number}"),
            true,
        )
    }

    pub fn create_version(
        &self,
        bucket_id: &str,
        flow_id: &str,
        payload: &VersionSnapshot,
    ) -> Result<VersionSnapshot, RegistryError> {
        self.api_post(&format!("buckets/{bucket_id}/flows/{flow_id}/versions"), payload)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    fn api_get<T: DeserializeOwned>(
        &self,
        path: &str,
        quiet: bool,
    ) -> Result<Option<T>, RegistryError> {
        let url = self.url(path);
        let response = self.authed(self.http.get(&url)).send()?;
        if response.status() != StatusCode::OK {
            if !quiet {
                warn!("GET {url} returned {}", response.status());
            }
            return Ok(None);
        }
        let parsed = response
            .json::<T>()
            .map_err(|err| RegistryError::InvalidResponse(err.into()))?;
        Ok(Some(parsed))
    }

    fn api_post<T, B>(&self, path: &str, payload: &B) -> Result<T, RegistryError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(path);
        let response = self.authed(self.http.post(&url)).json(payload).send()?;
        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(RegistryError::Conflict(response.text().ok()));
        }
        if status != StatusCode::OK {
            return Err(RegistryError::Status(status, response.text().ok()));
        }
        response
            .json::<T>()
            .map_err(|err| RegistryError::InvalidResponse(err.into()))
    }
}
