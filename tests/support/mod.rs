#![allow(dead_code)]

use flowreg_sync::auth::Credentials;
use flowreg_sync::registry::RegistryClient;
use httpmock::{Mock, MockServer};
use serde_json::{Value, json};

pub const SRC_BUCKET_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const SRC_FLOW_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const DST_BUCKET_ID: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
pub const DST_FLOW_ID: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";

pub fn credentials() -> Credentials {
    Credentials {
        username: "admin".into(),
        password: "hunter2".into(),
    }
}

pub fn client(base_url: &str) -> RegistryClient {
    RegistryClient::connect(base_url, credentials()).unwrap()
}

pub fn bucket_doc(id: &str) -> Value {
    json!({
        "identifier": id,
        "name": "prod-flows",
        "description": "production flow definitions"
    })
}

pub fn flow_doc(id: &str, bucket_id: &str, version_count: u32) -> Value {
    json!({
        "identifier": id,
        "name": "ingest-pipeline",
        "bucketIdentifier": bucket_id,
        "versionCount": version_count,
        "description": "main ingest pipeline"
    })
}

/// A version document with the owning identifiers at the top level and again
/// three levels deep inside the flow contents, including inside a longer
/// link string.
pub fn version_doc(bucket_id: &str, flow_id: &str, number: u32) -> Value {
    json!({
        "snapshotMetadata": {
            "version": number,
            "bucketIdentifier": bucket_id,
            "flowIdentifier": flow_id,
            "comments": format!("revision {number}"),
            "link": format!("buckets/{bucket_id}/flows/{flow_id}/versions/{number}")
        },
        "flowContents": {
            "identifier": "root-group",
            "name": "root",
            "processGroups": [{
                "identifier": "child-group",
                "versionedFlowCoordinates": {
                    "bucketId": bucket_id,
                    "flowId": flow_id,
                    "version": number
                }
            }]
        }
    })
}

/// Mock a source registry holding one bucket, one flow, and `version_count`
/// versions.
pub fn mock_source(server: &MockServer, version_count: u32) {
    server.mock(|when, then| {
        when.method("GET").path(format!("/buckets/{SRC_BUCKET_ID}"));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(bucket_doc(SRC_BUCKET_ID));
    });
    server.mock(|when, then| {
        when.method("GET")
            .path(format!("/buckets/{SRC_BUCKET_ID}/flows/{SRC_FLOW_ID}"));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(flow_doc(SRC_FLOW_ID, SRC_BUCKET_ID, version_count));
    });
    for number in 1..=version_count {
        server.mock(|when, then| {
            when.method("GET").path(format!(
                "/buckets/{SRC_BUCKET_ID}/flows/{SRC_FLOW_ID}/versions/{number}"
            ));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(version_doc(SRC_BUCKET_ID, SRC_FLOW_ID, number));
        });
    }
}

pub struct TargetMocks<'a> {
    pub bucket_create: Mock<'a>,
    pub flow_create: Mock<'a>,
    pub version_creates: Vec<Mock<'a>>,
}

/// Mock an empty target registry. Create endpoints match the exact payloads a
/// correct replication sends: the source bucket document verbatim, the flow
/// document with its bucket identifier rewritten, and each version document
/// with both identifiers rewritten. Anything else misses the mock and fails
/// the run.
pub fn mock_empty_target(server: &MockServer, version_count: u32) -> TargetMocks<'_> {
    server.mock(|when, then| {
        when.method("GET").path("/buckets");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([]));
    });
    let bucket_create = server.mock(|when, then| {
        when.method("POST")
            .path("/buckets")
            .json_body(bucket_doc(SRC_BUCKET_ID));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(bucket_doc(DST_BUCKET_ID));
    });
    server.mock(|when, then| {
        when.method("GET").path(format!("/buckets/{DST_BUCKET_ID}/flows"));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([]));
    });
    let flow_create = server.mock(|when, then| {
        when.method("POST")
            .path(format!("/buckets/{DST_BUCKET_ID}/flows"))
            .json_body(flow_doc(SRC_FLOW_ID, DST_BUCKET_ID, version_count));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(flow_doc(DST_FLOW_ID, DST_BUCKET_ID, 0));
    });
    let mut version_creates = Vec::new();
    for number in 1..=version_count {
        version_creates.push(server.mock(|when, then| {
            when.method("POST")
                .path(format!(
                    "/buckets/{DST_BUCKET_ID}/flows/{DST_FLOW_ID}/versions"
                ))
                .json_body(version_doc(DST_BUCKET_ID, DST_FLOW_ID, number));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(version_doc(DST_BUCKET_ID, DST_FLOW_ID, number));
        }));
    }
    TargetMocks {
        bucket_create,
        flow_create,
        version_creates,
    }
}

/// Mock a target registry that already holds the replicated bucket, flow, and
/// versions. Create endpoints answer 500 so an unexpected create both fails
/// the run and shows up in the hit counts.
pub fn mock_populated_target(server: &MockServer, version_count: u32) -> TargetMocks<'_> {
    server.mock(|when, then| {
        when.method("GET").path("/buckets");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([bucket_doc(DST_BUCKET_ID)]));
    });
    server.mock(|when, then| {
        when.method("GET").path(format!("/buckets/{DST_BUCKET_ID}/flows"));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([flow_doc(DST_FLOW_ID, DST_BUCKET_ID, version_count)]));
    });
    for number in 1..=version_count {
        server.mock(|when, then| {
            when.method("GET").path(format!(
                "/buckets/{DST_BUCKET_ID}/flows/{DST_FLOW_ID}/versions/{number}"
            ));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(version_doc(DST_BUCKET_ID, DST_FLOW_ID, number));
        });
    }
    let bucket_create = server.mock(|when, then| {
        when.method("POST").path("/buckets");
        then.status(500);
    });
    let flow_create = server.mock(|when, then| {
        when.method("POST")
            .path(format!("/buckets/{DST_BUCKET_ID}/flows"));
        then.status(500);
    });
    let version_creates = vec![server.mock(|when, then| {
        when.method("POST").path(format!(
            "/buckets/{DST_BUCKET_ID}/flows/{DST_FLOW_ID}/versions"
        ));
        then.status(500);
    })];
    TargetMocks {
        bucket_create,
        flow_create,
        version_creates,
    }
}
