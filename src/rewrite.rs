use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Replace identifier occurrences throughout a document.
///
/// The document is serialized to a JSON tree, every string scalar containing a
/// `from` identifier has the occurrence replaced with the paired `to`
/// identifier, and the tree is deserialized back into the document type.
/// Identifiers can sit arbitrarily deep inside subtrees the caller cannot
/// enumerate (flow contents, embedded process groups), which is why the whole
/// tree is walked rather than individual fields.
///
/// Mappings are applied in the order given; when rewriting a version payload
/// the bucket mapping must come before the flow mapping. Replacement is plain
/// substring substitution, so a mapping whose `from` value is a substring of
/// another identifier in the document will also hit that identifier.
pub fn rewrite_identifiers<T>(document: &T, mappings: &[(String, String)]) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut tree = serde_json::to_value(document)
        .context("failed to serialize document for identifier rewrite")?;
    for (from, to) in mappings {
        substitute(&mut tree, from, to);
    }
    serde_json::from_value(tree)
        .context("identifier rewrite produced a document that no longer matches its schema")
}

fn substitute(value: &mut Value, from: &str, to: &str) {
    match value {
        Value::String(scalar) => {
            if scalar.contains(from) {
                *scalar = scalar.replace(from, to);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute(item, from, to);
            }
        }
        Value::Object(fields) => {
            for field in fields.values_mut() {
                substitute(field, from, to);
            }
        }
        _ => {}
    }
}
