//! Hashing System - SHA-256 fingerprints for documents and jobs
//!
//! Hashes are taken over canonical JSON so that two equal documents hash
//! equally regardless of field order.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::document::AdDocument;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), sort_value(v))).collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Fingerprint of one composed or resized document.
pub fn compute_document_hash(doc: &AdDocument) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(doc)?.as_bytes()))
}

/// job_hash = sha256(canonical_request + ":" + engine_version)
///
/// Stable across runs for the same request and engine.
pub fn compute_job_hash(request: &impl Serialize, engine_version: &str) -> Result<String, serde_json::Error> {
    let combined = format!("{}:{}", canonical_json(request)?, engine_version);
    Ok(sha256_hex(combined.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}
