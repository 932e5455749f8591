//! Content fingerprints for analysis inputs

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to serialize value for fingerprinting: {0}")]
pub struct FingerprintError(#[from] serde_json::Error);

/// SHA-256 (hex) of the JSON serialization of `value`.
///
/// Maps in the input model are `BTreeMap`s, so equal inputs always serialize
/// to the same bytes and therefore to the same fingerprint.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, FingerprintError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hash_bytes(&bytes))
}

/// Compute SHA-256 hash of raw bytes
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
