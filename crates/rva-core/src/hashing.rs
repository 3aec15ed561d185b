//! SHA-256 hashing over raw bytes and canonical-JSON serializations.
//!
//! No salt, no domain prefix at this layer — domain separation, where it
//! applies, is the caller's concern (see [`crate::merkle`]).

use serde::Serialize;
use sha2::{Digest as _, Sha256};

use crate::canonical_json;
use crate::errors::RvaResult;
use crate::hex_types::Digest;

/// Hash arbitrary bytes with SHA-256.
pub fn sha256(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&out);
    Digest::from_bytes(buf)
}

/// Hash the canonical-JSON encoding of a serializable value: SHA-256 over
/// the exact bytes [`canonical_json::to_canonical_bytes`] emits.
pub fn hash_canonical_json<T: Serialize>(value: &T) -> RvaResult<Digest> {
    let bytes = canonical_json::to_canonical_bytes(value)?;
    Ok(sha256(&bytes))
}
