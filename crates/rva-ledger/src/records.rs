//! Wire types for ledger records (§6): one JSON object per line, UTF-8,
//! LF-terminated.

use base64::Engine;
use rva_core::{Digest, PublicKey, Signature, Timestamp};
use serde::{Deserialize, Serialize};

/// `{"merkle_root","signature","public_key","timestamp"}`, embedded in a
/// seal record and also the payload a certificate verifies against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub merkle_root: Digest,
    pub signature: Signature,
    pub public_key: PublicKey,
    pub timestamp: Timestamp,
}

/// A parsed ledger line, discriminated by its `type` field. `Register`'s
/// `canonical_json_b64` is present only when the caller supplied the
/// original canonical JSON for audit replay; it is never part of the hash
/// chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Register {
        canon: String,
        timestamp: Timestamp,
        object_hash_hex: Digest,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        canonical_json_b64: Option<String>,
    },
    Seal {
        manifest: Manifest,
    },
}

impl Record {
    pub fn register(object_hash: Digest, timestamp: Timestamp, canonical_json: Option<&[u8]>) -> Self {
        Record::Register {
            canon: rva_core::canon::CANON.canon_version.to_string(),
            timestamp,
            object_hash_hex: object_hash,
            canonical_json_b64: canonical_json
                .map(|b| base64::engine::general_purpose::STANDARD.encode(b)),
        }
    }

    pub fn seal(manifest: Manifest) -> Self {
        Record::Seal { manifest }
    }

    /// The record's timestamp, regardless of variant.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Record::Register { timestamp, .. } => *timestamp,
            Record::Seal { manifest, .. } => manifest.timestamp,
        }
    }

    pub fn is_seal(&self) -> bool {
        matches!(self, Record::Seal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_serializes_with_type_tag_and_omits_absent_payload() {
        let r = Record::register(rva_core::hashing::sha256(b"x"), Timestamp::now(), None);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["type"], "register");
        assert!(value.get("canonical_json_b64").is_none());
    }

    #[test]
    fn record_round_trips_through_json() {
        let r = Record::register(rva_core::hashing::sha256(b"x"), Timestamp::now(), Some(b"{}"));
        let encoded = serde_json::to_string(&r).unwrap();
        let decoded: Record = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, r);
        match decoded {
            Record::Register { canonical_json_b64, .. } => {
                assert_eq!(canonical_json_b64.as_deref(), Some("e30="));
            }
            Record::Seal { .. } => panic!("expected register record"),
        }
    }

    #[test]
    fn seal_serializes_with_type_tag() {
        let manifest = Manifest {
            merkle_root: rva_core::hashing::sha256(b"root"),
            signature: rva_core::Signature::from_bytes([0u8; 64]),
            public_key: rva_core::PublicKey::from_bytes([1u8; 32]),
            timestamp: Timestamp::now(),
        };
        let r = Record::seal(manifest);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["type"], "seal");
        assert!(r.is_seal());
    }
}
