//! Frozen canon constants (§4.7).
//!
//! Changing any of these requires a new canon version, not an in-place edit.

/// The full set of frozen protocol constants for canon version `v1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canon {
    pub canon_version: &'static str,
    pub canon_status: &'static str,
    pub epoch_size: u32,
    pub hash_algorithm: &'static str,
    pub signature_algorithm: &'static str,
    pub time_standard: &'static str,
    pub submission_timestamp_tolerance_seconds: u32,
}

pub const CANON: Canon = Canon {
    canon_version: "v1.0",
    canon_status: "FROZEN",
    epoch_size: 1000,
    hash_algorithm: "SHA-256",
    signature_algorithm: "Ed25519",
    time_standard: "UTC",
    submission_timestamp_tolerance_seconds: 300,
};

/// Domain separator bound by policy to the domain-separated Merkle variant
/// (see [`crate::verifier::verify_domain_separated`]). Not used by the
/// byte-concatenation ledger/seal path in [`crate::merkle`].
pub const RVA_NODE_DOMAIN_SEPARATOR: &str = "RVA_NODE:v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canon_is_frozen_at_v1() {
        assert_eq!(CANON.canon_version, "v1.0");
        assert_eq!(CANON.canon_status, "FROZEN");
        assert_eq!(CANON.epoch_size, 1000);
    }
}
