//! Offline verifier: composes the Merkle engine and the signer to validate a
//! certificate payload without any network dependency.
//!
//! Two incompatible Merkle parent rules coexist in the ecosystem (§4.8,
//! Design Notes): the ledger/seal path's byte-concatenation rule
//! ([`crate::merkle`]) and a domain-separated string rule used by the
//! browser-side verifier. A deployment picks exactly one by calling the
//! matching function in this module or in [`crate::merkle`] — there is no
//! runtime auto-detection between them.

use crate::canon::RVA_NODE_DOMAIN_SEPARATOR;
use crate::errors::RvaResult;
use crate::hashing::sha256;
use crate::hex_types::Digest;
use crate::merkle::{self, Proof};
use crate::signer;

/// `parent(L, R) = sha256("RVA_NODE:v1:" || hex(L) || ":" || hex(R))`.
fn hash_pair_domain_separated(left: &Digest, right: &Digest) -> Digest {
    let text = format!(
        "{RVA_NODE_DOMAIN_SEPARATOR}:{}:{}",
        left.to_hex(),
        right.to_hex()
    );
    sha256(text.as_bytes())
}

/// Build a Merkle root using the domain-separated parent rule.
pub fn build_root_domain_separated(leaves: &[Digest]) -> RvaResult<Digest> {
    merkle::build_root_with(leaves, hash_pair_domain_separated)
}

/// Build a Merkle proof using the domain-separated parent rule.
pub fn build_proof_domain_separated(leaves: &[Digest], index: usize) -> RvaResult<Proof> {
    merkle::build_proof_with(leaves, index, hash_pair_domain_separated)
}

/// Verify a Merkle proof using the domain-separated parent rule. Proofs
/// built under the byte-concatenation rule will not verify here, and vice
/// versa — the two are not interchangeable.
pub fn verify_domain_separated(
    leaf: &Digest,
    index: usize,
    total_leaves: usize,
    proof: &[crate::merkle::ProofStep],
    expected_root: &Digest,
) -> RvaResult<()> {
    merkle::verify_with(leaf, index, total_leaves, proof, expected_root, hash_pair_domain_separated)
}

/// A complete certificate: a leaf's inclusion proof plus the seal signature
/// over the root it resolves to.
pub struct Certificate<'a> {
    pub leaf: Digest,
    pub index: usize,
    pub total_leaves: usize,
    pub proof: &'a [crate::merkle::ProofStep],
    pub expected_root: Digest,
    pub signature_hex: &'a str,
    pub public_key_hex: &'a str,
}

/// Verify a certificate against the ledger/seal path's byte-concatenation
/// Merkle variant: recompute the root from the proof, require equality with
/// `expected_root`, then verify the signature over the root's raw 32 bytes.
pub fn verify_certificate(cert: &Certificate<'_>) -> RvaResult<()> {
    merkle::verify(
        &cert.leaf,
        cert.index,
        cert.total_leaves,
        cert.proof,
        &cert.expected_root,
    )?;
    signer::verify_digest(&cert.expected_root.to_hex(), cert.signature_hex, cert.public_key_hex)
}

/// Verify a certificate against the domain-separated Merkle variant, for
/// deployments whose policy binds them to it (`domain_separator =
/// "RVA_NODE:v1"`).
pub fn verify_certificate_domain_separated(cert: &Certificate<'_>) -> RvaResult<()> {
    verify_domain_separated(&cert.leaf, cert.index, cert.total_leaves, cert.proof, &cert.expected_root)?;
    signer::verify_digest(&cert.expected_root.to_hex(), cert.signature_hex, cert.public_key_hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::sha256;

    const SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn byte_concat_and_domain_separated_roots_differ() {
        let leaves = vec![sha256(b"A"), sha256(b"B")];
        let root = merkle::build_root(&leaves).unwrap();
        let root_ds = build_root_domain_separated(&leaves).unwrap();
        assert_ne!(root, root_ds);
    }

    #[test]
    fn certificate_round_trips_end_to_end() {
        let leaves: Vec<Digest> = (0..5).map(|i| sha256(format!("leaf-{i}").as_bytes())).collect();
        let root = merkle::build_root(&leaves).unwrap();
        let proof = merkle::build_proof(&leaves, 3).unwrap();
        let (sig_hex, pub_hex) = signer::sign_digest(&root.to_hex(), SEED_HEX).unwrap();

        let cert = Certificate {
            leaf: leaves[3],
            index: 3,
            total_leaves: leaves.len(),
            proof: &proof,
            expected_root: root,
            signature_hex: &sig_hex,
            public_key_hex: &pub_hex,
        };
        assert!(verify_certificate(&cert).is_ok());
    }

    #[test]
    fn proof_from_one_variant_fails_the_other() {
        let leaves = vec![sha256(b"A"), sha256(b"B"), sha256(b"C")];
        let root_ds = build_root_domain_separated(&leaves).unwrap();
        let proof_concat = merkle::build_proof(&leaves, 1).unwrap();
        assert!(verify_domain_separated(&leaves[1], 1, 3, &proof_concat, &root_ds).is_err());
    }

    #[test]
    fn certificate_rejects_tampered_root() {
        let leaves: Vec<Digest> = (0..4).map(|i| sha256(format!("leaf-{i}").as_bytes())).collect();
        let root = merkle::build_root(&leaves).unwrap();
        let proof = merkle::build_proof(&leaves, 0).unwrap();
        let (sig_hex, pub_hex) = signer::sign_digest(&root.to_hex(), SEED_HEX).unwrap();

        let wrong_root = sha256(b"not the root");
        let cert = Certificate {
            leaf: leaves[0],
            index: 0,
            total_leaves: leaves.len(),
            proof: &proof,
            expected_root: wrong_root,
            signature_hex: &sig_hex,
            public_key_hex: &pub_hex,
        };
        assert!(verify_certificate(&cert).is_err());
    }
}
