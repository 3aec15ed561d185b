//! Deterministic Ed25519 signing over raw digest bytes.
//!
//! The signed message is always the **raw 32-byte digest**, never the ASCII
//! of its hex form — this is a Canon invariant (§4.4). Key derivation from a
//! seed is deterministic across platforms, per RFC 8032's expansion.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use crate::errors::{RvaError, RvaResult};
use crate::hex_types::{Digest, PublicKey, Seed, Signature};

/// Derive the Ed25519 keypair for a 32-byte seed. Returns the public key and
/// the 64-byte keypair encoding (32-byte seed || 32-byte public key).
pub fn derive(seed: &Seed) -> (PublicKey, [u8; 64]) {
    let signing_key = SigningKey::from_bytes(seed.as_bytes());
    let public = PublicKey::from_bytes(signing_key.verifying_key().to_bytes());
    (public, signing_key.to_keypair_bytes())
}

/// Sign the raw 32 bytes of `digest` with the key derived from `seed`.
/// Validates hex, decodes, derives, signs, and re-encodes to lowercase hex.
///
/// Returns `(signature_hex, public_key_hex)`.
pub fn sign_digest(digest_hex: &str, seed_hex: &str) -> RvaResult<(String, String)> {
    let digest = Digest::from_hex(digest_hex)?;
    let seed = Seed::from_hex(seed_hex)?;

    let signing_key = SigningKey::from_bytes(seed.as_bytes());
    let signature = signing_key.sign(digest.as_bytes());
    let public = signing_key.verifying_key();

    Ok((hex::encode(signature.to_bytes()), hex::encode(public.to_bytes())))
}

/// Verify `signature_hex` over the raw bytes of `digest_hex` under
/// `public_key_hex`. Structural failures (bad hex, wrong lengths) surface as
/// the corresponding structural error; a public key that fails to decode to
/// a curve point or a signature rejected by the cryptography both surface
/// as [`RvaError::VerificationFailed`] — "inputs malformed" is always
/// distinguishable from "cryptography said no" by which variant comes back.
pub fn verify_digest(digest_hex: &str, signature_hex: &str, public_key_hex: &str) -> RvaResult<()> {
    let digest = Digest::from_hex(digest_hex)?;
    let signature_bytes = Signature::from_hex(signature_hex)?;
    let public_bytes = PublicKey::from_hex(public_key_hex)?;

    let verifying_key = VerifyingKey::from_bytes(public_bytes.as_bytes())
        .map_err(|_| RvaError::VerificationFailed)?;
    let signature = ed25519_dalek::Signature::from_bytes(signature_bytes.as_bytes());

    verifying_key
        .verify(digest.as_bytes(), &signature)
        .map_err(|_| RvaError::VerificationFailed)
}
