//! Deterministic cryptographic core of the RVA evidence registry.
//!
//! This crate has no I/O beyond reading a policy file from disk: every
//! operation is a pure function over bytes. The append-only ledger and its
//! concurrency model live in the `rva-ledger` crate, which depends on this
//! one for hashing, canonicalization, and signing.

pub mod canon;
pub mod canonical_json;
pub mod errors;
pub mod hashing;
pub mod hex_types;
pub mod merkle;
pub mod policy;
pub mod signer;
pub mod timestamp;
pub mod verifier;

pub use errors::{RvaError, RvaResult};
pub use hex_types::{Digest, PublicKey, Seed, Signature};
pub use timestamp::Timestamp;
