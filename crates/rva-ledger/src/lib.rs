//! Append-only evidence ledger for the RVA registry.
//!
//! Owns all file I/O and the process-wide append mutex; pure cryptographic
//! logic (hashing, canonical JSON, Merkle proofs, signing) lives in
//! `rva-core` and is reused here rather than duplicated.

pub mod ledger;
pub mod records;

pub use ledger::Ledger;
pub use records::{Manifest, Record};
