//! Rotation-policy governance engine.
//!
//! Validates a loaded [`RotationPolicy`] structurally and against frozen
//! invariants before any rotation/seal is permitted. All checks are AND'd;
//! the first violation short-circuits with [`RvaError::AuditFail`] so the
//! caller gets a single actionable reason per call.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canonical_json;
use crate::errors::{RvaError, RvaResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub hash_alg: String,
    pub allowed_hash_algs: Vec<String>,
    pub domain_separator: String,
    pub min_depth: u32,
    pub max_depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epochs {
    pub interval_seconds: u64,
    pub id_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutover {
    pub require_prev_anchor: bool,
    pub strict_monotonic_epoch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    pub policy_version: String,
    pub issuer: Issuer,
    pub constraints: Constraints,
    pub epochs: Epochs,
    pub cutover: Cutover,
}

/// Production safety floor: epochs must not close more often than daily.
pub const MIN_EPOCH_INTERVAL_SECONDS: u64 = 86_400;

const REQUIRED_DOMAIN_SEPARATOR: &str = "RVA_NODE:v1";
const REQUIRED_HASH_ALG: &str = "sha256";
const REQUIRED_ID_FORMAT: &str = "numeric_ascending";
const MAX_MERKLE_DEPTH: u32 = 64;

/// Validate a policy against every frozen invariant (§4.6). Returns `Ok(())`
/// only if all invariants hold; otherwise the first violated invariant is
/// reported as `AuditFail`.
pub fn validate(policy: &RotationPolicy) -> RvaResult<()> {
    if policy.constraints.hash_alg != REQUIRED_HASH_ALG
        || !policy
            .constraints
            .allowed_hash_algs
            .iter()
            .any(|a| a == REQUIRED_HASH_ALG)
    {
        let err = RvaError::AuditFail(format!(
            "constraints.hash_alg must be {REQUIRED_HASH_ALG:?} and present in allowed_hash_algs"
        ));
        warn!(issuer = %policy.issuer.id, %err, "policy audit rejected");
        return Err(err);
    }

    if policy.constraints.domain_separator != REQUIRED_DOMAIN_SEPARATOR {
        let err = RvaError::AuditFail(format!(
            "constraints.domain_separator must be {REQUIRED_DOMAIN_SEPARATOR:?}"
        ));
        warn!(issuer = %policy.issuer.id, %err, "policy audit rejected");
        return Err(err);
    }

    if policy.constraints.min_depth < 1 || policy.constraints.max_depth > MAX_MERKLE_DEPTH {
        let err = RvaError::AuditFail(format!(
            "constraints depth bounds violated: min_depth={}, max_depth={} (require 1 <= min_depth and max_depth <= {MAX_MERKLE_DEPTH})",
            policy.constraints.min_depth, policy.constraints.max_depth
        ));
        warn!(issuer = %policy.issuer.id, %err, "policy audit rejected");
        return Err(err);
    }

    if policy.epochs.interval_seconds < MIN_EPOCH_INTERVAL_SECONDS {
        let err = RvaError::AuditFail(format!(
            "epochs.interval_seconds={} is below the production safety floor of {MIN_EPOCH_INTERVAL_SECONDS}",
            policy.epochs.interval_seconds
        ));
        warn!(issuer = %policy.issuer.id, %err, "policy audit rejected");
        return Err(err);
    }

    if policy.epochs.id_format != REQUIRED_ID_FORMAT {
        let err = RvaError::AuditFail(format!(
            "epochs.id_format must be {REQUIRED_ID_FORMAT:?}"
        ));
        warn!(issuer = %policy.issuer.id, %err, "policy audit rejected");
        return Err(err);
    }

    if !policy.cutover.require_prev_anchor || !policy.cutover.strict_monotonic_epoch {
        let err = RvaError::AuditFail(
            "cutover.require_prev_anchor and cutover.strict_monotonic_epoch must both be true".into(),
        );
        warn!(issuer = %policy.issuer.id, %err, "policy audit rejected");
        return Err(err);
    }

    debug!(issuer = %policy.issuer.id, policy_version = %policy.policy_version, "policy audit passed");
    Ok(())
}

/// Deterministic canonical-JSON encoding of a policy: two semantically
/// equal policies canonicalize to identical bytes, no trailing newline.
pub fn canonicalize(policy: &RotationPolicy) -> RvaResult<Vec<u8>> {
    canonical_json::to_canonical_bytes(policy)
}

/// Load a [`RotationPolicy`] from a JSON file at `path`. Structural-only:
/// this does not apply [`validate`] — callers gate seal/rotation operations
/// by calling both in sequence.
pub fn load_from_path(path: &Path) -> RvaResult<RotationPolicy> {
    let raw = std::fs::read(path)?;
    let value = canonical_json::parse_canonical_bytes(&raw)?;
    serde_json::from_value(value)
        .map_err(|e| RvaError::AuditFail(format!("malformed rotation policy: {e}")))
}
