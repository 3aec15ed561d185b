//! Deterministic binary Merkle tree over SHA-256 digests.
//!
//! Builder and verifier apply the same four rules, bit-for-bit:
//! - **Parent rule**: `parent(L, R) = sha256(L_bytes || R_bytes)`. `L` and `R`
//!   are never reordered and no prefix is added at this layer.
//! - **Odd-duplication**: at any level with an odd node count, the last node
//!   is paired with itself.
//! - **Single-leaf**: a tree of one leaf has that leaf as its root; no
//!   hashing is performed.
//! - **Empty input**: rejected with [`RvaError::EmptyLeaves`].
//!
//! A domain-separated variant of the parent rule, used by the browser-side
//! verifier, lives in [`crate::verifier`] — it is a distinct function, never
//! selected implicitly.

use crate::errors::{RvaError, RvaResult};
use crate::hashing::sha256;
use crate::hex_types::Digest;

/// Which side of the concatenation a proof step's sibling occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
}

/// One step of a Merkle inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofStep {
    pub sibling: Digest,
    pub position: Position,
}

pub type Proof = Vec<ProofStep>;

/// Byte-concatenation parent rule: `sha256(L_bytes || R_bytes)`. This is the
/// variant used by the ledger/seal path. The domain-separated variant used
/// by the browser-side verifier supplies its own hasher to the `_with`
/// functions below instead of reusing this one.
pub(crate) fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(left.as_bytes());
    buf.extend_from_slice(right.as_bytes());
    sha256(&buf)
}

fn parent_level(level: &[Digest], hash_pair: impl Fn(&Digest, &Digest) -> Digest) -> Vec<Digest> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    let mut i = 0;
    while i < level.len() {
        let left = level[i];
        let right = if i + 1 < level.len() { level[i + 1] } else { level[i] };
        next.push(hash_pair(&left, &right));
        i += 2;
    }
    next
}

/// Tree height `ceil(log2(n))`, computed by iterating `n <- ceil(n/2)` until
/// `n == 1`. Also the required proof length for `n` leaves (`0` for `n == 1`).
pub fn height(mut n: usize) -> usize {
    let mut h = 0;
    while n > 1 {
        n = n.div_ceil(2);
        h += 1;
    }
    h
}

/// Build the Merkle root over an ordered leaf sequence, using `hash_pair` as
/// the parent rule. [`build_root`] binds this to the byte-concatenation
/// rule; [`crate::verifier::verify_domain_separated`] binds it to the
/// domain-separated rule.
pub(crate) fn build_root_with(
    leaves: &[Digest],
    hash_pair: impl Fn(&Digest, &Digest) -> Digest,
) -> RvaResult<Digest> {
    if leaves.is_empty() {
        return Err(RvaError::EmptyLeaves);
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = parent_level(&level, &hash_pair);
    }
    Ok(level[0])
}

/// Build the Merkle root over an ordered leaf sequence.
pub fn build_root(leaves: &[Digest]) -> RvaResult<Digest> {
    build_root_with(leaves, hash_pair)
}

pub(crate) fn build_proof_with(
    leaves: &[Digest],
    index: usize,
    hash_pair: impl Fn(&Digest, &Digest) -> Digest,
) -> RvaResult<Proof> {
    if leaves.is_empty() {
        return Err(RvaError::EmptyLeaves);
    }
    if index >= leaves.len() {
        return Err(RvaError::InvalidIndex { index, total: leaves.len() });
    }

    let mut level = leaves.to_vec();
    let mut idx = index;
    let mut steps = Vec::with_capacity(height(leaves.len()));

    while level.len() > 1 {
        let n = level.len();
        let (sibling_idx, position) = if idx.is_multiple_of(2) {
            (idx + 1, Position::Right)
        } else {
            (idx - 1, Position::Left)
        };
        let sibling = if sibling_idx < n { level[sibling_idx] } else { level[idx] };
        steps.push(ProofStep { sibling, position });

        level = parent_level(&level, &hash_pair);
        idx /= 2;
    }

    Ok(steps)
}

/// Build the inclusion proof for leaf `index` in an ordered leaf sequence of
/// `n >= 1` leaves. Returns an empty proof for a single-leaf tree.
pub fn build_proof(leaves: &[Digest], index: usize) -> RvaResult<Proof> {
    build_proof_with(leaves, index, hash_pair)
}

/// Verify that `leaf` at `index` of `total_leaves` reconstructs
/// `expected_root` via `proof`, using `hash_pair` as the parent rule.
/// Follows the five-step procedure: length check, per-level position check,
/// odd-duplication-bound sibling check, concatenate-and-hash, final
/// equality.
pub(crate) fn verify_with(
    leaf: &Digest,
    index: usize,
    total_leaves: usize,
    proof: &[ProofStep],
    expected_root: &Digest,
    hash_pair: impl Fn(&Digest, &Digest) -> Digest,
) -> RvaResult<()> {
    if total_leaves == 0 {
        return Err(RvaError::InvalidTotalLeaves("total_leaves must be >= 1".into()));
    }
    if index >= total_leaves {
        return Err(RvaError::InvalidIndex { index, total: total_leaves });
    }

    if total_leaves == 1 {
        return if proof.is_empty() && leaf == expected_root {
            Ok(())
        } else {
            Err(RvaError::InvalidProof(
                "single-leaf tree requires an empty proof matching the root".into(),
            ))
        };
    }

    let expected_len = height(total_leaves);
    if proof.len() != expected_len {
        return Err(RvaError::InvalidProof(format!(
            "expected proof length {expected_len}, got {}",
            proof.len()
        )));
    }

    let mut idx = index;
    let mut n = total_leaves;
    let mut cur = *leaf;

    for step in proof {
        let expected_position = if idx.is_multiple_of(2) { Position::Right } else { Position::Left };
        if step.position != expected_position {
            return Err(RvaError::InvalidProof(
                "recorded sibling position disagrees with index parity".into(),
            ));
        }

        let sibling_idx = match step.position {
            Position::Right => idx + 1,
            Position::Left => idx - 1,
        };
        if sibling_idx >= n && step.sibling != cur {
            return Err(RvaError::InvalidProof(
                "sibling index out of range and does not satisfy the odd-duplication rule".into(),
            ));
        }

        cur = match step.position {
            Position::Right => hash_pair(&cur, &step.sibling),
            Position::Left => hash_pair(&step.sibling, &cur),
        };

        idx /= 2;
        n = n.div_ceil(2);
    }

    if &cur == expected_root {
        Ok(())
    } else {
        Err(RvaError::InvalidProof("recomputed root does not match expected root".into()))
    }
}

/// Verify against the byte-concatenation parent rule — the ledger/seal
/// path's variant (§4.3).
pub fn verify(
    leaf: &Digest,
    index: usize,
    total_leaves: usize,
    proof: &[ProofStep],
    expected_root: &Digest,
) -> RvaResult<()> {
    verify_with(leaf, index, total_leaves, proof, expected_root, hash_pair)
}
