//! Error taxonomy for `rva-core`.
//!
//! Every boundary function returns one of these variants (or success); no
//! error is swallowed, no structural issue is silently coerced. The taxonomy
//! is frozen: new failure modes get a new variant, not a repurposed message
//! string on an existing one.

use thiserror::Error;

/// Result type used throughout `rva-core`.
pub type RvaResult<T> = Result<T, RvaError>;

/// Top-level error type for the RVA cryptographic core.
#[derive(Debug, Error)]
pub enum RvaError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("empty leaves: cannot build a Merkle tree over zero leaves")]
    EmptyLeaves,

    #[error("invalid leaf format: {0}")]
    InvalidLeafFormat(String),

    #[error("invalid index: {index} out of bounds for {total} leaves")]
    InvalidIndex { index: usize, total: usize },

    #[error("invalid total leaves: {0}")]
    InvalidTotalLeaves(String),

    #[error("invalid proof: {0}")]
    InvalidProof(String),

    #[error("verification failed")]
    VerificationFailed,

    #[error("no registrations since last seal")]
    NoRegistrations,

    #[error("ledger I/O error: {0}")]
    LedgerIO(#[from] std::io::Error),

    #[error("ledger corrupt: {0}")]
    LedgerCorrupt(String),

    #[error("audit failed: {0}")]
    AuditFail(String),
}

impl RvaError {
    /// Machine-stable tag used for the `AUDIT_FAIL: <kind>: <detail>` line an
    /// external CLI collaborator surfaces on stderr. The core never writes
    /// to stderr itself; this only formats the contract.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            RvaError::InvalidHex(_) => "InvalidHex",
            RvaError::Canonicalization(_) => "Canonicalization",
            RvaError::InvalidLength { .. } => "InvalidLength",
            RvaError::InvalidTimestamp(_) => "InvalidTimestamp",
            RvaError::EmptyLeaves => "EmptyLeaves",
            RvaError::InvalidLeafFormat(_) => "InvalidLeafFormat",
            RvaError::InvalidIndex { .. } => "InvalidIndex",
            RvaError::InvalidTotalLeaves(_) => "InvalidTotalLeaves",
            RvaError::InvalidProof(_) => "InvalidProof",
            RvaError::VerificationFailed => "VerificationFailed",
            RvaError::NoRegistrations => "NoRegistrations",
            RvaError::LedgerIO(_) => "LedgerIO",
            RvaError::LedgerCorrupt(_) => "LedgerCorrupt",
            RvaError::AuditFail(_) => "AuditFail",
        }
    }

    /// Render the stable `AUDIT_FAIL: <kind>: <detail>` line.
    pub fn as_audit_line(&self) -> String {
        format!("AUDIT_FAIL: {}: {}", self.kind_tag(), self)
    }
}
