use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which chain invariant a block breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Block 0 is not the well-known genesis block.
    InvalidGenesis,
    /// Recorded index differs from the block's position in the chain.
    IndexMismatch,
    /// `previous_hash` does not match the predecessor's hash.
    BrokenLinkage,
    /// Recorded hash differs from the hash recomputed over the header.
    TamperedHash,
    /// Transactions no longer match the header's Merkle root.
    MerkleMismatch,
    /// Hash does not satisfy the proof-of-work difficulty.
    InsufficientDifficulty,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::InvalidGenesis => "invalid genesis block",
            ViolationKind::IndexMismatch => "index mismatch",
            ViolationKind::BrokenLinkage => "broken hash linkage",
            ViolationKind::TamperedHash => "tampered hash",
            ViolationKind::MerkleMismatch => "merkle root mismatch",
            ViolationKind::InsufficientDifficulty => "insufficient difficulty",
        };
        f.write_str(s)
    }
}

/// First block found to break chain integrity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Error)]
#[error("chain integrity violation at block {index}: {kind}")]
pub struct IntegrityViolation {
    pub index: u64,
    pub kind: ViolationKind,
}

impl IntegrityViolation {
    pub fn new(index: u64, kind: ViolationKind) -> Self {
        Self { index, kind }
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("no pending transactions to mine")]
    NothingToMine,

    #[error("no nonce met the difficulty after {attempts} attempts")]
    MiningTimeout { attempts: u64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_names_index_and_kind() {
        let v = IntegrityViolation::new(3, ViolationKind::BrokenLinkage);
        assert_eq!(
            v.to_string(),
            "chain integrity violation at block 3: broken hash linkage"
        );
    }

    #[test]
    fn integrity_converts_into_chain_error() {
        let err: ChainError = IntegrityViolation::new(1, ViolationKind::TamperedHash).into();
        match err {
            ChainError::Integrity(v) => {
                assert_eq!(v.index, 1);
                assert_eq!(v.kind, ViolationKind::TamperedHash);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn timeout_message_carries_attempts() {
        let err = ChainError::MiningTimeout { attempts: 42 };
        assert_eq!(
            err.to_string(),
            "no nonce met the difficulty after 42 attempts"
        );
    }
}
