//! Hash-linked blocks with SHA-256 proof-of-work.
//!
//! A [`Chain`] starts from a fixed genesis block, collects [`Transaction`]s
//! in a pending pool and seals them into [`Block`]s by searching for a nonce
//! whose header hash has enough leading zero hex digits.

pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod merkle;
pub mod mine;
pub mod miner;
pub mod pow;

pub use chain::Chain;
pub use config::ChainConfig;
pub use error::{ChainError, IntegrityViolation, Result, ViolationKind};
pub use merkle::merkle_root;
pub use miner::Miner;

use constants::{HASH_SIZE, HEADER_SIZE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

pub type Hash = [u8; HASH_SIZE];

pub const ZERO_HASH: Hash = [0u8; HASH_SIZE];

/// SHA-256 over `bytes`.
pub fn sha256(bytes: &[u8]) -> Hash {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest[..]);
    out
}

pub fn hash_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
    pub timestamp: u64,
}

impl Transaction {
    /// Build a transaction stamped with the current time.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: u64) -> Self {
        Self::with_timestamp(sender, receiver, amount, unix_now())
    }

    pub fn with_timestamp(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            timestamp,
        }
    }

    /// Structural checks only; there is no balance or signature model.
    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            return Err(ChainError::InvalidTransaction("empty sender".into()));
        }
        if self.receiver.trim().is_empty() {
            return Err(ChainError::InvalidTransaction("empty receiver".into()));
        }
        Ok(())
    }

    /// Canonical bytes: each identifier is prefixed with its u16-LE byte
    /// length, followed by amount and timestamp as u64-LE.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(2 + self.sender.len() + 2 + self.receiver.len() + 16);
        put_str(&mut bytes, "sender", &self.sender)?;
        put_str(&mut bytes, "receiver", &self.receiver)?;
        bytes.extend_from_slice(&self.amount.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        Ok(bytes)
    }

    pub fn txid(&self) -> Result<Hash> {
        Ok(sha256(&self.encode()?))
    }
}

fn put_str(buf: &mut Vec<u8>, field: &str, value: &str) -> Result<()> {
    let len = u16::try_from(value.len()).map_err(|_| {
        ChainError::Encoding(format!(
            "{field} is {} bytes, the limit is {}",
            value.len(),
            u16::MAX
        ))
    })?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub index: u64,
    pub timestamp: u64,
    pub previous_hash: Hash,
    pub merkle_root: Hash,
    /// Number of transactions under `merkle_root`. The tree pairs an odd
    /// tail with itself, so the root alone cannot tell `[a, b, c]` from
    /// `[a, b, c, c]`.
    pub tx_count: u32,
    pub difficulty: u32,
    pub nonce: u64,
}

impl BlockHeader {
    /// Fixed-width little-endian layout, so no two headers share an encoding.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..8].copy_from_slice(&self.index.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes[16..48].copy_from_slice(&self.previous_hash);
        bytes[48..80].copy_from_slice(&self.merkle_root);
        bytes[80..84].copy_from_slice(&self.tx_count.to_le_bytes());
        bytes[84..88].copy_from_slice(&self.difficulty.to_le_bytes());
        bytes[88..96].copy_from_slice(&self.nonce.to_le_bytes());
        bytes
    }

    pub fn hash(&self) -> Hash {
        sha256(&self.encode())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Transaction>,
    /// Hash recorded when the block was sealed.
    pub hash: Hash,
}

impl Block {
    /// Unmined block with nonce 0. Its hash is correct for nonce 0 but
    /// will usually not meet any difficulty until mined.
    pub fn new(
        index: u64,
        timestamp: u64,
        txs: Vec<Transaction>,
        previous_hash: Hash,
        difficulty: u32,
    ) -> Result<Self> {
        let tx_count = u32::try_from(txs.len()).map_err(|_| {
            ChainError::Encoding(format!("{} transactions do not fit in one block", txs.len()))
        })?;
        let header = BlockHeader {
            index,
            timestamp,
            previous_hash,
            merkle_root: merkle_root(&txs)?,
            tx_count,
            difficulty,
            nonce: 0,
        };
        Ok(Self {
            hash: header.hash(),
            header,
            txs,
        })
    }

    /// The well-known first block: index 0, timestamp 0, no transactions,
    /// all-zero previous hash, difficulty 0.
    pub fn genesis() -> Self {
        let header = BlockHeader {
            index: 0,
            timestamp: 0,
            previous_hash: ZERO_HASH,
            merkle_root: ZERO_HASH,
            tx_count: 0,
            difficulty: 0,
            nonce: 0,
        };
        Self {
            hash: header.hash(),
            header,
            txs: vec![],
        }
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn serialize_header(&self) -> [u8; HEADER_SIZE] {
        self.header.encode()
    }

    pub fn compute_hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn hash_hex(&self) -> String {
        hash_hex(&self.hash)
    }
}
