//! Binary Merkle tree over transaction ids.
//!
//! Pairs hash as `sha256(left || right)`. A level with an odd count pairs
//! its last node with itself. An empty list commits to the zero hash.

use crate::{sha256, Hash, Result, Transaction, ZERO_HASH};
use serde::{Deserialize, Serialize};

/// Which side of the running hash a sibling sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Hash,
    pub side: Side,
}

/// Inclusion path from a leaf up to the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub steps: Vec<ProofStep>,
}

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    sha256(&buf)
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
        .collect()
}

pub fn merkle_root(txs: &[Transaction]) -> Result<Hash> {
    let leaves = txs.iter().map(Transaction::txid).collect::<Result<Vec<_>>>()?;
    Ok(root_from_leaves(&leaves))
}

pub fn root_from_leaves(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return ZERO_HASH;
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Inclusion proof for the first occurrence of `target` in `leaves`.
pub fn merkle_proof(leaves: &[Hash], target: &Hash) -> Option<MerkleProof> {
    let mut idx = leaves.iter().position(|leaf| leaf == target)?;
    let mut level = leaves.to_vec();
    let mut steps = Vec::new();

    while level.len() > 1 {
        let sibling_idx = idx ^ 1;
        // Odd tail pairs with itself.
        let sibling = *level.get(sibling_idx).unwrap_or(&level[idx]);
        let side = if sibling_idx < idx {
            Side::Left
        } else {
            Side::Right
        };
        steps.push(ProofStep { sibling, side });
        level = next_level(&level);
        idx /= 2;
    }
    Some(MerkleProof { steps })
}

pub fn verify_proof(leaf: &Hash, proof: &MerkleProof, root: &Hash) -> bool {
    let computed = proof.steps.iter().fold(*leaf, |cur, step| match step.side {
        Side::Left => hash_pair(&step.sibling, &cur),
        Side::Right => hash_pair(&cur, &step.sibling),
    });
    computed == *root
}
