use crate::constants::BITS_PER_HEX_DIGIT;
use crate::{Block, ChainError, Hash, Result};

pub fn count_leading_zero_bits(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 8;
        } else {
            total += b.leading_zeros();
            break;
        }
    }
    total
}

/// True when the hex rendering of `hash` starts with `difficulty` zeros.
pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
    count_leading_zero_bits(hash) >= difficulty.saturating_mul(BITS_PER_HEX_DIGIT)
}

/// Mine the block by trying nonce 0, 1, 2, ... until the header hash meets
/// `difficulty`. The first satisfying nonce wins.
pub fn mine_block(mut block: Block, difficulty: u32, max_attempts: Option<u64>) -> Result<Block> {
    block.header.difficulty = difficulty;
    let mut header = block.header;
    let limit = max_attempts.unwrap_or(u64::MAX);

    for nonce in 0..limit {
        header.nonce = nonce;
        let hash = header.hash();
        if meets_difficulty(&hash, difficulty) {
            block.header = header;
            block.hash = hash;
            return Ok(block);
        }
    }
    Err(ChainError::MiningTimeout { attempts: limit })
}
