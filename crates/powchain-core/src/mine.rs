use crate::constants::NONCES_PER_BATCH;
use crate::pow::meets_difficulty;
use crate::{Block, ChainError, Result};
use rayon::prelude::*;
use tracing::trace;

/// Mines a block by searching nonces in parallel until the header hash meets
/// `difficulty`.
///
/// Nonces are scanned in ascending batches and each batch uses `find_first`,
/// so the winner is the smallest satisfying nonce, same as
/// [`pow::mine_block`](crate::pow::mine_block). Workers only read a copy of
/// the header; the block is written once, after a winner is known.
pub fn mine_block_parallel(
    mut block: Block,
    difficulty: u32,
    max_attempts: Option<u64>,
) -> Result<Block> {
    block.header.difficulty = difficulty;
    let base_header = block.header;
    let limit = max_attempts.unwrap_or(u64::MAX);

    let mut start = 0u64;
    while start < limit {
        let end = start.saturating_add(NONCES_PER_BATCH).min(limit);
        trace!(start, end, "scanning nonce batch");

        let found = (start..end).into_par_iter().find_first(|nonce| {
            let mut h = base_header;
            h.nonce = *nonce;
            meets_difficulty(&h.hash(), difficulty)
        });

        if let Some(nonce) = found {
            let mut final_header = base_header;
            final_header.nonce = nonce;
            block.hash = final_header.hash();
            block.header = final_header;
            return Ok(block);
        }
        start = end;
    }
    Err(ChainError::MiningTimeout { attempts: limit })
}
