use crate::config::ChainConfig;
use crate::{hash_hex, mine, pow, Block, ChainError, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Proof-of-work search with a fixed difficulty and optional attempt bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Miner {
    pub difficulty: u32,
    pub max_attempts: Option<u64>,
    pub parallel: bool,
}

impl Miner {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            max_attempts: None,
            parallel: false,
        }
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            difficulty: config.difficulty,
            max_attempts: config.max_attempts,
            parallel: config.parallel,
        }
    }

    /// Returns `block` with its nonce and hash fixed at the first nonce,
    /// counting up from 0, whose hash meets the difficulty.
    pub fn mine(&self, block: Block) -> Result<Block> {
        let index = block.header.index;
        debug!(
            index,
            difficulty = self.difficulty,
            parallel = self.parallel,
            "mining block"
        );
        let started = Instant::now();

        let result = if self.parallel {
            mine::mine_block_parallel(block, self.difficulty, self.max_attempts)
        } else {
            pow::mine_block(block, self.difficulty, self.max_attempts)
        };

        match &result {
            Ok(mined) => info!(
                "Mined block {} with nonce {} and hash {} in {:?}",
                index,
                mined.header.nonce,
                hash_hex(&mined.hash),
                started.elapsed()
            ),
            Err(ChainError::MiningTimeout { attempts }) => {
                warn!(index, attempts, "mining gave up before meeting difficulty")
            }
            Err(_) => {}
        }
        result
    }
}
