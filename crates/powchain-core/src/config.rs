use crate::constants::{MAX_DIFFICULTY, POW_TARGET_DIFFICULTY};
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// Tunables for a [`Chain`](crate::chain::Chain) and its miner.
///
/// Missing fields take their defaults when deserializing, so
/// `{"difficulty": 2}` is a complete config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Leading zero hex digits a mined block hash must have.
    pub difficulty: u32,
    /// Upper bound on nonces tried per block; `None` searches without bound.
    pub max_attempts: Option<u64>,
    /// Cap on transactions per block; `None` mines the whole pool.
    pub max_txs_per_block: Option<usize>,
    /// Search the nonce space on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: POW_TARGET_DIFFICULTY,
            max_attempts: None,
            max_txs_per_block: None,
            parallel: false,
        }
    }
}

impl ChainConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: ChainConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_txs_per_block(mut self, max_txs_per_block: usize) -> Self {
        self.max_txs_per_block = Some(max_txs_per_block);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::InvalidConfig(format!(
                "difficulty {} exceeds maximum of {}",
                self.difficulty, MAX_DIFFICULTY
            )));
        }
        if self.max_txs_per_block == Some(0) {
            return Err(ChainError::InvalidConfig(
                "max_txs_per_block must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
