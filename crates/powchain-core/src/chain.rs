use crate::config::ChainConfig;
use crate::error::{IntegrityViolation, ViolationKind};
use crate::merkle::{merkle_proof, MerkleProof};
use crate::pow::meets_difficulty;
use crate::{merkle_root, unix_now, Block, ChainError, Hash, Miner, Result, Transaction};
use tracing::{debug, warn};

/// A single authoritative, in-process chain.
///
/// Block 0 is always [`Block::genesis`]. Accepted blocks are never mutated
/// or removed; new ones only come from [`Chain::mine_pending`].
#[derive(Clone, Debug)]
pub struct Chain {
    config: ChainConfig,
    miner: Miner,
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        Self::build(ChainConfig::default(), vec![Block::genesis()])
    }

    pub fn with_config(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, vec![Block::genesis()]))
    }

    /// Rebuild a chain from blocks produced elsewhere, rejecting the first
    /// integrity violation. The pending pool starts empty.
    pub fn from_blocks(config: ChainConfig, blocks: Vec<Block>) -> Result<Self> {
        config.validate()?;
        if blocks.is_empty() {
            return Err(IntegrityViolation::new(0, ViolationKind::InvalidGenesis).into());
        }
        let chain = Self::build(config, blocks);
        chain.validate()?;
        Ok(chain)
    }

    fn build(config: ChainConfig, blocks: Vec<Block>) -> Self {
        Self {
            miner: Miner::from_config(&config),
            config,
            blocks,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &Block {
        // never empty: construction always installs a genesis block
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true once constructed; genesis is always present.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue a transaction for the next block.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        tx.validate()?;
        // Reject now anything the block hash could not commit to later.
        tx.encode()?;
        debug!(
            sender = %tx.sender,
            receiver = %tx.receiver,
            amount = tx.amount,
            pending = self.pending.len() + 1,
            "transaction accepted"
        );
        self.pending.push(tx);
        Ok(())
    }

    /// Mine the pending pool into a new block stamped with the current time.
    pub fn mine_pending(&mut self) -> Result<&Block> {
        self.mine_pending_at(unix_now())
    }

    /// Mine the pending pool into a block with the given timestamp. The whole
    /// pool goes in unless `max_txs_per_block` caps it, in which case the
    /// oldest transactions go first and the rest stay queued. On any error
    /// the chain and the pool are left as they were.
    pub fn mine_pending_at(&mut self, timestamp: u64) -> Result<&Block> {
        if self.pending.is_empty() {
            return Err(ChainError::NothingToMine);
        }
        let take = self
            .config
            .max_txs_per_block
            .map_or(self.pending.len(), |cap| self.pending.len().min(cap));
        let txs = self.pending[..take].to_vec();

        let tip = self.tip();
        let template = Block::new(
            tip.header.index + 1,
            timestamp,
            txs,
            tip.hash,
            self.config.difficulty,
        )?;
        let mined = self.miner.mine(template)?;

        self.pending.drain(..take);
        self.blocks.push(mined);
        Ok(self.tip())
    }

    /// Walk the whole chain and report the first block that breaks linkage,
    /// hash consistency, its Merkle commitment, or proof-of-work.
    pub fn validate(&self) -> std::result::Result<(), IntegrityViolation> {
        let mut prev: Option<&Block> = None;
        for (position, block) in self.blocks.iter().enumerate() {
            let index = position as u64;
            let checked = match prev {
                None => check_genesis(block),
                Some(prev) => check_block(index, block, prev, self.config.difficulty),
            };
            if let Err(kind) = checked {
                let violation = IntegrityViolation::new(index, kind);
                warn!(index, %kind, "chain integrity violation");
                return Err(violation);
            }
            prev = Some(block);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Locate a mined transaction by id.
    pub fn find_transaction(&self, txid: &Hash) -> Option<(u64, &Transaction)> {
        self.blocks.iter().find_map(|block| {
            block
                .txs
                .iter()
                .find(|tx| tx.txid().is_ok_and(|id| id == *txid))
                .map(|tx| (block.header.index, tx))
        })
    }

    /// Merkle inclusion proof for `txid` within block `index`.
    pub fn tx_proof(&self, index: u64, txid: &Hash) -> Option<MerkleProof> {
        let block = self.block(index)?;
        let leaves = block
            .txs
            .iter()
            .map(Transaction::txid)
            .collect::<Result<Vec<_>>>()
            .ok()?;
        merkle_proof(&leaves, txid)
    }
}

fn check_genesis(block: &Block) -> std::result::Result<(), ViolationKind> {
    if block.hash != block.compute_hash() {
        return Err(ViolationKind::TamperedHash);
    }
    if *block != Block::genesis() {
        return Err(ViolationKind::InvalidGenesis);
    }
    Ok(())
}

fn check_block(
    index: u64,
    block: &Block,
    prev: &Block,
    min_difficulty: u32,
) -> std::result::Result<(), ViolationKind> {
    if block.header.index != index {
        return Err(ViolationKind::IndexMismatch);
    }
    if block.header.previous_hash != prev.hash {
        return Err(ViolationKind::BrokenLinkage);
    }
    if block.hash != block.compute_hash() {
        return Err(ViolationKind::TamperedHash);
    }
    if block.header.tx_count as usize != block.txs.len() {
        return Err(ViolationKind::MerkleMismatch);
    }
    match merkle_root(&block.txs) {
        Ok(root) if root == block.header.merkle_root => {}
        _ => return Err(ViolationKind::MerkleMismatch),
    }
    let required = block.header.difficulty.max(min_difficulty);
    if !meets_difficulty(&block.hash, required) {
        return Err(ViolationKind::InsufficientDifficulty);
    }
    Ok(())
}
