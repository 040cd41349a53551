use powchain_core::{Chain, ChainConfig, Transaction};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

pub const BASE_TIMESTAMP: u64 = 1_700_000_000;

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn chain_with_difficulty(difficulty: u32) -> Chain {
    Chain::with_config(ChainConfig::default().with_difficulty(difficulty))
        .expect("difficulty within range")
}

/// Reproducible batch of well-formed transactions.
pub fn random_transactions(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            Transaction::with_timestamp(
                format!("user-{}", rng.gen_range(0..50)),
                format!("user-{}", rng.gen_range(50..100)),
                rng.gen_range(0..10_000),
                BASE_TIMESTAMP + i as u64,
            )
        })
        .collect()
}

/// Queue `txs` and mine them, one block per `per_block` transactions.
pub fn mine_in_blocks(chain: &mut Chain, txs: Vec<Transaction>, per_block: usize) {
    for (i, batch) in txs.chunks(per_block).enumerate() {
        for tx in batch {
            chain.add_transaction(tx.clone()).expect("valid transaction");
        }
        chain
            .mine_pending_at(BASE_TIMESTAMP + 600 * (i as u64 + 1))
            .expect("mining succeeds");
    }
}
