pub const BITS_PER_HEX_DIGIT: u32 = 4;
pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const HEADER_SIZE: usize = 8 + 8 + HASH_SIZE + HASH_SIZE + 4 + 4 + 8;
pub const MAX_DIFFICULTY: u32 = HASH_HEX_SIZE as u32;
pub const POW_TARGET_DIFFICULTY: u32 = 4;
pub const NONCES_PER_BATCH: u64 = 1 << 14;
