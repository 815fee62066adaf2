//! 哈希模块 - 统一管理哈希相关功能

pub mod double_hash;
pub mod splitmix;
pub mod strategy;

pub use double_hash::{DoubleHashStrategy, DEFAULT_PRIMARY_SEED, DEFAULT_SECONDARY_SEED};
pub use splitmix::{splitmix64, SplitMixHasher};
pub use strategy::{HashAlgorithm, HashStrategy, SaltedHashStrategy};

/// 默认哈希策略
pub fn default_hash_strategy() -> DoubleHashStrategy {
    DoubleHashStrategy::new(HashAlgorithm::AHash)
}

/// 哈希值映射到槽位下标
///
/// 容量总是 2 的幂，取低位即可；扩容后多用一位。
#[inline]
pub fn slot_index(hash: u64, mask: usize) -> usize {
    (hash as usize) & mask
}
