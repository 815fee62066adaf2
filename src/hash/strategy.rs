//! 哈希策略模块 - 定义候选槽位的寻址能力

use crate::hash::splitmix::splitmix64;
use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    AHash,
    XxHash,
    SplitMix,
    Default,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::AHash => "ahash",
            HashAlgorithm::XxHash => "xxhash64",
            HashAlgorithm::SplitMix => "splitmix64",
            HashAlgorithm::Default => "siphash",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 哈希策略特征
///
/// 对每个键给出两个相互独立的 64 位哈希值，分别用于表 A 和表 B。
/// 表只取低位作为槽位下标，因此实现需要保证低位分布均匀。
pub trait HashStrategy {
    /// 计算键的两个哈希值 `(h1, h2)`
    fn hash_pair<Q: Hash + ?Sized>(&self, key: &Q) -> (u64, u64);

    /// 当前使用的两个种子
    fn seeds(&self) -> (u64, u64);

    /// 替换种子，之后同一个键会映射到不同位置
    fn reseed(&mut self, primary: u64, secondary: u64);

    /// 策略名称，用于日志和统计
    fn name(&self) -> &'static str;

    /// 由当前种子派生下一组种子
    fn rotate_seeds(&mut self) {
        let (primary, secondary) = self.seeds();
        self.reseed(splitmix64(primary), splitmix64(secondary ^ primary));
    }
}

/// 加盐哈希策略
///
/// 把外部注入的 `hash(key, salt) -> u64` 能力包装为哈希策略：
/// 先用固定密钥的 SipHash 把键压缩为 64 位，再以两个盐分别调用注入函数。
#[derive(Clone)]
pub struct SaltedHashStrategy<F> {
    salted: F,
    salts: (u64, u64),
}

impl<F> SaltedHashStrategy<F>
where
    F: Fn(u64, u64) -> u64,
{
    pub fn new(salted: F, primary_salt: u64, secondary_salt: u64) -> Self {
        Self {
            salted,
            salts: (primary_salt, secondary_salt),
        }
    }
}

impl SaltedHashStrategy<fn(u64, u64) -> u64> {
    /// 使用 SplitMix64 作为加盐函数
    pub fn splitmix(primary_salt: u64, secondary_salt: u64) -> Self {
        fn mix(hash: u64, salt: u64) -> u64 {
            splitmix64(hash ^ splitmix64(salt))
        }
        Self::new(mix, primary_salt, secondary_salt)
    }
}

impl<F> HashStrategy for SaltedHashStrategy<F>
where
    F: Fn(u64, u64) -> u64,
{
    fn hash_pair<Q: Hash + ?Sized>(&self, key: &Q) -> (u64, u64) {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let base = hasher.finish();
        ((self.salted)(base, self.salts.0), (self.salted)(base, self.salts.1))
    }

    fn seeds(&self) -> (u64, u64) {
        self.salts
    }

    fn reseed(&mut self, primary: u64, secondary: u64) {
        self.salts = (primary, secondary);
    }

    fn name(&self) -> &'static str {
        "salted"
    }
}

impl<F> fmt::Debug for SaltedHashStrategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaltedHashStrategy")
            .field("salts", &self.salts)
            .finish()
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salted_strategy_uses_both_salts() {
        let strategy = SaltedHashStrategy::splitmix(1, 2);
        let (h1, h2) = strategy.hash_pair(&"test_key");
        assert_ne!(h1, h2, "两个盐应给出不同的哈希值");
        assert_eq!(strategy.hash_pair(&"test_key"), (h1, h2));
    }

    #[test]
    fn test_custom_salted_closure() {
        let strategy = SaltedHashStrategy::new(|hash: u64, salt: u64| hash.rotate_left(salt as u32), 0, 17);
        let (h1, h2) = strategy.hash_pair(&99u64);
        assert_eq!(h1.rotate_left(17), h2);
        assert_eq!(strategy.name(), "salted");
    }

    #[test]
    fn test_rotate_seeds() {
        let mut strategy = SaltedHashStrategy::splitmix(5, 6);
        let before = strategy.hash_pair(&1234u32);
        strategy.rotate_seeds();
        assert_ne!(strategy.seeds(), (5, 6));
        assert_ne!(strategy.hash_pair(&1234u32), before);
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(HashAlgorithm::XxHash.to_string(), "xxhash64");
        assert_eq!(HashAlgorithm::AHash.as_str(), "ahash");
    }
}
