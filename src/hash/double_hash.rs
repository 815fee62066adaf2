//! 双哈希策略 - 同一算法以两个不同种子构造两个独立哈希函数

use crate::hash::{
    splitmix::{splitmix64, SplitMixHasher},
    strategy::{HashAlgorithm, HashStrategy},
};
use ahash::RandomState;
use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

/// 表 A 的默认种子
pub const DEFAULT_PRIMARY_SEED: u64 = 42;
/// 表 B 的默认种子
pub const DEFAULT_SECONDARY_SEED: u64 = 123;

/// 带种子的单个哈希函数
#[derive(Clone)]
enum SeededHasher {
    AHash { state: RandomState, seed: u64 },
    XxHash { seed: u64 },
    SplitMix { seed: u64 },
    Default { seed: u64 },
}

impl SeededHasher {
    fn new(algorithm: HashAlgorithm, seed: u64) -> Self {
        match algorithm {
            HashAlgorithm::AHash => {
                // 四个密钥都由种子派生，保证同一种子可复现
                let k1 = splitmix64(seed);
                let k2 = splitmix64(k1);
                let k3 = splitmix64(k2);
                Self::AHash {
                    state: RandomState::with_seeds(seed, k1, k2, k3),
                    seed,
                }
            }
            HashAlgorithm::XxHash => Self::XxHash { seed },
            HashAlgorithm::SplitMix => Self::SplitMix { seed },
            HashAlgorithm::Default => Self::Default { seed },
        }
    }

    fn seed(&self) -> u64 {
        match self {
            Self::AHash { seed, .. }
            | Self::XxHash { seed }
            | Self::SplitMix { seed }
            | Self::Default { seed } => *seed,
        }
    }

    #[inline]
    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        match self {
            Self::AHash { state, .. } => {
                let mut hasher = state.build_hasher();
                key.hash(&mut hasher);
                hasher.finish()
            }
            Self::XxHash { seed } => {
                let mut hasher = twox_hash::XxHash64::with_seed(*seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
            Self::SplitMix { seed } => {
                let mut hasher = SplitMixHasher::with_seed(*seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
            Self::Default { seed } => {
                // SipHash 没有种子参数，先写入种子加以区分
                let mut hasher = DefaultHasher::new();
                hasher.write_u64(*seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}

/// 双哈希策略
#[derive(Clone)]
pub struct DoubleHashStrategy {
    algorithm: HashAlgorithm,
    primary: SeededHasher,
    secondary: SeededHasher,
}

impl DoubleHashStrategy {
    /// 使用默认种子创建
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self::with_seeds(algorithm, DEFAULT_PRIMARY_SEED, DEFAULT_SECONDARY_SEED)
    }

    /// 使用指定种子创建
    pub fn with_seeds(algorithm: HashAlgorithm, primary_seed: u64, secondary_seed: u64) -> Self {
        Self {
            algorithm,
            primary: SeededHasher::new(algorithm, primary_seed),
            secondary: SeededHasher::new(algorithm, secondary_seed),
        }
    }

    /// 使用随机种子创建
    pub fn random(algorithm: HashAlgorithm) -> Self {
        Self::with_seeds(algorithm, rand::random(), rand::random())
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl Default for DoubleHashStrategy {
    fn default() -> Self {
        Self::new(HashAlgorithm::AHash)
    }
}

impl HashStrategy for DoubleHashStrategy {
    #[inline]
    fn hash_pair<Q: Hash + ?Sized>(&self, key: &Q) -> (u64, u64) {
        (self.primary.hash(key), self.secondary.hash(key))
    }

    fn seeds(&self) -> (u64, u64) {
        (self.primary.seed(), self.secondary.seed())
    }

    fn reseed(&mut self, primary: u64, secondary: u64) {
        self.primary = SeededHasher::new(self.algorithm, primary);
        self.secondary = SeededHasher::new(self.algorithm, secondary);
    }

    fn name(&self) -> &'static str {
        self.algorithm.as_str()
    }
}

impl fmt::Debug for DoubleHashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleHashStrategy")
            .field("algorithm", &self.algorithm)
            .field("seeds", &self.seeds())
            .finish()
    }
}
