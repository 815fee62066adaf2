//! 哈希表配置

use crate::{
    error::CuckooError,
    hash::{DoubleHashStrategy, HashAlgorithm, DEFAULT_PRIMARY_SEED, DEFAULT_SECONDARY_SEED},
    types::{max_kicks_for, DEFAULT_LOG_SIZE, MAX_LOG_SIZE, MIN_LOG_SIZE},
};

/// 哈希表配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CuckooTableConfig {
    /// 初始容量指数，每张子表 `2^log_size` 个槽位
    pub log_size: u32,
    /// 踢出链上限；`None` 时随容量指数缩放
    pub max_kicks: Option<usize>,
    pub hash_algorithm: HashAlgorithm,
    /// 表 A 哈希函数的种子
    pub primary_seed: u64,
    /// 表 B 哈希函数的种子
    pub secondary_seed: u64,
    /// 每次扩容时是否派生新种子
    pub rotate_seeds_on_resize: bool,
}

impl Default for CuckooTableConfig {
    fn default() -> Self {
        Self {
            log_size: DEFAULT_LOG_SIZE,
            max_kicks: None,
            hash_algorithm: HashAlgorithm::AHash,
            primary_seed: DEFAULT_PRIMARY_SEED,
            secondary_seed: DEFAULT_SECONDARY_SEED,
            rotate_seeds_on_resize: false,
        }
    }
}

impl CuckooTableConfig {
    /// 默认配置，指定容量指数
    pub fn with_log_size(log_size: u32) -> Self {
        Self {
            log_size,
            ..Self::default()
        }
    }

    /// 换成随机种子
    pub fn with_random_seeds(mut self) -> Self {
        self.primary_seed = rand::random();
        self.secondary_seed = loop {
            let seed = rand::random();
            if seed != self.primary_seed {
                break seed;
            }
        };
        self
    }

    /// 校验容量和踢出上限
    pub fn validate(&self) -> Result<(), CuckooError> {
        if self.log_size < MIN_LOG_SIZE {
            return Err(CuckooError::invalid_config(format!(
                "log_size 不能小于 {}，实际为 {}",
                MIN_LOG_SIZE, self.log_size
            )));
        }
        if self.log_size > MAX_LOG_SIZE {
            return Err(CuckooError::invalid_config(format!(
                "log_size 不能大于 {}，实际为 {}",
                MAX_LOG_SIZE, self.log_size
            )));
        }
        if self.max_kicks == Some(0) {
            return Err(CuckooError::invalid_config("max_kicks 必须大于 0"));
        }
        Ok(())
    }

    /// 校验种子：两个哈希函数必须不同
    pub fn validate_seeds(&self) -> Result<(), CuckooError> {
        if self.primary_seed == self.secondary_seed {
            return Err(CuckooError::invalid_config(format!(
                "两个哈希种子不能相同: {}",
                self.primary_seed
            )));
        }
        Ok(())
    }

    /// 指定容量指数下的踢出链上限
    pub fn kick_limit(&self, log_size: u32) -> usize {
        self.max_kicks.unwrap_or_else(|| max_kicks_for(log_size))
    }

    /// 按配置构造双哈希策略
    pub fn build_hasher(&self) -> DoubleHashStrategy {
        DoubleHashStrategy::with_seeds(self.hash_algorithm, self.primary_seed, self.secondary_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashStrategy;

    #[test]
    fn test_default_is_valid() {
        let config = CuckooTableConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_seeds().is_ok());
        assert_eq!(config.kick_limit(config.log_size), max_kicks_for(DEFAULT_LOG_SIZE));
    }

    #[test]
    fn test_invalid_log_size() {
        let err = CuckooTableConfig::with_log_size(0).validate().unwrap_err();
        assert!(matches!(err, CuckooError::InvalidConfig { .. }));
        assert!(CuckooTableConfig::with_log_size(MAX_LOG_SIZE + 1).validate().is_err());
    }

    #[test]
    fn test_zero_kicks_rejected() {
        let config = CuckooTableConfig {
            max_kicks: Some(0),
            ..CuckooTableConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CuckooTableConfig {
            max_kicks: Some(5),
            ..CuckooTableConfig::default()
        };
        assert_eq!(config.kick_limit(20), 5);
    }

    #[test]
    fn test_equal_seeds_rejected() {
        let config = CuckooTableConfig {
            primary_seed: 9,
            secondary_seed: 9,
            ..CuckooTableConfig::default()
        };
        assert!(config.validate_seeds().is_err());
        assert!(CuckooTableConfig::default().with_random_seeds().validate_seeds().is_ok());
    }

    #[test]
    fn test_build_hasher() {
        let config = CuckooTableConfig {
            hash_algorithm: HashAlgorithm::SplitMix,
            primary_seed: 1,
            secondary_seed: 2,
            ..CuckooTableConfig::default()
        };
        let hasher = config.build_hasher();
        assert_eq!(hasher.seeds(), (1, 2));
        assert_eq!(hasher.name(), "splitmix64");
    }
}
