//! Rust布谷鸟哈希表库
//!
//! 两张等长子表、两个独立哈希函数的布谷鸟哈希集合。每个键只可能位于两个槽位之一，
//! 查找和删除最多读取两个槽位；插入在两个候选位置都被占用时沿踢出链置换，
//! 链长超过上限即容量翻倍并重建。
//!
//! ## 主要特性
//! - 最坏情况常数次探测的查找与删除
//! - 有界踢出链，失败时自动翻倍扩容
//! - 可替换的哈希策略 (AHash、XxHash64、SplitMix64、SipHash)
//! - 操作计数与Prometheus导出
//!
//! ## 快速开始
//!
//! ```rust
//! use cuckoo_table::*;
//!
//! // 每张子表 2^10 个槽位
//! let mut table = CuckooTable::new(10);
//!
//! assert!(table.insert(42u64));
//! assert!(!table.insert(42u64));
//! assert!(table.contains(&42));
//!
//! assert!(table.remove(&42));
//! assert_eq!(table.len(), 0);
//!
//! println!("{:?}", table.stats());
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[doc(hidden)]
pub use log as __log;

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

// 关闭日志时仍对参数做类型检查，避免未使用变量告警
#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

// 核心模块导出
pub mod error;
pub mod hash;
pub mod map;
pub mod stats;
pub mod types;

use std::hash::Hash;

// 公共接口导出
pub use crate::{
    error::CuckooError,
    hash::{
        default_hash_strategy, DoubleHashStrategy, HashAlgorithm, HashStrategy,
        SaltedHashStrategy,
    },
    map::{CuckooMap, CuckooTable, CuckooTableConfig, DEFAULT_CONFIG},
    stats::{MemoryStatsSnapshot, OperationStatsSnapshot, TableStats},
    types::{DEFAULT_LOG_SIZE, MAX_LOG_SIZE, MIN_LOG_SIZE},
};

// 简化默认类型别名
pub type DefaultTable = CuckooTable<u64>;

impl<K, S> std::fmt::Debug for CuckooTable<K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CuckooTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor())
            .finish()
    }
}

// 便捷功能函数

/// 批量插入，返回新插入的键数量
pub fn batch_insert<K, S>(table: &mut CuckooTable<K, S>, keys: impl IntoIterator<Item = K>) -> usize
where
    K: Hash + Eq,
    S: HashStrategy,
{
    let keys = keys.into_iter();
    table.reserve(keys.size_hint().0);
    let mut count = 0;
    for key in keys {
        if table.insert(key) {
            count += 1;
        }
    }
    count
}

/// 批量查询，按输入顺序返回每个键是否存在
pub fn batch_contains<'a, K, S>(
    table: &CuckooTable<K, S>,
    keys: impl IntoIterator<Item = &'a K>,
) -> Vec<bool>
where
    K: Hash + Eq + 'a,
    S: HashStrategy,
{
    keys.into_iter().map(|key| table.contains(key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_helpers() {
        let mut table = DefaultTable::new(4);
        assert_eq!(batch_insert(&mut table, [1, 2, 3, 2, 1]), 3);
        assert_eq!(table.len(), 3);
        assert_eq!(batch_contains(&table, &[1, 4, 3]), vec![true, false, true]);
    }

    #[test]
    fn test_debug_output() {
        let mut table = DefaultTable::new(2);
        table.insert(1);
        let output = format!("{:?}", table);
        assert!(output.starts_with("CuckooTable"));
        assert!(output.contains("len: 1"));
        assert!(output.contains("capacity: 4"));
    }
}
