//! 布谷鸟哈希集合
//!
//! 每个键恰好有两个候选槽位（表 A 一个、表 B 一个），查找最多读取两个槽位。
//! 插入可能沿踢出链置换已有键，链长超过上限时容量翻倍并重建。

use crate::{
    error::CuckooError,
    hash::{DoubleHashStrategy, HashStrategy},
    log_error,
    map::{
        config::CuckooTableConfig,
        raw::{Probe, RawIter, RawTable},
        DEFAULT_CONFIG,
    },
    stats::TableStats,
    types::{OperationType, DEFAULT_LOG_SIZE, MAX_LOG_SIZE, MIN_LOG_SIZE},
};
use std::{borrow::Borrow, hash::Hash, iter::FusedIterator};

/// 布谷鸟哈希集合
///
/// 不是线程安全的：修改操作需要 `&mut self`，多线程共享时由调用方加锁。
///
/// ```
/// use cuckoo_table::CuckooTable;
///
/// let mut table = CuckooTable::new(4);
/// assert!(table.insert(7u64));
/// assert!(!table.insert(7u64));
/// assert!(table.contains(&7));
/// assert_eq!(table.len(), 1);
/// assert!(table.remove(&7));
/// assert!(table.is_empty());
/// ```
pub struct CuckooTable<K, S = DoubleHashStrategy> {
    raw: RawTable<K, (), S>,
}

impl<K> CuckooTable<K>
where
    K: Hash + Eq,
{
    /// 创建每张子表 `2^log_size` 个槽位的空表
    ///
    /// # Panics
    ///
    /// `log_size` 不在 `[MIN_LOG_SIZE, MAX_LOG_SIZE]` 内，或内存分配失败。
    pub fn new(log_size: u32) -> Self {
        assert!(
            (MIN_LOG_SIZE..=MAX_LOG_SIZE).contains(&log_size),
            "log_size 必须在 [{}, {}] 范围内，实际为 {}",
            MIN_LOG_SIZE,
            MAX_LOG_SIZE,
            log_size
        );
        let config = CuckooTableConfig {
            log_size,
            ..DEFAULT_CONFIG.clone()
        };
        match Self::with_config(config) {
            Ok(table) => table,
            Err(err) => panic!("创建布谷鸟哈希表失败: {}", err),
        }
    }

    /// 按配置创建，配置无效时返回错误
    pub fn with_config(config: CuckooTableConfig) -> Result<Self, CuckooError> {
        config.validate_seeds()?;
        let hasher = config.build_hasher();
        Self::with_config_and_hasher(config, hasher)
    }
}

impl<K, S> CuckooTable<K, S>
where
    K: Hash + Eq,
    S: HashStrategy,
{
    /// 使用自定义哈希策略创建
    ///
    /// # Panics
    ///
    /// 与 [`CuckooTable::new`] 相同。
    pub fn with_hasher(log_size: u32, hasher: S) -> Self {
        match Self::with_config_and_hasher(CuckooTableConfig::with_log_size(log_size), hasher) {
            Ok(table) => table,
            Err(err) => panic!("创建布谷鸟哈希表失败: {}", err),
        }
    }

    /// 使用配置和自定义哈希策略创建，配置中的算法和种子被忽略
    pub fn with_config_and_hasher(config: CuckooTableConfig, hasher: S) -> Result<Self, CuckooError> {
        Ok(Self {
            raw: RawTable::with_hasher(&config, hasher)?,
        })
    }

    /// 插入键，返回是否为新键
    ///
    /// 键已存在时不做任何修改并返回 `false`。必要时自动扩容。
    ///
    /// # Panics
    ///
    /// 扩容时内存耗尽。
    pub fn insert(&mut self, key: K) -> bool {
        match self.try_insert(key) {
            Ok(inserted) => inserted,
            Err(err) => {
                log_error!("cuckoo table insert failed: {}", err);
                panic!("布谷鸟哈希表扩容失败: {}", err)
            }
        }
    }

    /// 插入键，扩容分配失败时返回错误
    ///
    /// 返回错误时表内容不变，传入的键未被插入。
    pub fn try_insert(&mut self, key: K) -> Result<bool, CuckooError> {
        match self.raw.probe(&key) {
            Probe::Found(..) => {
                self.raw.record(OperationType::DuplicateInsert);
                Ok(false)
            }
            Probe::Vacant(candidates) => {
                self.raw.insert_vacant(key, (), candidates)?;
                Ok(true)
            }
        }
    }

    /// 键是否存在，恰好读取两个槽位
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        matches!(self.raw.probe(key), Probe::Found(..))
    }

    /// 返回表中与 `key` 相等的键
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.get(key).map(|(key, _)| key)
    }

    /// 删除键，返回键是否存在过
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).is_some()
    }

    /// 删除并返回键
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.remove(key).map(|(key, _)| key)
    }

    /// 预留空间，使再插入 `additional` 个键时负载不超过一半
    ///
    /// # Panics
    ///
    /// 内存耗尽或容量溢出。
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            log_error!("cuckoo table reserve failed: {}", err);
            panic!("布谷鸟哈希表预留空间失败: {}", err);
        }
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), CuckooError> {
        self.raw.reserve(additional)
    }

    /// 统计快照
    pub fn stats(&self) -> TableStats {
        self.raw.stats()
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        self.stats().export_prometheus()
    }

    #[doc(hidden)]
    pub fn check_invariants(&self) -> Result<(), String> {
        self.raw.check_invariants()
    }
}

impl<K, S> CuckooTable<K, S> {
    /// 存活键数量
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// 单表容量，总是 2 的幂
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// 两张子表的槽位总数
    #[inline]
    pub fn total_slots(&self) -> usize {
        self.raw.total_slots()
    }

    /// 容量指数，只增不减
    #[inline]
    pub fn log_size(&self) -> u32 {
        self.raw.log_size()
    }

    /// 当前踢出链上限
    #[inline]
    pub fn max_kicks(&self) -> usize {
        self.raw.max_kicks()
    }

    /// 负载因子 `len / (2 * capacity)`
    ///
    /// 两张表各一个候选位置的布谷鸟哈希在负载接近 0.5 时踢出链迅速变长，
    /// 扩容通常在此之前触发，因此实际值远小于 1。
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.raw.load_factor()
    }

    pub fn hasher(&self) -> &S {
        self.raw.hasher()
    }

    /// 清零操作计数
    pub fn reset_stats(&mut self) {
        self.raw.reset_stats();
    }

    /// 遍历所有键，顺序不确定
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// 删除所有键，保留容量
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// 取出所有键，保留容量
    pub fn drain(&mut self) -> std::vec::IntoIter<K> {
        self.raw
            .drain()
            .into_iter()
            .map(|(key, _)| key)
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<K> Default for CuckooTable<K>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new(DEFAULT_LOG_SIZE)
    }
}

impl<K, S> Extend<K> for CuckooTable<K, S>
where
    K: Hash + Eq,
    S: HashStrategy,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for CuckooTable<K>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<'a, K, S> IntoIterator for &'a CuckooTable<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 键迭代器
pub struct Iter<'a, K> {
    inner: RawIter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
