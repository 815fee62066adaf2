//! 布谷鸟哈希映射 - 在集合的寻址之上为每个键附带一个值

use crate::{
    error::CuckooError,
    hash::{DoubleHashStrategy, HashStrategy},
    log_error,
    map::{
        config::CuckooTableConfig,
        raw::{Probe, RawTable},
    },
    stats::TableStats,
    types::{OperationType, DEFAULT_LOG_SIZE},
};
use std::{borrow::Borrow, fmt, hash::Hash};

pub use crate::map::raw::RawIter as Iter;

/// 布谷鸟哈希映射
///
/// 寻址、踢出和扩容规则与 [`CuckooTable`](crate::CuckooTable) 完全相同，
/// 值随键一起在两张子表之间移动。
pub struct CuckooMap<K, V, S = DoubleHashStrategy> {
    raw: RawTable<K, V, S>,
}

impl<K, V> CuckooMap<K, V>
where
    K: Hash + Eq,
{
    /// 创建每张子表 `2^log_size` 个槽位的空映射
    ///
    /// # Panics
    ///
    /// `log_size` 越界或内存分配失败。
    pub fn new(log_size: u32) -> Self {
        match Self::with_config(CuckooTableConfig::with_log_size(log_size)) {
            Ok(map) => map,
            Err(err) => panic!("创建布谷鸟哈希映射失败: {}", err),
        }
    }

    pub fn with_config(config: CuckooTableConfig) -> Result<Self, CuckooError> {
        config.validate_seeds()?;
        let hasher = config.build_hasher();
        Self::with_config_and_hasher(config, hasher)
    }
}

impl<K, V, S> CuckooMap<K, V, S>
where
    K: Hash + Eq,
    S: HashStrategy,
{
    pub fn with_config_and_hasher(config: CuckooTableConfig, hasher: S) -> Result<Self, CuckooError> {
        Ok(Self {
            raw: RawTable::with_hasher(&config, hasher)?,
        })
    }

    /// 插入键值对，键已存在时替换值并返回旧值
    ///
    /// # Panics
    ///
    /// 扩容时内存耗尽。
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(err) => {
                log_error!("cuckoo map insert failed: {}", err);
                panic!("布谷鸟哈希映射扩容失败: {}", err)
            }
        }
    }

    /// 插入键值对，扩容分配失败时返回错误且映射不变
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, CuckooError> {
        match self.raw.probe(&key) {
            Probe::Found(table, index) => {
                self.raw.record(OperationType::DuplicateInsert);
                Ok(self
                    .raw
                    .entry_at_mut(table, index)
                    .map(|(_, slot)| std::mem::replace(slot, value)))
            }
            Probe::Vacant(candidates) => {
                self.raw.insert_vacant(key, value, candidates)?;
                Ok(None)
            }
        }
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.get(key).map(|(_, value)| value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.get_mut(key).map(|(_, value)| value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.get(key)
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        matches!(self.raw.probe(key), Probe::Found(..))
    }

    /// 删除键，返回其值
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.remove(key).map(|(_, value)| value)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.raw.remove(key)
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), CuckooError> {
        self.raw.reserve(additional)
    }

    pub fn stats(&self) -> TableStats {
        self.raw.stats()
    }

    #[doc(hidden)]
    pub fn check_invariants(&self) -> Result<(), String> {
        self.raw.check_invariants()
    }
}

impl<K, V, S> CuckooMap<K, V, S> {
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// 单表容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[inline]
    pub fn log_size(&self) -> u32 {
        self.raw.log_size()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.raw.load_factor()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.raw.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.raw.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.raw.iter().map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// 取出所有键值对，保留容量
    pub fn drain(&mut self) -> std::vec::IntoIter<(K, V)> {
        self.raw.drain().into_iter()
    }
}

impl<K, V> Default for CuckooMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new(DEFAULT_LOG_SIZE)
    }
}

impl<K, V, S> Extend<(K, V)> for CuckooMap<K, V, S>
where
    K: Hash + Eq,
    S: HashStrategy,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for CuckooMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a CuckooMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for CuckooMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_value() {
        let mut map = CuckooMap::new(4);
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.stats().operations.duplicate_insert_count, 1);
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut map: CuckooMap<String, Vec<u32>> = CuckooMap::new(3);
        map.insert("k".to_string(), vec![1]);
        if let Some(values) = map.get_mut("k") {
            values.push(2);
        }
        assert_eq!(map.get("k"), Some(&vec![1, 2]));
        assert!(map.contains_key("k"));
        assert_eq!(
            map.get_key_value("k").map(|(k, _)| k.as_str()),
            Some("k")
        );

        assert_eq!(map.remove("k"), Some(vec![1, 2]));
        assert_eq!(map.remove("k"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_values_follow_keys_through_growth() {
        let mut map = CuckooMap::new(1);
        for key in 0..3_000u64 {
            map.insert(key, key * 3);
        }
        assert!(map.log_size() > 1);
        map.check_invariants().unwrap();
        for key in 0..3_000u64 {
            assert_eq!(map.get(&key), Some(&(key * 3)));
        }
        let sum: u64 = map.values().sum();
        assert_eq!(sum, (0..3_000u64).map(|k| k * 3).sum::<u64>());
    }

    #[test]
    fn test_collect_and_drain() {
        let mut map: CuckooMap<u32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
        assert_eq!(map.len(), 3);
        assert_eq!(map.keys().count(), 3);
        assert_eq!(format!("{:?}", CuckooMap::<u32, char>::new(2)), "{}");

        let mut drained: Vec<(u32, char)> = map.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
        assert!(map.is_empty());
        assert_eq!(map.remove_entry(&1), None);
    }
}
