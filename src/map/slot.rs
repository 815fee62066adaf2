//! 槽位 - 子表中的单个存储单元

use std::{borrow::Borrow, mem};

/// 槽位：空，或者保存一个键（及其附带值）
///
/// 删除直接把槽位置空，不需要墓碑：每个键的两个候选位置由键本身算出，
/// 查找不依赖探测链。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<K, V = ()> {
    Empty,
    Occupied(K, V),
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    /// 检查是否为空槽位
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// 检查是否被占用
    #[inline]
    pub fn is_occupied(&self) -> bool {
        !self.is_empty()
    }

    /// 槽位中的键
    #[inline]
    pub fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied(key, _) => Some(key),
            Slot::Empty => None,
        }
    }

    /// 槽位中的键值对
    #[inline]
    pub fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty => None,
        }
    }

    /// 槽位中的键和可变值
    #[inline]
    pub fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty => None,
        }
    }

    /// 槽位是否保存了指定键
    #[inline]
    pub fn holds<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Slot::Occupied(stored, _) => stored.borrow() == key,
            Slot::Empty => false,
        }
    }

    /// 写入新条目，返回被挤出的旧条目
    #[inline]
    pub fn replace(&mut self, key: K, value: V) -> Option<(K, V)> {
        mem::replace(self, Slot::Occupied(key, value)).into_entry()
    }

    /// 取出条目并置空
    #[inline]
    pub fn take(&mut self) -> Option<(K, V)> {
        mem::take(self).into_entry()
    }

    /// 转换为条目
    #[inline]
    pub fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty => None,
        }
    }
}
