//! 布谷鸟哈希核心实现
//!
//! 两张等长子表，每个键在两张表中各有一个候选槽位。插入时先尝试两个候选位置，
//! 都被占用则从表 A 开始沿踢出链交替置换；踢出次数超过上限即视为出现循环，
//! 容量翻倍并重建两张子表。

use crate::{
    error::CuckooError,
    hash::{slot_index, HashStrategy},
    log_debug, log_error, log_info, log_warn,
    map::{config::CuckooTableConfig, slot::Slot},
    stats::{MemoryStatsSnapshot, OperationStats, TableStats},
    types::{capacity_for, max_kicks_for, OperationType, TableId, MAX_LOG_SIZE},
};
use std::{
    borrow::Borrow,
    hash::Hash,
    iter::{Chain, FusedIterator},
    mem, slice,
};

/// 探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// 键已存在于指定子表的指定槽位
    Found(TableId, usize),
    /// 键不存在，附带两个候选下标
    Vacant([usize; 2]),
}

/// 布谷鸟哈希表核心，集合与映射共用
pub(crate) struct RawTable<K, V, S> {
    tables: [Vec<Slot<K, V>>; 2],
    log_size: u32,
    len: usize,
    max_kicks: usize,
    kick_override: Option<usize>,
    rotate_seeds_on_resize: bool,
    hasher: S,
    ops: OperationStats,
}

impl<K, V, S> RawTable<K, V, S> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn log_size(&self) -> u32 {
        self.log_size
    }

    /// 单表容量
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        capacity_for(self.log_size)
    }

    #[inline]
    fn mask(&self) -> usize {
        self.capacity() - 1
    }

    /// 两张子表的槽位总数
    #[inline]
    pub(crate) fn total_slots(&self) -> usize {
        self.capacity() * 2
    }

    #[inline]
    pub(crate) fn max_kicks(&self) -> usize {
        self.max_kicks
    }

    /// `len / (2 * capacity)`
    #[inline]
    pub(crate) fn load_factor(&self) -> f64 {
        self.len as f64 / self.total_slots() as f64
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn record(&mut self, op_type: OperationType) {
        self.ops.record(op_type);
    }

    pub(crate) fn reset_stats(&mut self) {
        self.ops.reset();
    }

    pub(crate) fn iter(&self) -> RawIter<'_, K, V> {
        RawIter {
            slots: self.tables[0].iter().chain(self.tables[1].iter()),
            remaining: self.len,
        }
    }

    /// 清空所有槽位，保留容量
    pub(crate) fn clear(&mut self) {
        for table in &mut self.tables {
            table.fill_with(Slot::default);
        }
        self.len = 0;
    }

    /// 取出所有条目，保留容量
    pub(crate) fn drain(&mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.len);
        for slot in self.tables.iter_mut().flat_map(|table| table.iter_mut()) {
            if let Some(entry) = slot.take() {
                entries.push(entry);
            }
        }
        self.len = 0;
        entries
    }

    /// 指定槽位的键和可变值
    pub(crate) fn entry_at_mut(&mut self, table: TableId, index: usize) -> Option<(&K, &mut V)> {
        self.tables[table.index()][index].entry_mut()
    }

    /// 分配两张空子表
    fn allocate_tables(log_size: u32) -> Result<[Vec<Slot<K, V>>; 2], CuckooError> {
        if log_size > MAX_LOG_SIZE {
            return Err(CuckooError::CapacityOverflow { log_size });
        }
        let capacity = capacity_for(log_size);
        Ok([Self::allocate_slots(capacity)?, Self::allocate_slots(capacity)?])
    }

    fn allocate_slots(capacity: usize) -> Result<Vec<Slot<K, V>>, CuckooError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| CuckooError::AllocationFailed {
                size: capacity.saturating_mul(mem::size_of::<Slot<K, V>>()),
                align: mem::align_of::<Slot<K, V>>(),
            })?;
        slots.resize_with(capacity, Slot::default);
        Ok(slots)
    }
}

impl<K, V, S> RawTable<K, V, S>
where
    K: Hash + Eq,
    S: HashStrategy,
{
    /// 按配置创建空表
    pub(crate) fn with_hasher(config: &CuckooTableConfig, hasher: S) -> Result<Self, CuckooError> {
        config.validate()?;
        let tables = Self::allocate_tables(config.log_size)?;
        let max_kicks = config.kick_limit(config.log_size);

        log_debug!(
            "created cuckoo table: log_size={}, capacity={}, max_kicks={}, hasher={}",
            config.log_size,
            capacity_for(config.log_size),
            max_kicks,
            hasher.name()
        );

        Ok(Self {
            tables,
            log_size: config.log_size,
            len: 0,
            max_kicks,
            kick_override: config.max_kicks,
            rotate_seeds_on_resize: config.rotate_seeds_on_resize,
            hasher,
            ops: OperationStats::new(),
        })
    }

    /// 键在表 A、表 B 中的候选下标
    #[inline]
    fn candidates<Q>(&self, key: &Q) -> [usize; 2]
    where
        Q: Hash + ?Sized,
    {
        let (h1, h2) = self.hasher.hash_pair(key);
        let mask = self.mask();
        [slot_index(h1, mask), slot_index(h2, mask)]
    }

    /// 读取两个候选槽位，判断键是否存在
    #[inline]
    pub(crate) fn probe<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let candidates = self.candidates(key);
        for table in TableId::BOTH {
            let index = candidates[table.index()];
            if self.tables[table.index()][index].holds(key) {
                return Probe::Found(table, index);
            }
        }
        Probe::Vacant(candidates)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Found(table, index) => self.tables[table.index()][index].entry(),
            Probe::Vacant(_) => None,
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Found(table, index) => self.entry_at_mut(table, index),
            Probe::Vacant(_) => None,
        }
    }

    /// 删除键，返回被删除的条目
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Found(table, index) => {
                let entry = self.tables[table.index()][index].take();
                self.len -= 1;
                self.ops.record(OperationType::Remove);
                entry
            }
            Probe::Vacant(_) => {
                self.ops.record(OperationType::MissedRemove);
                None
            }
        }
    }

    /// 插入一个已确认不存在的键
    ///
    /// 踢出链耗尽时自动扩容。只有扩容的第一次分配失败才会返回错误，
    /// 此时踢出链已回滚，表内容与调用前一致，传入的条目被丢弃。
    /// 扩容重试过程中的分配失败不可恢复，直接 panic。
    pub(crate) fn insert_vacant(
        &mut self,
        key: K,
        value: V,
        candidates: [usize; 2],
    ) -> Result<(), CuckooError> {
        let (key, value) = match self.place(key, value, candidates) {
            Ok(()) => {
                self.len += 1;
                self.ops.record(OperationType::Insert);
                return Ok(());
            }
            Err(homeless) => homeless,
        };

        self.ops.record(OperationType::ChainExhausted);
        log_debug!(
            "kick chain exhausted after {} kicks (log_size={}, len={}, load_factor={:.4})",
            self.max_kicks,
            self.log_size,
            self.len,
            self.load_factor()
        );

        let fresh = match Self::allocate_tables(self.log_size + 1) {
            Ok(fresh) => fresh,
            Err(err) => {
                // 回滚踢出链，表恢复到插入前的状态
                let _ = self.unwind_chain(key, value, self.max_kicks);
                return Err(err);
            }
        };
        self.rehash(fresh, vec![(key, value)]);

        self.len += 1;
        self.ops.record(OperationType::Insert);
        Ok(())
    }

    /// 预留空间，使再插入 `additional` 个键后负载不超过一半
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), CuckooError> {
        let overflow = CuckooError::CapacityOverflow {
            log_size: usize::BITS,
        };
        let target = self.len.checked_add(additional).ok_or_else(|| overflow.clone())?;
        let needed = target
            .max(1)
            .checked_next_power_of_two()
            .ok_or(overflow)?
            .trailing_zeros();
        if needed <= self.log_size {
            return Ok(());
        }

        let fresh = Self::allocate_tables(needed)?;
        self.rehash(fresh, Vec::new());
        Ok(())
    }

    /// 放入条目：先试两个候选槽位，再走踢出链
    ///
    /// 失败时返回无处安放的条目（不一定是传入的那个）。
    fn place(&mut self, key: K, value: V, candidates: [usize; 2]) -> Result<(), (K, V)> {
        for table in TableId::BOTH {
            let slot = &mut self.tables[table.index()][candidates[table.index()]];
            if slot.is_empty() {
                *slot = Slot::Occupied(key, value);
                return Ok(());
            }
        }
        self.kick_chain(key, value, candidates[TableId::A.index()])
    }

    /// 从表 A 的 `start` 开始踢出，最多 `max_kicks` 次
    fn kick_chain(&mut self, key: K, value: V, start: usize) -> Result<(), (K, V)> {
        let mut entry = (key, value);
        let mut table = TableId::A;
        let mut index = start;
        let mut kicks = 0u64;

        let result = loop {
            if kicks == self.max_kicks as u64 {
                break Err(entry);
            }

            let (key, value) = entry;
            entry = match self.tables[table.index()][index].replace(key, value) {
                Some(evicted) => evicted,
                None => break Ok(()),
            };
            kicks += 1;

            // 被踢出的键去另一张表找自己的候选位置
            table = table.other();
            index = self.candidates(&entry.0)[table.index()];
            let slot = &mut self.tables[table.index()][index];
            if slot.is_empty() {
                let (key, value) = entry;
                *slot = Slot::Occupied(key, value);
                break Ok(());
            }
        };

        self.ops.record_n(OperationType::Kick, kicks);
        result
    }

    /// 逆序撤销 `kicks` 次踢出，返回最初插入的条目
    ///
    /// 每次踢出都是一次交换，且被踢出者在该表中的候选位置就是它原来的槽位，
    /// 所以按相反顺序再交换一遍即可还原。
    fn unwind_chain(&mut self, key: K, value: V, kicks: usize) -> Option<(K, V)> {
        let mut entry = (key, value);
        // 最后一次踢出发生在哪张表由踢出次数的奇偶决定
        let mut table = if kicks % 2 == 1 { TableId::A } else { TableId::B };
        for _ in 0..kicks {
            let index = self.candidates(&entry.0)[table.index()];
            let (key, value) = entry;
            entry = self.tables[table.index()][index].replace(key, value)?;
            table = table.other();
        }
        Some(entry)
    }

    /// 换上新子表并重新放入所有条目
    ///
    /// 重建中仍有条目无处安放时继续翻倍，直到全部放入。
    /// 这是表中唯一没有延迟上界的操作。
    fn rehash(&mut self, fresh: [Vec<Slot<K, V>>; 2], mut carried: Vec<(K, V)>) {
        let from = self.log_size;
        let mut tables = fresh;
        let mut attempts = 0u64;

        loop {
            attempts += 1;
            let old = mem::replace(&mut self.tables, tables);
            self.log_size = self.tables[0].len().trailing_zeros();
            self.max_kicks = self
                .kick_override
                .unwrap_or_else(|| max_kicks_for(self.log_size));
            if self.rotate_seeds_on_resize {
                self.hasher.rotate_seeds();
                log_debug!("rotated hash seeds to {:?}", self.hasher.seeds());
            }

            let mut spilled = Vec::new();
            let entries = old
                .into_iter()
                .flatten()
                .filter_map(Slot::into_entry)
                .chain(carried);
            for (key, value) in entries {
                let candidates = self.candidates(&key);
                if let Err(homeless) = self.place(key, value, candidates) {
                    spilled.push(homeless);
                }
            }

            if spilled.is_empty() {
                break;
            }

            log_warn!(
                "rehash attempt {} at log_size={} left {} entries homeless",
                attempts,
                self.log_size,
                spilled.len()
            );
            carried = spilled;
            tables = match Self::allocate_tables(self.log_size + 1) {
                Ok(tables) => tables,
                Err(err) => {
                    log_error!("cuckoo table rehash failed: {}", err);
                    panic!("布谷鸟哈希表扩容失败: {}", err);
                }
            };
        }

        self.ops.record(OperationType::Resize);
        self.ops.record_n(OperationType::RehashAttempt, attempts);
        log_info!(
            "cuckoo table resized: log_size {} -> {}, len={}, attempts={}",
            from,
            self.log_size,
            self.len,
            attempts
        );
    }

    pub(crate) fn stats(&self) -> TableStats {
        TableStats {
            len: self.len,
            capacity: self.capacity(),
            log_size: self.log_size,
            max_kicks: self.max_kicks,
            load_factor: self.load_factor(),
            hasher: self.hasher.name(),
            memory: MemoryStatsSnapshot::for_slots::<Slot<K, V>>(self.total_slots(), self.len),
            operations: self.ops.snapshot(),
        }
    }

    /// 全表校验：每个键都在自己的候选位置、只出现一次、计数一致
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let capacity = self.capacity();
        if !capacity.is_power_of_two() {
            return Err(format!("容量 {} 不是 2 的幂", capacity));
        }
        for table in TableId::BOTH {
            let actual = self.tables[table.index()].len();
            if actual != capacity {
                return Err(format!(
                    "表 {} 长度 {} 与容量 {} 不符",
                    table.as_str(),
                    actual,
                    capacity
                ));
            }
        }

        let mut occupied = 0;
        for table in TableId::BOTH {
            for (index, slot) in self.tables[table.index()].iter().enumerate() {
                let Some(key) = slot.key() else {
                    continue;
                };
                occupied += 1;

                let candidates = self.candidates(key);
                if candidates[table.index()] != index {
                    return Err(format!(
                        "表 {} 槽位 {} 的键不在候选位置 {}",
                        table.as_str(),
                        index,
                        candidates[table.index()]
                    ));
                }
                let other = table.other();
                if self.tables[other.index()][candidates[other.index()]].holds(key) {
                    return Err(format!(
                        "表 {} 槽位 {} 的键同时出现在表 {}",
                        table.as_str(),
                        index,
                        other.as_str()
                    ));
                }
            }
        }

        if occupied != self.len {
            return Err(format!("占用槽位 {} 与计数 {} 不符", occupied, self.len));
        }
        Ok(())
    }
}

/// 按槽位顺序遍历条目：先表 A，后表 B
pub struct RawIter<'a, K, V> {
    slots: Chain<slice::Iter<'a, Slot<K, V>>, slice::Iter<'a, Slot<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in &mut self.slots {
            if let Some(entry) = slot.entry() {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RawIter<'_, K, V> {}

impl<K, V> FusedIterator for RawIter<'_, K, V> {}

impl<K, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}
