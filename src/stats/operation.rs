// src/stats/operation.rs
//! 操作统计 - 跟踪插入、删除、踢出和扩容次数

use crate::types::OperationType;

/// 操作计数器
///
/// 表不是线程安全的，所有计数都由 `&mut self` 操作更新，无需原子类型。
#[derive(Debug, Default, Clone)]
pub struct OperationStats {
    insert_count: u64,
    duplicate_insert_count: u64,
    remove_count: u64,
    missed_remove_count: u64,
    kick_count: u64,
    chain_exhausted_count: u64,
    resize_count: u64,
    rehash_attempt_count: u64,
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub duplicate_insert_count: u64,
    pub remove_count: u64,
    pub missed_remove_count: u64,
    pub kick_count: u64,
    pub chain_exhausted_count: u64,
    pub resize_count: u64,
    pub rehash_attempt_count: u64,
}

impl OperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次操作
    #[inline]
    pub fn record(&mut self, op_type: OperationType) {
        self.record_n(op_type, 1);
    }

    /// 记录多次同类操作
    #[inline]
    pub fn record_n(&mut self, op_type: OperationType, n: u64) {
        let counter = match op_type {
            OperationType::Insert => &mut self.insert_count,
            OperationType::DuplicateInsert => &mut self.duplicate_insert_count,
            OperationType::Remove => &mut self.remove_count,
            OperationType::MissedRemove => &mut self.missed_remove_count,
            OperationType::Kick => &mut self.kick_count,
            OperationType::ChainExhausted => &mut self.chain_exhausted_count,
            OperationType::Resize => &mut self.resize_count,
            OperationType::RehashAttempt => &mut self.rehash_attempt_count,
        };
        *counter = counter.saturating_add(n);
    }

    /// 获取快照
    pub fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            insert_count: self.insert_count,
            duplicate_insert_count: self.duplicate_insert_count,
            remove_count: self.remove_count,
            missed_remove_count: self.missed_remove_count,
            kick_count: self.kick_count,
            chain_exhausted_count: self.chain_exhausted_count,
            resize_count: self.resize_count,
            rehash_attempt_count: self.rehash_attempt_count,
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl OperationStatsSnapshot {
    /// 按操作类型读取计数
    pub fn count(&self, op_type: OperationType) -> u64 {
        match op_type {
            OperationType::Insert => self.insert_count,
            OperationType::DuplicateInsert => self.duplicate_insert_count,
            OperationType::Remove => self.remove_count,
            OperationType::MissedRemove => self.missed_remove_count,
            OperationType::Kick => self.kick_count,
            OperationType::ChainExhausted => self.chain_exhausted_count,
            OperationType::Resize => self.resize_count,
            OperationType::RehashAttempt => self.rehash_attempt_count,
        }
    }

    /// 平均每次新插入的踢出次数
    pub fn kicks_per_insert(&self) -> f64 {
        if self.insert_count == 0 {
            0.0
        } else {
            self.kick_count as f64 / self.insert_count as f64
        }
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        for op in OperationType::ALL {
            output.push_str(&format!(
                "# HELP cuckoo_operation_{}_count Total {} operations\n",
                op.as_str(),
                op.as_str()
            ));
            output.push_str(&format!(
                "# TYPE cuckoo_operation_{}_count counter\n",
                op.as_str()
            ));
            output.push_str(&format!(
                "cuckoo_operation_{}_count {}\n",
                op.as_str(),
                self.count(op)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let mut stats = OperationStats::new();
        stats.record(OperationType::Insert);
        stats.record(OperationType::Insert);
        stats.record_n(OperationType::Kick, 5);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.insert_count, 2);
        assert_eq!(snapshot.count(OperationType::Kick), 5);
        assert_eq!(snapshot.kicks_per_insert(), 2.5);

        stats.reset();
        assert_eq!(stats.snapshot(), OperationStatsSnapshot::default());
    }

    #[test]
    fn test_export_prometheus() {
        let mut stats = OperationStats::new();
        stats.record(OperationType::Resize);
        let metrics = stats.snapshot().export_prometheus();
        assert!(metrics.contains("cuckoo_operation_resize_count 1\n"));
        assert!(metrics.contains("cuckoo_operation_insert_count 0\n"));
        assert!(metrics.contains("# TYPE cuckoo_operation_kick_count counter"));
    }
}
