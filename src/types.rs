//! 核心类型定义 - 容量常量、子表标识和操作类型

/// 默认容量指数：每张子表 2^10 = 1024 个槽位
pub const DEFAULT_LOG_SIZE: u32 = 10;

/// 最小容量指数
pub const MIN_LOG_SIZE: u32 = 1;

/// 最大容量指数，保证 `2 * 2^log_size` 不溢出 `usize`
pub const MAX_LOG_SIZE: u32 = usize::BITS - 2;

/// 踢出上限的下界
pub const MIN_KICKS: usize = 32;

/// 每个容量指数对应的踢出次数
pub const KICKS_PER_LOG: usize = 16;

/// 根据容量指数计算踢出链上限
///
/// 上限与 `log_size` 成正比，保证单次插入尝试总能终止。
pub fn max_kicks_for(log_size: u32) -> usize {
    (KICKS_PER_LOG * log_size as usize).max(MIN_KICKS)
}

/// 容量指数对应的单表容量
pub const fn capacity_for(log_size: u32) -> usize {
    1usize << log_size
}

/// 子表标识
///
/// 每个键在表 A 和表 B 中各有一个候选槽位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    A,
    B,
}

impl TableId {
    /// 两张子表，按插入时的探测顺序排列
    pub const BOTH: [TableId; 2] = [TableId::A, TableId::B];

    /// 数组下标
    pub const fn index(self) -> usize {
        match self {
            TableId::A => 0,
            TableId::B => 1,
        }
    }

    /// 另一张子表
    pub const fn other(self) -> Self {
        match self {
            TableId::A => TableId::B,
            TableId::B => TableId::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableId::A => "A",
            TableId::B => "B",
        }
    }
}

/// 统计用操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 新键插入
    Insert,
    /// 重复插入（无操作）
    DuplicateInsert,
    /// 成功删除
    Remove,
    /// 删除不存在的键
    MissedRemove,
    /// 单次踢出
    Kick,
    /// 踢出链耗尽
    ChainExhausted,
    /// 扩容
    Resize,
    /// 扩容过程中的重建尝试
    RehashAttempt,
}

impl OperationType {
    /// 全部操作类型，按导出顺序排列
    pub const ALL: [OperationType; 8] = [
        OperationType::Insert,
        OperationType::DuplicateInsert,
        OperationType::Remove,
        OperationType::MissedRemove,
        OperationType::Kick,
        OperationType::ChainExhausted,
        OperationType::Resize,
        OperationType::RehashAttempt,
    ];

    /// 判断是否改变了表内容
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            OperationType::Insert
                | OperationType::Remove
                | OperationType::Kick
                | OperationType::Resize
                | OperationType::RehashAttempt
        )
    }

    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::DuplicateInsert => "duplicate_insert",
            OperationType::Remove => "remove",
            OperationType::MissedRemove => "missed_remove",
            OperationType::Kick => "kick",
            OperationType::ChainExhausted => "chain_exhausted",
            OperationType::Resize => "resize",
            OperationType::RehashAttempt => "rehash_attempt",
        }
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_kicks_scales_with_log_size() {
        assert_eq!(max_kicks_for(1), MIN_KICKS);
        assert_eq!(max_kicks_for(21), 21 * KICKS_PER_LOG);
        assert!(max_kicks_for(20) < max_kicks_for(21));
    }

    #[test]
    fn test_capacity_is_power_of_two() {
        for log_size in MIN_LOG_SIZE..20 {
            assert!(capacity_for(log_size).is_power_of_two());
        }
        assert_eq!(capacity_for(DEFAULT_LOG_SIZE), 1024);
        assert!(capacity_for(MAX_LOG_SIZE).checked_mul(2).is_some());
    }

    #[test]
    fn test_table_id() {
        assert_eq!(TableId::A.other(), TableId::B);
        assert_eq!(TableId::B.other().index(), 0);
        assert_eq!(TableId::BOTH.map(TableId::index), [0, 1]);
    }

    #[test]
    fn test_operation_names_unique() {
        let mut names: Vec<_> = OperationType::ALL.iter().map(|op| op.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OperationType::ALL.len());
        assert!(!OperationType::DuplicateInsert.is_write());
    }
}
