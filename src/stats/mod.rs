//! 统计模块 - 容量、占用和操作计数

pub mod memory;
pub mod operation;

pub use memory::MemoryStatsSnapshot;
pub use operation::{OperationStats, OperationStatsSnapshot};

/// 哈希表统计快照
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// 存活键数量
    pub len: usize,
    /// 单表容量
    pub capacity: usize,
    /// 容量指数
    pub log_size: u32,
    /// 当前踢出链上限
    pub max_kicks: usize,
    /// 负载因子
    pub load_factor: f64,
    /// 哈希策略名称
    pub hasher: &'static str,
    pub memory: MemoryStatsSnapshot,
    pub operations: OperationStatsSnapshot,
}

impl TableStats {
    /// 两张子表的槽位总数
    pub fn total_slots(&self) -> usize {
        self.capacity * 2
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP cuckoo_table_len Live keys\n");
        output.push_str("# TYPE cuckoo_table_len gauge\n");
        output.push_str(&format!("cuckoo_table_len {}\n", self.len));

        output.push_str("# HELP cuckoo_table_capacity Slots per table\n");
        output.push_str("# TYPE cuckoo_table_capacity gauge\n");
        output.push_str(&format!("cuckoo_table_capacity {}\n", self.capacity));

        output.push_str("# HELP cuckoo_table_log_size Capacity exponent\n");
        output.push_str("# TYPE cuckoo_table_log_size gauge\n");
        output.push_str(&format!("cuckoo_table_log_size {}\n", self.log_size));

        output.push_str("# HELP cuckoo_table_load_factor Occupied fraction of all slots\n");
        output.push_str("# TYPE cuckoo_table_load_factor gauge\n");
        output.push_str(&format!(
            "cuckoo_table_load_factor {:.4}\n",
            self.load_factor
        ));

        output.push_str(&self.operations.export_prometheus());
        output.push_str(&self.memory.export_prometheus());
        output
    }
}
