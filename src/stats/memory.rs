//! 内存统计 - 由容量和占用计算槽位数组的内存占用
//!
//! 表本身不做进程级内存采样；这里只给出足够外部测试工具自行换算的计数。

use std::mem;

/// 内存统计快照
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryStatsSnapshot {
    /// 单个槽位的字节数
    pub slot_size: usize,
    /// 两张子表的槽位总数
    pub total_slots: usize,
    /// 已占用槽位数
    pub occupied_slots: usize,
    /// 槽位数组占用的字节数
    pub slot_bytes: usize,
    /// 已占用槽位对应的字节数
    pub occupied_bytes: usize,
}

impl MemoryStatsSnapshot {
    /// 按槽位类型计算
    pub fn for_slots<T>(total_slots: usize, occupied_slots: usize) -> Self {
        let slot_size = mem::size_of::<T>();
        Self {
            slot_size,
            total_slots,
            occupied_slots,
            slot_bytes: slot_size.saturating_mul(total_slots),
            occupied_bytes: slot_size.saturating_mul(occupied_slots),
        }
    }

    /// 槽位利用率 (0.0-100.0)
    pub fn utilization(&self) -> f64 {
        if self.total_slots == 0 {
            0.0
        } else {
            self.occupied_slots as f64 / self.total_slots as f64 * 100.0
        }
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP cuckoo_memory_slot_bytes Slot array memory (bytes)\n");
        output.push_str("# TYPE cuckoo_memory_slot_bytes gauge\n");
        output.push_str(&format!("cuckoo_memory_slot_bytes {}\n", self.slot_bytes));

        output.push_str("# HELP cuckoo_memory_occupied_bytes Memory held by occupied slots (bytes)\n");
        output.push_str("# TYPE cuckoo_memory_occupied_bytes gauge\n");
        output.push_str(&format!(
            "cuckoo_memory_occupied_bytes {}\n",
            self.occupied_bytes
        ));

        output.push_str("# HELP cuckoo_memory_utilization Slot utilization percentage\n");
        output.push_str("# TYPE cuckoo_memory_utilization gauge\n");
        output.push_str(&format!(
            "cuckoo_memory_utilization {:.2}\n",
            self.utilization()
        ));

        output
    }
}
