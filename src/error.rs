//! 统一错误处理 - 构造与扩容可能发生的错误

/// 布谷鸟哈希表可能发生的错误
///
/// 踢出链耗尽不属于错误：插入会自动扩容并透明恢复。
/// 重复插入和删除不存在的键也不是错误，通过返回的 `bool` 报告。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CuckooError {
    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },

    #[error("内存分配失败 (大小: {size}, 对齐: {align})")]
    AllocationFailed {
        size: usize,
        align: usize,
    },

    #[error("容量溢出: log_size={log_size} 超出上限")]
    CapacityOverflow {
        log_size: u32,
    },
}

impl CuckooError {
    /// 构造无效配置错误
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig { .. } => Some("检查配置参数"),
            Self::AllocationFailed { .. } => Some("检查系统内存或减小表大小"),
            Self::CapacityOverflow { .. } => Some("拆分数据到多个表"),
        }
    }

    /// 判断错误是否可恢复
    ///
    /// 配置错误可以修正后重试；内存耗尽和容量溢出不可恢复。
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::AllocationFailed { .. } | Self::CapacityOverflow { .. }
        )
    }
}
