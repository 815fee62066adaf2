//! 哈希表核心模块 - 布谷鸟哈希集合、映射及其组件

pub mod config;
pub mod cuckoo_map;
pub mod cuckoo_table;
pub(crate) mod raw;
pub mod slot;

pub use config::CuckooTableConfig;
pub use cuckoo_map::CuckooMap;
pub use cuckoo_table::{CuckooTable, Iter};
pub use slot::Slot;

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<CuckooTableConfig> = Lazy::new(CuckooTableConfig::default);
