//! 布谷鸟哈希表集成测试

use cuckoo_table::{
    batch_contains, batch_insert, log_info, CuckooError, CuckooMap, CuckooTable,
    CuckooTableConfig, HashAlgorithm, DEFAULT_LOG_SIZE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use test_log::test;

const SEED: u64 = 42;
const ITEM_COUNT: usize = 100_000;
const KEY_SIZE: usize = 16;

/// 生成互不相同的随机键，保持生成顺序
fn generate_keys(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key: u64 = rng.gen();
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys
}

/// 生成随机字节键
fn generate_byte_keys(count: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count)
        .map(|_| {
            let mut key = vec![0u8; KEY_SIZE];
            rng.fill(&mut key[..]);
            key
        })
        .collect()
}

/// 容纳 `count` 个键所需的最小容量指数
fn log_size_for(count: usize) -> u32 {
    count.next_power_of_two().trailing_zeros().max(1)
}

#[test]
fn test_round_trip() {
    let keys = generate_keys(ITEM_COUNT);
    let mut table = CuckooTable::new(log_size_for(ITEM_COUNT));

    for &key in &keys {
        assert!(table.insert(key));
    }
    assert_eq!(table.len(), ITEM_COUNT);

    for (index, key) in keys.iter().enumerate() {
        assert!(table.contains(key), "第 {} 个键 {} 丢失", index, key);
    }
    table.check_invariants().unwrap();
    log_info!("round trip stats: {:?}", table.stats());
}

#[test]
fn test_idempotent_insert() {
    let keys = generate_keys(1_000);
    let mut table = CuckooTable::new(4);
    for &key in &keys {
        let before = table.len();
        assert!(table.insert(key));
        assert!(!table.insert(key));
        assert_eq!(table.len(), before + 1);
    }
}

#[test]
fn test_zero_key_repeated() {
    let mut table = CuckooTable::new(4);
    for _ in 0..10 {
        table.insert(0u64);
        assert!(table.contains(&0));
        assert_eq!(table.len(), 1);
    }
}

#[test]
fn test_delete() {
    let keys = generate_keys(10_000);
    let mut table: CuckooTable<u64> = keys.iter().copied().collect();

    for (index, key) in keys.iter().enumerate() {
        assert!(table.remove(key));
        assert!(!table.contains(key));
        assert!(!table.remove(key));
        assert_eq!(table.len(), keys.len() - index - 1);
    }
    assert!(table.is_empty());
}

#[test]
fn test_delete_absent() {
    let keys = generate_keys(2_000);
    let (present, absent) = keys.split_at(1_000);
    let mut table: CuckooTable<u64> = present.iter().copied().collect();

    for key in absent {
        assert!(!table.remove(key));
        assert_eq!(table.len(), present.len());
    }
    assert!(present.iter().all(|key| table.contains(key)));
}

#[test]
fn test_matches_reference_set() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut table = CuckooTable::new(2);
    let mut reference = HashSet::new();

    for _ in 0..50_000 {
        let key: u32 = rng.gen_range(0..2_000);
        if rng.gen_bool(0.6) {
            assert_eq!(table.insert(key), reference.insert(key));
        } else {
            assert_eq!(table.remove(&key), reference.remove(&key));
        }
        assert_eq!(table.len(), reference.len());
    }

    for key in 0..2_000u32 {
        assert_eq!(table.contains(&key), reference.contains(&key));
    }
    table.check_invariants().unwrap();
}

#[test]
fn test_load_factor_bounds() {
    for count in [10, 1_000, 50_000] {
        let keys = generate_keys(count);
        let mut table = CuckooTable::new(log_size_for(count));
        assert_eq!(table.load_factor(), 0.0);

        for &key in &keys {
            assert!(table.insert(key));
            let load_factor = table.load_factor();
            assert!(load_factor > 0.0 && load_factor < 1.0);
        }
        assert_eq!(table.len(), count);
        assert!(keys.iter().all(|key| table.contains(key)));
    }
}

#[test]
fn test_bulk_delete_in_insertion_order() {
    let count = 2_000_000;
    let keys = generate_keys(count);
    let mut table = CuckooTable::new(DEFAULT_LOG_SIZE);
    for &key in &keys {
        table.insert(key);
    }
    assert_eq!(table.len(), count);

    let deleted = count / 100 * 95;
    for (index, key) in keys[..deleted].iter().enumerate() {
        assert!(table.remove(key));
        assert_eq!(table.len(), count - index - 1);
    }

    assert!(keys[..deleted].iter().all(|key| !table.contains(key)));
    assert!(keys[deleted..].iter().all(|key| table.contains(key)));
    table.check_invariants().unwrap();
}

#[test]
fn test_byte_keys() {
    let keys = generate_byte_keys(20_000);
    let mut table = CuckooTable::new(8);
    let inserted = batch_insert(&mut table, keys.iter().cloned());
    let distinct: HashSet<&Vec<u8>> = keys.iter().collect();
    assert_eq!(inserted, distinct.len());
    assert!(batch_contains(&table, &keys).into_iter().all(|found| found));
    assert!(table.contains(&keys[0][..]));
}

#[test]
fn test_every_algorithm_and_rotation() {
    let keys = generate_keys(20_000);
    for algorithm in [
        HashAlgorithm::AHash,
        HashAlgorithm::XxHash,
        HashAlgorithm::SplitMix,
        HashAlgorithm::Default,
    ] {
        for rotate in [false, true] {
            let config = CuckooTableConfig {
                log_size: 2,
                hash_algorithm: algorithm,
                rotate_seeds_on_resize: rotate,
                ..CuckooTableConfig::default()
            };
            let mut table = CuckooTable::with_config(config).unwrap();
            table.extend(keys.iter().copied());
            assert_eq!(table.len(), keys.len(), "{} rotate={}", algorithm, rotate);
            assert!(keys.iter().all(|key| table.contains(key)));
            table.check_invariants().unwrap();
        }
    }
}

#[test]
fn test_invalid_config() {
    let err = CuckooTable::<u64>::with_config(CuckooTableConfig {
        primary_seed: 1,
        secondary_seed: 1,
        ..CuckooTableConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, CuckooError::InvalidConfig { .. }));
    assert!(err.is_recoverable());
    assert!(err.recovery_suggestion().is_some());
}

#[test]
fn test_map() {
    let keys = generate_keys(10_000);
    let mut map = CuckooMap::new(4);
    for (index, &key) in keys.iter().enumerate() {
        assert_eq!(map.insert(key, index), None);
    }
    for (index, key) in keys.iter().enumerate() {
        assert_eq!(map.get(key), Some(&index));
    }
    for key in &keys[..5_000] {
        assert!(map.remove(key).is_some());
    }
    assert_eq!(map.len(), 5_000);
    assert!(keys[..5_000].iter().all(|key| !map.contains_key(key)));
    map.check_invariants().unwrap();
}

#[test]
fn test_stats_and_monitoring() {
    let keys = generate_keys(ITEM_COUNT);
    let mut table = CuckooTable::new(4);
    for &key in &keys {
        table.insert(key);
    }
    table.insert(keys[0]);
    table.remove(&keys[1]);
    table.remove(&keys[1]);

    let stats = table.stats();
    assert_eq!(stats.len, ITEM_COUNT - 1);
    assert_eq!(stats.operations.insert_count, ITEM_COUNT as u64);
    assert_eq!(stats.operations.duplicate_insert_count, 1);
    assert_eq!(stats.operations.remove_count, 1);
    assert_eq!(stats.operations.missed_remove_count, 1);
    assert!(stats.operations.resize_count > 0);
    assert_eq!(stats.log_size, table.log_size());
    assert_eq!(stats.memory.occupied_slots, stats.len);

    let metrics = table.export_prometheus();
    assert!(metrics.contains("cuckoo_operation_insert_count"));
    assert!(metrics.contains("cuckoo_memory_slot_bytes"));
    assert!(metrics.contains("cuckoo_table_load_factor"));
}
