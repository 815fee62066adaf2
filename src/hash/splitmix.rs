//! SplitMix64 混合函数及基于它的 `Hasher`

use std::hash::Hasher;

/// SplitMix64 单步混合
#[inline]
pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 以 SplitMix64 为压缩函数的带种子哈希器
///
/// 每写入 8 字节混合一次状态，整数写入走快速路径。
#[derive(Debug, Clone)]
pub struct SplitMixHasher {
    state: u64,
}

impl SplitMixHasher {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: splitmix64(seed),
        }
    }

    #[inline]
    fn mix(&mut self, word: u64) {
        self.state = splitmix64(self.state ^ word);
    }
}

impl Default for SplitMixHasher {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Hasher for SplitMixHasher {
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(8);
        for chunk in &mut chunks {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            self.mix(u64::from_le_bytes(word));
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut word = [0u8; 8];
            word[..tail.len()].copy_from_slice(tail);
            // 尾部长度写入最高字节，区分 "a" 与 "a\0"
            self.mix(u64::from_le_bytes(word) ^ ((tail.len() as u64) << 56));
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.mix(i as u64);
    }

    fn write_u16(&mut self, i: u16) {
        self.mix(i as u64);
    }

    fn write_u32(&mut self, i: u32) {
        self.mix(i as u64);
    }

    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }

    fn finish(&self) -> u64 {
        splitmix64(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hash;

    fn hash_with<T: Hash + ?Sized>(seed: u64, value: &T) -> u64 {
        let mut hasher = SplitMixHasher::with_seed(seed);
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_splitmix_known_values() {
        // 参考实现从状态 0 开始的第一个输出
        assert_eq!(splitmix64(0), 0xE220_A839_7B1D_CDAF);
        assert_ne!(splitmix64(1), splitmix64(2));
    }

    #[test]
    fn test_seed_changes_output() {
        assert_ne!(hash_with(1, &42u64), hash_with(2, &42u64));
        assert_eq!(hash_with(7, "key"), hash_with(7, "key"));
    }

    #[test]
    fn test_tail_length_is_mixed() {
        let mut a = SplitMixHasher::with_seed(3);
        a.write(b"a");
        let mut b = SplitMixHasher::with_seed(3);
        b.write(b"a\0");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_low_bits_spread() {
        // 连续整数的低位应均匀分布到各个桶
        let mut buckets = [0usize; 16];
        for key in 0u64..16_000 {
            buckets[(hash_with(11, &key) & 15) as usize] += 1;
        }
        assert!(buckets.iter().all(|&n| n > 800 && n < 1200), "{:?}", buckets);
    }
}
