//! Bloom filter policy.
//!
//! A space-efficient probabilistic data structure used to test whether an element
//! is a member of a set. False positive matches are possible, but false negatives are not.
//! The encoding matches LevelDB's built-in bloom filter so the filters are
//! readable by existing readers.

use crate::coding::decode_fixed32;
use crate::filter::FilterPolicy;

/// Default bits per key for bloom filter
pub const DEFAULT_BITS_PER_KEY: usize = 10;

const HASH_SEED: u32 = 0xbc9f_1d34;

/// BloomFilterPolicy builds one bloom filter per filter range.
///
/// # Example
/// ```
/// use sstable_writer::filter::{BloomFilterPolicy, FilterPolicy};
///
/// let policy = BloomFilterPolicy::new(10);
/// let mut filter = Vec::new();
/// policy.create_filter(&[b"key1".as_slice(), b"key2".as_slice()], &mut filter);
///
/// assert!(policy.key_may_match(b"key1", &filter));
/// assert!(policy.key_may_match(b"key2", &filter));
/// // key3 might return true (false positive) or false
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilterPolicy {
    bits_per_key: usize,
    /// Number of hash functions to use
    num_hashes: usize,
}

impl BloomFilterPolicy {
    /// Create a policy using `bits_per_key` bits of filter per key.
    ///
    /// 10 bits per key yields a false positive rate of roughly 1%.
    pub fn new(bits_per_key: usize) -> Self {
        // 0.69 is approximately ln(2), which minimizes the false positive rate.
        let num_hashes = ((bits_per_key as f64) * 0.69) as usize;
        Self { bits_per_key, num_hashes: num_hashes.clamp(1, 30) }
    }

    /// Get the number of hash functions used.
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }
}

impl Default for BloomFilterPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BITS_PER_KEY)
    }
}

impl FilterPolicy for BloomFilterPolicy {
    fn name(&self) -> &str {
        "leveldb.BuiltinBloomFilter2"
    }

    fn create_filter(&self, keys: &[&[u8]], dst: &mut Vec<u8>) {
        // A tiny filter would have a very high false positive rate.
        let bits = (keys.len() * self.bits_per_key).max(64);
        let bytes = (bits + 7) / 8;
        let bits = bytes * 8;

        let init_size = dst.len();
        dst.resize(init_size + bytes, 0);
        dst.push(self.num_hashes as u8);

        let array = &mut dst[init_size..init_size + bytes];
        for key in keys {
            // Double hashing: h_i = h + i * delta
            let mut h = bloom_hash(key);
            let delta = h.rotate_right(17);
            for _ in 0..self.num_hashes {
                let bit_pos = (h as usize) % bits;
                array[bit_pos / 8] |= 1 << (bit_pos % 8);
                h = h.wrapping_add(delta);
            }
        }
    }

    fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool {
        if filter.len() < 2 {
            return false;
        }

        let bytes = filter.len() - 1;
        let bits = bytes * 8;
        let k = filter[bytes];
        if k > 30 {
            // Reserved for potentially new encodings; treat as a match.
            return true;
        }

        let mut h = bloom_hash(key);
        let delta = h.rotate_right(17);
        for _ in 0..k {
            let bit_pos = (h as usize) % bits;
            if filter[bit_pos / 8] & (1 << (bit_pos % 8)) == 0 {
                return false;
            }
            h = h.wrapping_add(delta);
        }
        true
    }
}

fn bloom_hash(key: &[u8]) -> u32 {
    hash(key, HASH_SEED)
}

/// Murmur-style hash used by the LevelDB bloom filter.
fn hash(data: &[u8], seed: u32) -> u32 {
    const M: u32 = 0xc6a4_a793;
    const R: u32 = 24;

    let mut h = seed ^ (data.len() as u32).wrapping_mul(M);

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        h = h.wrapping_add(decode_fixed32(chunk));
        h = h.wrapping_mul(M);
        h ^= h >> 16;
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        for (i, &byte) in rest.iter().enumerate().rev() {
            h = h.wrapping_add(u32::from(byte) << (8 * i));
        }
        h = h.wrapping_mul(M);
        h ^= h >> R;
    }
    h
}
