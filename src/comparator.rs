//! Key ordering used by the table builder.

use std::cmp::Ordering;

/// A total order over keys, plus the key-shortening hooks the index block
/// uses to keep separator keys small.
pub trait Comparator: Send + Sync {
    /// Name of the comparator. Tables built with one comparator must not be
    /// read with another, so the name is what callers check.
    fn name(&self) -> &str;

    /// Three-way comparison of `a` and `b`.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// If `start < limit`, change `start` into a short key in `[start, limit)`.
    ///
    /// Leaving `start` unchanged is always correct.
    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: &[u8]);

    /// Change `key` into a short key that is `>= key`.
    ///
    /// Leaving `key` unchanged is always correct.
    fn find_short_successor(&self, key: &mut Vec<u8>);
}

/// Lexicographic byte-wise ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn name(&self) -> &str {
        "leveldb.BytewiseComparator"
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: &[u8]) {
        let min_len = start.len().min(limit.len());
        let diff_index = start
            .iter()
            .zip(limit.iter())
            .position(|(a, b)| a != b)
            .unwrap_or(min_len);

        if diff_index >= min_len {
            // One key is a prefix of the other.
            return;
        }

        let diff_byte = start[diff_index];
        if diff_byte < 0xff && diff_byte + 1 < limit[diff_index] {
            start[diff_index] += 1;
            start.truncate(diff_index + 1);
            debug_assert_eq!(self.compare(start, limit), Ordering::Less);
        }
    }

    fn find_short_successor(&self, key: &mut Vec<u8>) {
        if let Some(pos) = key.iter().position(|&b| b != 0xff) {
            key[pos] += 1;
            key.truncate(pos + 1);
        }
        // An all-0xff key is its own successor.
    }
}
