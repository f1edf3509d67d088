//! Filter block builder.
//!
//! A filter block stores a sequence of filters, where filter `i` covers all
//! keys of the data blocks that start in file range
//! `[i * FILTER_BASE, (i + 1) * FILTER_BASE)`.
//!
//! Format:
//! ```text
//! [filter 0]
//! ...
//! [filter N-1]
//! [offset of filter 0: fixed32]
//! ...
//! [offset of filter N-1: fixed32]
//! [offset of the offset array: fixed32]
//! [base lg: u8]
//! ```

use crate::coding::put_fixed32;
use crate::filter::FilterPolicy;
use bytes::BufMut;
use std::sync::Arc;

/// log2 of the file range covered by one filter (2KB)
pub const FILTER_BASE_LG: u8 = 11;

/// File range covered by one filter
pub const FILTER_BASE: u64 = 1 << FILTER_BASE_LG;

/// FilterBlockBuilder accumulates keys and emits the filter block at the end
/// of table construction.
///
/// Calls must follow the pattern `(start_block add_key*)* finish`.
pub struct FilterBlockBuilder {
    policy: Arc<dyn FilterPolicy>,
    /// Flattened keys of the current filter range
    keys: Vec<u8>,
    /// Start offset of each key in `keys`
    starts: Vec<usize>,
    /// Filter data computed so far
    result: Vec<u8>,
    filter_offsets: Vec<u32>,
}

impl FilterBlockBuilder {
    /// Create a builder producing filters with `policy`.
    pub fn new(policy: Arc<dyn FilterPolicy>) -> Self {
        Self {
            policy,
            keys: Vec::new(),
            starts: Vec::new(),
            result: Vec::new(),
            filter_offsets: Vec::new(),
        }
    }

    /// Name of the policy the filters are built with.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Announce that a data block starting at `block_offset` follows.
    pub fn start_block(&mut self, block_offset: u64) {
        let filter_index = (block_offset / FILTER_BASE) as usize;
        assert!(
            filter_index >= self.filter_offsets.len(),
            "filter block offsets must not go backwards"
        );
        while filter_index > self.filter_offsets.len() {
            self.generate_filter();
        }
    }

    /// Add a key of the current data block.
    pub fn add_key(&mut self, key: &[u8]) {
        self.starts.push(self.keys.len());
        self.keys.extend_from_slice(key);
    }

    /// Emit any pending filter and return the finished filter block.
    pub fn finish(&mut self) -> &[u8] {
        if !self.starts.is_empty() {
            self.generate_filter();
        }

        let array_offset = self.result.len() as u32;
        for &offset in &self.filter_offsets {
            put_fixed32(&mut self.result, offset);
        }
        put_fixed32(&mut self.result, array_offset);
        self.result.put_u8(FILTER_BASE_LG);
        &self.result
    }

    fn generate_filter(&mut self) {
        self.filter_offsets.push(self.result.len() as u32);
        if self.starts.is_empty() {
            // Fast path if there are no keys for this filter.
            return;
        }

        let mut key_slices: Vec<&[u8]> = Vec::with_capacity(self.starts.len());
        for (i, &start) in self.starts.iter().enumerate() {
            let end = self.starts.get(i + 1).copied().unwrap_or(self.keys.len());
            key_slices.push(&self.keys[start..end]);
        }
        self.policy.create_filter(&key_slices, &mut self.result);

        self.keys.clear();
        self.starts.clear();
    }
}
