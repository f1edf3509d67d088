//! Block builder for data, index and metaindex blocks.
//!
//! Keys are prefix-compressed against the previous key. Every
//! `restart_interval` entries the compression restarts and the entry offset is
//! recorded, so a reader can binary search the restart array.

use crate::coding::{put_fixed32, put_varint32};
use bytes::{BufMut, BytesMut};

/// BlockBuilder accumulates sorted key/value pairs into a block.
///
/// Format:
/// ```text
/// [Entry 1]
/// [Entry 2]
/// ...
/// [Entry N]
/// [Restart Point 1: fixed32]
/// ...
/// [Restart Point M: fixed32]
/// [Num Restarts: fixed32]
/// ```
///
/// Each entry format:
/// ```text
/// [shared_key_len: varint32]     // Length of shared prefix with previous key
/// [unshared_key_len: varint32]   // Length of unshared key suffix
/// [value_len: varint32]          // Length of value
/// [unshared_key: bytes]          // Key suffix
/// [value: bytes]                 // Value data
/// ```
#[derive(Debug)]
pub struct BlockBuilder {
    buffer: BytesMut,
    restarts: Vec<u32>,
    counter: usize,
    last_key: Vec<u8>,
    block_restart_interval: usize,
    finished: bool,
}

impl BlockBuilder {
    /// Create a new BlockBuilder
    pub fn new(block_restart_interval: usize) -> Self {
        assert!(block_restart_interval >= 1, "restart interval must be at least 1");
        Self {
            buffer: BytesMut::new(),
            // First restart point at offset 0
            restarts: vec![0],
            counter: 0,
            last_key: Vec::new(),
            block_restart_interval,
            finished: false,
        }
    }

    /// Change the restart interval used for entries added from now on.
    pub fn set_restart_interval(&mut self, block_restart_interval: usize) {
        assert!(block_restart_interval >= 1, "restart interval must be at least 1");
        self.block_restart_interval = block_restart_interval;
    }

    /// Add a key-value pair to the block.
    ///
    /// The caller is responsible for adding keys in increasing order.
    pub fn add(&mut self, key: &[u8], value: &[u8]) {
        assert!(!self.finished, "add called on a finished block");

        let mut shared = 0;
        if self.counter >= self.block_restart_interval {
            self.restarts.push(self.buffer.len() as u32);
            self.counter = 0;
        } else {
            shared = shared_prefix_len(&self.last_key, key);
        }
        let unshared = key.len() - shared;

        put_varint32(&mut self.buffer, shared as u32);
        put_varint32(&mut self.buffer, unshared as u32);
        put_varint32(&mut self.buffer, value.len() as u32);
        self.buffer.put_slice(&key[shared..]);
        self.buffer.put_slice(value);

        self.last_key.truncate(shared);
        self.last_key.extend_from_slice(&key[shared..]);
        debug_assert_eq!(self.last_key.as_slice(), key);
        self.counter += 1;
    }

    /// Append the restart array and return the finished block contents.
    ///
    /// The returned slice stays valid until `reset` is called.
    pub fn finish(&mut self) -> &[u8] {
        if !self.finished {
            for &restart in &self.restarts {
                put_fixed32(&mut self.buffer, restart);
            }
            put_fixed32(&mut self.buffer, self.restarts.len() as u32);
            self.finished = true;
        }
        &self.buffer
    }

    /// Clear the builder so it can be reused for a new block.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.restarts.clear();
        self.restarts.push(0);
        self.counter = 0;
        self.last_key.clear();
        self.finished = false;
    }

    /// Estimate of the size of the block `finish` would produce.
    pub fn current_size_estimate(&self) -> usize {
        self.buffer.len() + self.restarts.len() * 4 + 4
    }

    /// Check if no entries have been added since the last reset.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn shared_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
