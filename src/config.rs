//! Configuration options for the table builder.

use crate::comparator::{BytewiseComparator, Comparator};
use crate::error::{Error, Result};
use crate::filter::{BloomFilterPolicy, FilterPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Default block size (4KB)
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Default number of entries between restart points in a data block
pub const DEFAULT_BLOCK_RESTART_INTERVAL: usize = 16;

/// Options controlling how a table is built.
#[derive(Clone)]
pub struct Options {
    /// Approximate size of uncompressed user data packed per block.
    /// Default: 4KB
    pub block_size: usize,

    /// Number of keys between restart points for delta encoding of keys.
    /// Index blocks always use 1.
    /// Default: 16
    pub block_restart_interval: usize,

    /// Compression algorithm for blocks.
    /// Default: CompressionType::Snappy
    pub compression: CompressionType,

    /// Ordering of keys in the table.
    /// Default: BytewiseComparator
    pub comparator: Arc<dyn Comparator>,

    /// Policy used to build a filter block. `None` writes no filter block.
    /// Default: None
    pub filter_policy: Option<Arc<dyn FilterPolicy>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            block_restart_interval: DEFAULT_BLOCK_RESTART_INTERVAL,
            compression: CompressionType::Snappy,
            comparator: Arc::new(BytewiseComparator),
            filter_policy: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("block_size", &self.block_size)
            .field("block_restart_interval", &self.block_restart_interval)
            .field("compression", &self.compression)
            .field("comparator", &self.comparator.name())
            .field("filter_policy", &self.filter_policy.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl Options {
    /// Creates a new Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size.
    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Sets the data block restart interval.
    pub fn block_restart_interval(mut self, interval: usize) -> Self {
        self.block_restart_interval = interval;
        self
    }

    /// Sets the compression algorithm.
    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the key comparator.
    pub fn comparator(mut self, comparator: Arc<dyn Comparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Sets the filter policy.
    pub fn filter_policy(mut self, policy: Arc<dyn FilterPolicy>) -> Self {
        self.filter_policy = Some(policy);
        self
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::invalid_argument("block_size must be > 0"));
        }
        if self.block_restart_interval == 0 {
            return Err(Error::invalid_argument("block_restart_interval must be > 0"));
        }
        Ok(())
    }
}

/// Compression algorithms a block may be stored with.
///
/// The discriminant is the tag byte written in every block trailer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CompressionType {
    /// No compression.
    None = 0,

    /// Snappy compression (fast, moderate compression ratio).
    /// Falls back to `None` per block when the `snappy` feature is disabled.
    #[default]
    Snappy = 1,
}

impl CompressionType {
    /// Convert from the trailer tag byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Snappy),
            _ => None,
        }
    }
}

/// Plain-data table configuration, loadable from JSON.
///
/// ```json
/// { "block_size": 8192, "compression": "none", "bloom_bits_per_key": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// See [`Options::block_size`].
    pub block_size: usize,
    /// See [`Options::block_restart_interval`].
    pub block_restart_interval: usize,
    /// See [`Options::compression`].
    pub compression: CompressionType,
    /// Bits per key for a bloom filter; absent means no filter.
    pub bloom_bits_per_key: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            block_restart_interval: DEFAULT_BLOCK_RESTART_INTERVAL,
            compression: CompressionType::default(),
            bloom_bits_per_key: None,
        }
    }
}

impl TableConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build validated `Options` with the bytewise comparator.
    pub fn into_options(self) -> Result<Options> {
        let mut options = Options::new()
            .block_size(self.block_size)
            .block_restart_interval(self.block_restart_interval)
            .compression(self.compression);
        if let Some(bits_per_key) = self.bloom_bits_per_key {
            options = options.filter_policy(Arc::new(BloomFilterPolicy::new(bits_per_key)));
        }
        options.validate()?;
        Ok(options)
    }
}
