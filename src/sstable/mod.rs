//! Sorted table construction.
//!
//! A table is an immutable, sorted file of key-value pairs. The format is
//! compatible with LevelDB's `.ldb` files.
//!
//! ## File Format
//!
//! ```text
//! [Data Block 1]
//! [Data Block 2]
//! ...
//! [Data Block N]
//! [Filter Block]      // optional, never compressed
//! [Meta Index Block]  // "filter.<policy name>" -> filter block handle
//! [Index Block]       // separator key -> data block handle
//! [Footer: 48B]       // points to the meta index and index blocks
//! ```
//!
//! ## Block Format
//!
//! Each block is followed by a 5-byte trailer:
//! - Compression type (1 byte)
//! - Masked CRC32-C of the block contents and the compression type (4 bytes)
//!
//! ## Index Format
//!
//! The index block contains one entry per data block:
//! - Key: A short separator that is >= every key in the block and < every
//!   key in the next block
//! - Value: The varint-encoded handle (offset, size) of the block

pub mod block;
pub mod builder;
pub mod compression;
pub mod footer;
pub mod frame;

pub use block::BlockBuilder;
pub use builder::{TableBuilder, FILTER_META_PREFIX};
pub use compression::compress_block;
pub use footer::{BlockHandle, Footer};
pub use frame::{BlockTrailer, BlockWriter};

// Re-export CompressionType from config
pub use crate::config::CompressionType;

/// Footer size in bytes (fixed)
pub const FOOTER_SIZE: usize = 2 * BlockHandle::MAX_ENCODED_LENGTH + 8;

/// Size of the trailer following every block: compression type and crc
pub const BLOCK_TRAILER_SIZE: usize = 5;

/// Magic number closing every table file
pub const MAGIC_NUMBER: u64 = 0xdb47_7524_8b80_fb57;
