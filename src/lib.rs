//! # sstable-writer - Sorted String Table Writer
//!
//! Writes the immutable, sorted table files used by a log-structured
//! key-value storage engine. The on-disk format is compatible with LevelDB.
//!
//! ## Architecture
//!
//! The writer consists of several small components:
//!
//! - **Table Builder**: State machine turning sorted pairs into a table file
//! - **Block Builder**: Prefix-compressed key/value blocks with restart points
//! - **Block Writer**: Frames blocks with a compression tag and masked CRC32-C
//! - **Compression**: Per-block Snappy compression with raw fallback
//! - **Filter Block**: Bloom filters letting readers skip data blocks
//! - **Footer**: Fixed-size trailer locating the index and metaindex blocks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sstable_writer::env::{FileSink, WritableFile};
//! use sstable_writer::filter::BloomFilterPolicy;
//! use sstable_writer::sstable::TableBuilder;
//! use sstable_writer::Options;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), sstable_writer::Error> {
//! let options = Options::default().filter_policy(Arc::new(BloomFilterPolicy::new(10)));
//! let mut file = FileSink::create("000007.ldb")?;
//!
//! let mut builder = TableBuilder::new(options, &mut file)?;
//! builder.add(b"apple", b"red")?;
//! builder.add(b"banana", b"yellow")?;
//! builder.finish()?;
//! println!("wrote {} entries in {} bytes", builder.num_entries(), builder.file_size());
//! drop(builder);
//!
//! file.sync()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod coding;
pub mod comparator;
pub mod config;
pub mod crc;
pub mod env;
pub mod error;
pub mod filter;
pub mod sstable;

// Re-exports
pub use comparator::{BytewiseComparator, Comparator};
pub use config::{CompressionType, Options, TableConfig};
pub use error::{Error, Result};
pub use sstable::TableBuilder;
