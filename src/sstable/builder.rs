//! Table builder implementation.
//!
//! Builds a table file from a sequence of sorted key-value pairs. Blocks are
//! written to the sink as soon as they fill up, so memory use is bounded by
//! one data block, the index block and the filter data.

use crate::config::{CompressionType, Options};
use crate::env::WritableFile;
use crate::error::{Error, Result};
use crate::filter::FilterBlockBuilder;
use crate::sstable::block::BlockBuilder;
use crate::sstable::compression::compress_block;
use crate::sstable::footer::{BlockHandle, Footer};
use crate::sstable::frame::BlockWriter;
use std::cmp::Ordering;

/// Prefix of the metaindex key that locates the filter block.
pub const FILTER_META_PREFIX: &str = "filter.";

/// TableBuilder builds a table into a borrowed sink.
///
/// The builder is single use: it must be closed with exactly one call to
/// [`finish`](Self::finish) or [`abandon`](Self::abandon) before it is
/// dropped. Adding keys out of order, using the builder after it was closed,
/// or dropping it while still open are programming errors and panic.
///
/// I/O failures are not fatal. The first one is latched, every later
/// operation becomes a no-op, and the same error is returned from
/// `add`, `flush`, `finish` and `status`.
///
/// Usage:
/// ```no_run
/// use sstable_writer::env::FileSink;
/// use sstable_writer::sstable::TableBuilder;
/// use sstable_writer::Options;
///
/// # fn main() -> Result<(), sstable_writer::Error> {
/// let mut file = FileSink::create("000005.ldb")?;
/// let mut builder = TableBuilder::new(Options::default(), &mut file)?;
/// builder.add(b"key1", b"value1")?;
/// builder.add(b"key2", b"value2")?;
/// builder.finish()?;
/// drop(builder);
/// # use sstable_writer::env::WritableFile;
/// file.sync()?;
/// # Ok(())
/// # }
/// ```
pub struct TableBuilder<'a, W: WritableFile + ?Sized> {
    options: Options,
    writer: BlockWriter<'a, W>,
    status: Result<()>,
    data_block: BlockBuilder,
    index_block: BlockBuilder,
    last_key: Vec<u8>,
    num_entries: u64,
    /// Either finish() or abandon() has been called.
    closed: bool,
    filter_block: Option<FilterBlockBuilder>,

    // The index entry for a block is not emitted until the first key of the
    // next block is seen. That allows a shorter key in the index: between
    // "the quick brown fox" and "the who" the index can use "the r", which
    // is >= every key of the first block and < every key of the next.
    //
    // Invariant: pending_handle is Some only while data_block is empty.
    pending_handle: Option<BlockHandle>,
}

impl<'a, W: WritableFile + ?Sized> TableBuilder<'a, W> {
    /// Create a builder that writes a table into `sink`.
    ///
    /// The sink is borrowed, not owned; syncing and closing it after
    /// `finish` is the caller's responsibility.
    pub fn new(options: Options, sink: &'a mut W) -> Result<Self> {
        options.validate()?;

        let mut filter_block = options.filter_policy.clone().map(FilterBlockBuilder::new);
        if let Some(filter) = filter_block.as_mut() {
            filter.start_block(0);
        }

        Ok(Self {
            data_block: BlockBuilder::new(options.block_restart_interval),
            // Every index entry is a restart point.
            index_block: BlockBuilder::new(1),
            options,
            writer: BlockWriter::new(sink),
            status: Ok(()),
            last_key: Vec::new(),
            num_entries: 0,
            closed: false,
            filter_block,
            pending_handle: None,
        })
    }

    /// Change the options used by this builder.
    ///
    /// Only options that can safely change mid-table are accepted. Changing
    /// the comparator or the filter policy is rejected with
    /// `Error::InvalidArgument` and leaves the builder untouched.
    pub fn change_options(&mut self, options: Options) -> Result<()> {
        assert!(!self.closed, "change_options called after the table was closed");
        options.validate()?;

        if options.comparator.name() != self.options.comparator.name() {
            return Err(Error::invalid_argument("changing comparator while building table"));
        }
        let current_filter = self.options.filter_policy.as_ref().map(|p| p.name());
        let new_filter = options.filter_policy.as_ref().map(|p| p.name());
        if current_filter != new_filter {
            return Err(Error::invalid_argument("changing filter policy while building table"));
        }

        self.data_block.set_restart_interval(options.block_restart_interval);
        self.options = options;
        Ok(())
    }

    /// Add a key-value pair to the table.
    ///
    /// Keys must be strictly increasing under the configured comparator.
    /// Returns the latched status.
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        assert!(!self.closed, "add called after the table was closed");
        if self.num_entries > 0 {
            assert!(
                self.options.comparator.compare(key, &self.last_key) == Ordering::Greater,
                "keys must be added in strictly increasing order"
            );
        }
        if !self.ok() {
            return self.status();
        }

        if let Some(handle) = self.pending_handle.take() {
            assert!(self.data_block.is_empty(), "pending index entry with a non-empty data block");
            self.options.comparator.find_shortest_separator(&mut self.last_key, key);
            self.index_block.add(&self.last_key, &handle.encode());
        }

        if let Some(filter) = self.filter_block.as_mut() {
            filter.add_key(key);
        }

        self.last_key.clear();
        self.last_key.extend_from_slice(key);
        self.num_entries += 1;
        self.data_block.add(key, value);

        if self.data_block.current_size_estimate() >= self.options.block_size {
            return self.flush();
        }
        self.status()
    }

    /// Write the buffered data block, if any, to the sink.
    ///
    /// Normally blocks are flushed automatically once they reach the block
    /// size; calling this forces a block boundary. Returns the latched status.
    pub fn flush(&mut self) -> Result<()> {
        assert!(!self.closed, "flush called after the table was closed");
        if !self.ok() || self.data_block.is_empty() {
            return self.status();
        }
        assert!(self.pending_handle.is_none(), "flush with an unresolved index entry");

        let result =
            Self::write_block(&mut self.writer, &mut self.data_block, self.options.compression);
        if let Some(handle) = self.latch(result) {
            log::trace!("Flushed data block at offset {} ({} bytes)", handle.offset, handle.size);
            self.pending_handle = Some(handle);
            let flushed = self.writer.flush();
            self.latch(flushed);
        }

        if let Some(filter) = self.filter_block.as_mut() {
            filter.start_block(self.writer.offset());
        }
        self.status()
    }

    /// Finish building the table.
    ///
    /// Writes any buffered data, then the filter, metaindex and index blocks,
    /// and finally the footer. Stops at the first error and returns it.
    pub fn finish(&mut self) -> Result<()> {
        let _ = self.flush();
        self.closed = true;

        // Filter bytes are stored uncompressed so readers can address
        // individual filters inside the block.
        let filter_handle = if self.ok() {
            let result = self
                .filter_block
                .as_mut()
                .map(|filter| self.writer.write_raw_block(filter.finish(), CompressionType::None));
            match result {
                Some(result) => self.latch(result),
                None => None,
            }
        } else {
            None
        };

        let mut meta_index_handle = BlockHandle::default();
        if self.ok() {
            let mut meta_index_block = BlockBuilder::new(self.options.block_restart_interval);
            if let (Some(filter), Some(handle)) = (self.filter_block.as_ref(), filter_handle) {
                let key = format!("{}{}", FILTER_META_PREFIX, filter.policy_name());
                meta_index_block.add(key.as_bytes(), &handle.encode());
            }
            let result = Self::write_block(
                &mut self.writer,
                &mut meta_index_block,
                self.options.compression,
            );
            if let Some(handle) = self.latch(result) {
                meta_index_handle = handle;
            }
        }

        let mut index_handle = BlockHandle::default();
        if self.ok() {
            if let Some(handle) = self.pending_handle.take() {
                self.options.comparator.find_short_successor(&mut self.last_key);
                self.index_block.add(&self.last_key, &handle.encode());
            }
            let result =
                Self::write_block(&mut self.writer, &mut self.index_block, self.options.compression);
            if let Some(handle) = self.latch(result) {
                index_handle = handle;
            }
        }

        if self.ok() {
            let footer = Footer::new(meta_index_handle, index_handle);
            let result = self.writer.write_footer(&footer);
            self.latch(result);
        }

        if self.ok() {
            log::debug!(
                "Finished table: {} entries, {} bytes",
                self.num_entries,
                self.writer.offset()
            );
        }
        self.status()
    }

    /// Close the builder without writing anything further.
    ///
    /// Bytes already appended stay in the sink; deleting a partial file is
    /// up to the caller.
    pub fn abandon(&mut self) {
        assert!(!self.closed, "abandon called after the table was closed");
        self.closed = true;
        log::debug!(
            "Abandoned table after {} entries, {} bytes written",
            self.num_entries,
            self.writer.offset()
        );
    }

    /// The latched status: `Ok` or the first error encountered.
    pub fn status(&self) -> Result<()> {
        self.status.clone()
    }

    /// Number of key-value pairs added so far.
    pub fn num_entries(&self) -> u64 {
        self.num_entries
    }

    /// Size of the file generated so far. After a successful `finish` this is
    /// the size of the final file.
    pub fn file_size(&self) -> u64 {
        self.writer.offset()
    }

    /// Whether `finish` or `abandon` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Record `result` in the status if it is the first error.
    fn latch<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if self.status.is_ok() {
                    log::warn!("Table construction failed at offset {}: {}", self.writer.offset(), e);
                    self.status = Err(e);
                }
                None
            }
        }
    }

    /// Finish `block`, compress it, frame it into the sink and reset it.
    fn write_block(
        writer: &mut BlockWriter<'a, W>,
        block: &mut BlockBuilder,
        compression: CompressionType,
    ) -> Result<BlockHandle> {
        let result = {
            let raw = block.finish();
            let (contents, compression) = compress_block(raw, compression);
            writer.write_raw_block(&contents, compression)
        };
        block.reset();
        result
    }
}

impl<'a, W: WritableFile + ?Sized> Drop for TableBuilder<'a, W> {
    fn drop(&mut self) {
        // Don't turn an unwinding panic into an abort.
        if !std::thread::panicking() {
            assert!(self.closed, "TableBuilder dropped without calling finish() or abandon()");
        }
    }
}
