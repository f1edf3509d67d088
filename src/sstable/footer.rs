//! Block handles and the table footer.
//!
//! The footer is a fixed-size (48 bytes) structure at the end of a table file.
//! It holds the handles of the metaindex and index blocks, which is all a
//! reader needs to bootstrap everything else.

use crate::coding::{decode_fixed32, get_varint64, put_fixed32, put_varint64};
use crate::error::{Error, Result};
use crate::sstable::{FOOTER_SIZE, MAGIC_NUMBER};

/// BlockHandle points at a block in the table file.
///
/// `size` covers the block payload only, not the five-byte trailer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHandle {
    /// Offset of the block in the file
    pub offset: u64,
    /// Size of the block payload in bytes
    pub size: u64,
}

impl BlockHandle {
    /// Maximum encoding length of a BlockHandle (two varint64s)
    pub const MAX_ENCODED_LENGTH: usize = 10 + 10;

    /// Create a new BlockHandle
    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Append the varint encoding of this handle to `dst`.
    pub fn encode_to(&self, dst: &mut Vec<u8>) {
        put_varint64(dst, self.offset);
        put_varint64(dst, self.size);
    }

    /// Encode the handle into a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::MAX_ENCODED_LENGTH);
        self.encode_to(&mut buf);
        buf
    }

    /// Decode a handle from the front of `data`, returning it together with
    /// the number of bytes consumed.
    pub fn decode_from(data: &[u8]) -> Result<(Self, usize)> {
        let (offset, n1) =
            get_varint64(data).ok_or_else(|| Error::corruption("bad block handle"))?;
        let (size, n2) =
            get_varint64(&data[n1..]).ok_or_else(|| Error::corruption("bad block handle"))?;
        Ok((Self { offset, size }, n1 + n2))
    }
}

/// Footer is the last 48 bytes of a table file.
///
/// Format:
/// ```text
/// [meta_index_handle: varint64 x2]
/// [index_handle: varint64 x2]
/// [padding: zeros up to 40 bytes]
/// [magic: 8 bytes]
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Footer {
    /// Handle to the meta index block
    pub meta_index_handle: BlockHandle,
    /// Handle to the index block
    pub index_handle: BlockHandle,
}

impl Footer {
    /// Create a new Footer
    pub fn new(meta_index_handle: BlockHandle, index_handle: BlockHandle) -> Self {
        Self { meta_index_handle, index_handle }
    }

    /// Encode the footer to exactly `FOOTER_SIZE` bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FOOTER_SIZE);
        self.meta_index_handle.encode_to(&mut buf);
        self.index_handle.encode_to(&mut buf);
        buf.resize(2 * BlockHandle::MAX_ENCODED_LENGTH, 0);
        put_fixed32(&mut buf, (MAGIC_NUMBER & 0xffff_ffff) as u32);
        put_fixed32(&mut buf, (MAGIC_NUMBER >> 32) as u32);
        debug_assert_eq!(buf.len(), FOOTER_SIZE);
        buf
    }

    /// Decode a footer from the last `FOOTER_SIZE` bytes of a table.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != FOOTER_SIZE {
            return Err(Error::corruption(format!(
                "Footer size mismatch: expected {}, got {}",
                FOOTER_SIZE,
                data.len()
            )));
        }

        let magic_offset = FOOTER_SIZE - 8;
        let magic_lo = u64::from(decode_fixed32(&data[magic_offset..]));
        let magic_hi = u64::from(decode_fixed32(&data[magic_offset + 4..]));
        let magic = (magic_hi << 32) | magic_lo;
        if magic != MAGIC_NUMBER {
            return Err(Error::corruption(format!(
                "not an sstable (bad magic number): expected {:#x}, got {:#x}",
                MAGIC_NUMBER, magic
            )));
        }

        let (meta_index_handle, n) = BlockHandle::decode_from(&data[..magic_offset])?;
        let (index_handle, _) = BlockHandle::decode_from(&data[n..magic_offset])?;
        Ok(Self { meta_index_handle, index_handle })
    }
}
