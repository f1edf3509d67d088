//! Block framing: every block is written as its payload followed by a
//! five-byte trailer.
//!
//! ```text
//! [payload: n bytes]
//! [compression type: u8]
//! [masked crc32c of payload ++ type: fixed32]
//! ```

use crate::coding::decode_fixed32;
use crate::config::CompressionType;
use crate::crc;
use crate::env::WritableFile;
use crate::error::{Error, Result};
use crate::sstable::footer::{BlockHandle, Footer};
use crate::sstable::BLOCK_TRAILER_SIZE;

/// The trailer that follows every block payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTrailer {
    /// Raw compression tag byte
    pub compression: u8,
    /// Masked CRC32-C over the payload and the tag
    pub masked_crc: u32,
}

impl BlockTrailer {
    /// Compute the trailer for `payload` stored with `compression`.
    pub fn for_payload(payload: &[u8], compression: CompressionType) -> Self {
        let tag = compression as u8;
        Self { compression: tag, masked_crc: crc::mask(checksum(payload, tag)) }
    }

    /// Encode to the on-disk trailer bytes.
    pub fn encode(&self) -> [u8; BLOCK_TRAILER_SIZE] {
        let mut buf = [0u8; BLOCK_TRAILER_SIZE];
        buf[0] = self.compression;
        buf[1..].copy_from_slice(&self.masked_crc.to_le_bytes());
        buf
    }

    /// Decode a trailer from exactly `BLOCK_TRAILER_SIZE` bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != BLOCK_TRAILER_SIZE {
            return Err(Error::corruption(format!(
                "block trailer size mismatch: expected {}, got {}",
                BLOCK_TRAILER_SIZE,
                data.len()
            )));
        }
        Ok(Self { compression: data[0], masked_crc: decode_fixed32(&data[1..]) })
    }

    /// The compression type named by the tag, if it is a known one.
    pub fn compression_type(&self) -> Option<CompressionType> {
        CompressionType::from_u8(self.compression)
    }

    /// Check that `payload` matches this trailer.
    pub fn verify(&self, payload: &[u8]) -> Result<()> {
        let expected = crc::unmask(self.masked_crc);
        let actual = checksum(payload, self.compression);
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }
        Ok(())
    }
}

/// CRC32-C over the payload, extended to cover the compression tag.
fn checksum(payload: &[u8], tag: u8) -> u32 {
    crc::extend(crc::value(payload), &[tag])
}

/// BlockWriter appends framed blocks to a sink and owns the running file
/// offset.
///
/// The offset only advances when an append fully succeeds, so after an error
/// it still counts the bytes of every complete block written so far.
pub struct BlockWriter<'a, W: WritableFile + ?Sized> {
    sink: &'a mut W,
    offset: u64,
}

impl<'a, W: WritableFile + ?Sized> BlockWriter<'a, W> {
    /// Create a writer whose first block lands at offset 0.
    pub fn new(sink: &'a mut W) -> Self {
        Self { sink, offset: 0 }
    }

    /// Bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Append `payload` and its trailer, returning the handle of the block.
    pub fn write_raw_block(
        &mut self,
        payload: &[u8],
        compression: CompressionType,
    ) -> Result<BlockHandle> {
        let handle = BlockHandle::new(self.offset, payload.len() as u64);

        self.sink.append(payload)?;
        let trailer = BlockTrailer::for_payload(payload, compression);
        self.sink.append(&trailer.encode())?;

        self.offset += payload.len() as u64 + BLOCK_TRAILER_SIZE as u64;
        Ok(handle)
    }

    /// Append the encoded footer.
    pub fn write_footer(&mut self, footer: &Footer) -> Result<()> {
        let encoded = footer.encode();
        self.sink.append(&encoded)?;
        self.offset += encoded.len() as u64;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }
}
