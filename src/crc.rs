//! CRC32-C helpers for block trailers.
//!
//! Stored checksums are masked. Computing the CRC of a string that itself
//! contains embedded CRCs is problematic, so the raw value is rotated and
//! offset before it is written.

const MASK_DELTA: u32 = 0xa282_ead8;

/// CRC32-C of `data`.
pub fn value(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Extend `crc`, the CRC32-C of some prefix, to also cover `data`.
pub fn extend(crc: u32, data: &[u8]) -> u32 {
    crc32c::crc32c_append(crc, data)
}

/// Return the masked representation of `crc`.
pub fn mask(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Return the crc whose masked representation is `masked`.
pub fn unmask(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}
