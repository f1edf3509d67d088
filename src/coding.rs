//! Integer encodings shared by the block, handle and filter formats.
//!
//! Fixed-width integers are little-endian. Varints use 7 bits per byte with
//! the high bit set on every byte except the last.

use bytes::BufMut;

/// Maximum encoded length of a varint64.
pub const MAX_VARINT64_LENGTH: usize = 10;

/// Append a little-endian u32.
pub fn put_fixed32<B: BufMut>(dst: &mut B, value: u32) {
    dst.put_u32_le(value);
}

/// Decode a little-endian u32 from the first four bytes of `src`.
///
/// Panics if `src` is shorter than four bytes.
pub fn decode_fixed32(src: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&src[..4]);
    u32::from_le_bytes(buf)
}

/// Append a varint-encoded u32.
pub fn put_varint32<B: BufMut>(dst: &mut B, value: u32) {
    put_varint64(dst, u64::from(value));
}

/// Append a varint-encoded u64.
pub fn put_varint64<B: BufMut>(dst: &mut B, mut value: u64) {
    while value >= 0x80 {
        dst.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

/// Decode a varint u64 from the front of `src`.
///
/// Returns the value and the number of bytes consumed, or `None` if the input
/// is truncated or longer than ten bytes.
pub fn get_varint64(src: &[u8]) -> Option<(u64, usize)> {
    let mut result = 0u64;
    for (i, &byte) in src.iter().take(MAX_VARINT64_LENGTH).enumerate() {
        let shift = 7 * i as u32;
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Some((result, i + 1));
        }
    }
    None
}

/// Decode a varint u32 from the front of `src`.
pub fn get_varint32(src: &[u8]) -> Option<(u32, usize)> {
    let (value, len) = get_varint64(src)?;
    if len > 5 || value > u64::from(u32::MAX) {
        return None;
    }
    Some((value as u32, len))
}
