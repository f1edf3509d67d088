//! Per-block compression selection.

use crate::config::CompressionType;
use std::borrow::Cow;

/// Compress `raw` with `requested`, or fall back to storing it raw.
///
/// The compressed form is kept only when it saves more than 12.5% of the raw
/// size. If the algorithm is not compiled in or the encoder fails, the block
/// is stored raw as well. The returned tag always describes the returned bytes.
pub fn compress_block(raw: &[u8], requested: CompressionType) -> (Cow<'_, [u8]>, CompressionType) {
    match requested {
        CompressionType::None => (Cow::Borrowed(raw), CompressionType::None),
        CompressionType::Snappy => match snappy_compress(raw) {
            Some(compressed) if worth_keeping(raw.len(), compressed.len()) => {
                (Cow::Owned(compressed), CompressionType::Snappy)
            }
            _ => (Cow::Borrowed(raw), CompressionType::None),
        },
    }
}

/// True if `compressed_len` is below 87.5% of `raw_len`.
fn worth_keeping(raw_len: usize, compressed_len: usize) -> bool {
    compressed_len < raw_len - raw_len / 8
}

#[cfg(feature = "snappy")]
fn snappy_compress(raw: &[u8]) -> Option<Vec<u8>> {
    match snap::raw::Encoder::new().compress_vec(raw) {
        Ok(compressed) => Some(compressed),
        Err(e) => {
            log::debug!("Snappy compression failed, storing block raw: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "snappy"))]
fn snappy_compress(_raw: &[u8]) -> Option<Vec<u8>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        rand::rng().fill(&mut data[..]);
        data
    }

    #[test]
    fn test_no_compression_is_passthrough() {
        let raw = vec![b'a'; 1000];
        let (out, tag) = compress_block(&raw, CompressionType::None);
        assert_eq!(tag, CompressionType::None);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), raw.as_slice());
    }

    #[test]
    fn test_incompressible_data_falls_back() {
        let raw = random_bytes(4096);
        let (out, tag) = compress_block(&raw, CompressionType::Snappy);
        assert_eq!(tag, CompressionType::None);
        assert_eq!(out.as_ref(), raw.as_slice());
    }

    #[test]
    fn test_empty_block_falls_back() {
        let (out, tag) = compress_block(&[], CompressionType::Snappy);
        assert_eq!(tag, CompressionType::None);
        assert!(out.is_empty());
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn test_compressible_data_is_compressed() {
        let raw = b"abcdefgh".repeat(512);
        let (out, tag) = compress_block(&raw, CompressionType::Snappy);
        assert_eq!(tag, CompressionType::Snappy);
        assert!(out.len() < raw.len() - raw.len() / 8);

        let decompressed = snap::raw::Decoder::new().decompress_vec(&out).unwrap();
        assert_eq!(decompressed, raw);
    }

    #[cfg(not(feature = "snappy"))]
    #[test]
    fn test_unsupported_algorithm_falls_back() {
        let raw = b"abcdefgh".repeat(512);
        let (out, tag) = compress_block(&raw, CompressionType::Snappy);
        assert_eq!(tag, CompressionType::None);
        assert_eq!(out.as_ref(), raw.as_slice());
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!worth_keeping(800, 700));
        assert!(worth_keeping(800, 699));
        assert!(!worth_keeping(0, 0));
    }
}
