// Test-only helpers for inspecting finished tables.
#![allow(dead_code)]

use sstable_writer::coding::{decode_fixed32, get_varint32};
use sstable_writer::sstable::{
    BlockHandle, BlockTrailer, CompressionType, Footer, BLOCK_TRAILER_SIZE, FOOTER_SIZE,
};

pub type Entry = (Vec<u8>, Vec<u8>);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn footer(file: &[u8]) -> Footer {
    assert!(file.len() >= FOOTER_SIZE, "file shorter than a footer");
    Footer::decode(&file[file.len() - FOOTER_SIZE..]).unwrap()
}

/// Trailer of the block at `handle`, after checking its checksum.
pub fn trailer(file: &[u8], handle: BlockHandle) -> BlockTrailer {
    let start = handle.offset as usize;
    let end = start + handle.size as usize;
    let trailer = BlockTrailer::decode(&file[end..end + BLOCK_TRAILER_SIZE]).unwrap();
    trailer.verify(&file[start..end]).unwrap();
    trailer
}

/// Verified and decompressed contents of the block at `handle`.
pub fn read_block(file: &[u8], handle: BlockHandle) -> Vec<u8> {
    let start = handle.offset as usize;
    let payload = &file[start..start + handle.size as usize];
    match trailer(file, handle).compression_type() {
        Some(CompressionType::None) => payload.to_vec(),
        #[cfg(feature = "snappy")]
        Some(CompressionType::Snappy) => snap::raw::Decoder::new().decompress_vec(payload).unwrap(),
        other => panic!("unexpected compression type {:?}", other),
    }
}

/// Decode every entry of a block.
pub fn block_entries(block: &[u8]) -> Vec<Entry> {
    let num_restarts = decode_fixed32(&block[block.len() - 4..]) as usize;
    let limit = block.len() - 4 - 4 * num_restarts;

    let mut entries = Vec::new();
    let mut key: Vec<u8> = Vec::new();
    let mut pos = 0;
    while pos < limit {
        let (shared, n) = get_varint32(&block[pos..]).unwrap();
        pos += n;
        let (unshared, n) = get_varint32(&block[pos..]).unwrap();
        pos += n;
        let (value_len, n) = get_varint32(&block[pos..]).unwrap();
        pos += n;

        key.truncate(shared as usize);
        key.extend_from_slice(&block[pos..pos + unshared as usize]);
        pos += unshared as usize;
        let value = block[pos..pos + value_len as usize].to_vec();
        pos += value_len as usize;
        entries.push((key.clone(), value));
    }
    assert_eq!(pos, limit, "block entries overran the restart array");
    entries
}

/// Number of restart points recorded in a block.
pub fn num_restarts(block: &[u8]) -> usize {
    decode_fixed32(&block[block.len() - 4..]) as usize
}

fn decode_handle(value: &[u8]) -> BlockHandle {
    let (handle, n) = BlockHandle::decode_from(value).unwrap();
    assert_eq!(n, value.len(), "trailing bytes after block handle");
    handle
}

/// (separator key, data block handle) pairs of the index block.
pub fn index_entries(file: &[u8]) -> Vec<(Vec<u8>, BlockHandle)> {
    let block = read_block(file, footer(file).index_handle);
    block_entries(&block).into_iter().map(|(k, v)| (k, decode_handle(&v))).collect()
}

/// (name, handle) pairs of the metaindex block.
pub fn meta_index_entries(file: &[u8]) -> Vec<(String, BlockHandle)> {
    let block = read_block(file, footer(file).meta_index_handle);
    block_entries(&block)
        .into_iter()
        .map(|(k, v)| (String::from_utf8(k).unwrap(), decode_handle(&v)))
        .collect()
}

/// Entries of each data block, in file order.
pub fn data_blocks(file: &[u8]) -> Vec<Vec<Entry>> {
    index_entries(file)
        .into_iter()
        .map(|(_, handle)| block_entries(&read_block(file, handle)))
        .collect()
}

/// Every key/value pair in the table, in order.
pub fn all_entries(file: &[u8]) -> Vec<Entry> {
    data_blocks(file).into_iter().flatten().collect()
}

/// Filter number `index` inside a filter block.
pub fn filter_at(block: &[u8], index: usize) -> &[u8] {
    let n = block.len();
    let array_offset = decode_fixed32(&block[n - 5..]) as usize;
    let num_filters = (n - 5 - array_offset) / 4;
    assert!(index < num_filters, "filter index out of range");
    let start = decode_fixed32(&block[array_offset + index * 4..]) as usize;
    let limit = if index + 1 < num_filters {
        decode_fixed32(&block[array_offset + (index + 1) * 4..]) as usize
    } else {
        array_offset
    };
    &block[start..limit]
}

/// Assert the index keys separate adjacent data blocks.
pub fn assert_index_separates_blocks(file: &[u8]) {
    let index = index_entries(file);
    let blocks = data_blocks(file);
    assert_eq!(index.len(), blocks.len());

    for (i, (separator, _)) in index.iter().enumerate() {
        let last_key = &blocks[i].last().expect("data blocks are never empty").0;
        assert!(separator >= last_key, "separator {:?} below block {} last key", separator, i);
        if let Some(next) = blocks.get(i + 1) {
            assert!(separator < &next[0].0, "separator {:?} not below block {}", separator, i + 1);
        }
    }
}
