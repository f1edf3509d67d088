//! Filter policies and the filter block builder.
//!
//! A filter summarizes the keys of a range of data blocks so a reader can
//! skip blocks that definitely do not contain a key.

pub mod block;
pub mod bloom;

pub use block::FilterBlockBuilder;
pub use bloom::BloomFilterPolicy;

/// A policy for building compact per-block key filters.
pub trait FilterPolicy: Send + Sync {
    /// Name of the policy. It is stored in the metaindex block as
    /// `"filter." + name`, so changing the encoding requires a new name.
    fn name(&self) -> &str;

    /// Append a filter summarizing `keys` to `dst`.
    fn create_filter(&self, keys: &[&[u8]], dst: &mut Vec<u8>);

    /// Check a key against a filter produced by `create_filter`.
    ///
    /// Must return true for every key the filter was built from. May return
    /// true for other keys too, but should do so rarely.
    fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool;
}
