//! Abstract read-only chain storage.
use bitcoin::hash_types::BlockHash;

use crate::block::{BlockRef, Height};

/// Read-only access to block headers, keyed by hash or height.
///
/// "Not found" is a normal answer for every lookup: callers are expected
/// to degrade gracefully rather than treat a missing entry as a fault.
/// The store's own locking and read-isolation discipline is outside this
/// contract.
pub trait ChainStore {
    /// Check whether a block hash is known.
    fn contains(&self, hash: &BlockHash) -> bool;
    /// Get a block by hash.
    fn get_block(&self, hash: &BlockHash) -> Option<&BlockRef>;
    /// Get the hash of the block at the given height.
    fn get_block_hash(&self, height: Height) -> Option<BlockHash>;
}
