//! Chain storage backends.
use std::collections::HashMap;

use peercore_common::block::store::ChainStore;
use peercore_common::block::{BlockHash, BlockRef, Height};

/// In-memory block store.
///
/// Blocks are indexed by hash and by height. Used by the offline
/// verification tooling, and as a model store in tests.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    blocks: HashMap<BlockHash, BlockRef>,
    heights: Vec<Option<BlockHash>>,
}

impl Memory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block under its hash. Blocks may arrive in any order;
    /// the by-height index grows as needed.
    pub fn insert(&mut self, hash: BlockHash, block: BlockRef) {
        let height = block.height as usize;
        if self.heights.len() <= height {
            self.heights.resize(height + 1, None);
        }
        self.heights[height] = Some(hash);
        self.blocks.insert(hash, block);
    }

    /// Return the number of blocks in the store.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl ChainStore for Memory {
    fn contains(&self, hash: &BlockHash) -> bool {
        self.blocks.contains_key(hash)
    }

    fn get_block(&self, hash: &BlockHash) -> Option<&BlockRef> {
        self.blocks.get(hash)
    }

    fn get_block_hash(&self, height: Height) -> Option<BlockHash> {
        self.heights.get(height as usize).copied().flatten()
    }
}
