//! Block-related types and functions.
pub mod store;
pub mod target;

pub use bitcoin::hash_types::BlockHash;

/// Compact difficulty bits (target) of a block.
pub type Bits = u32;

/// Height of a block.
pub type Height = u64;

/// Block time (seconds since Epoch).
pub type BlockTime = u32;

/// Difficulty target of a block.
///
/// Signed, because the compact encoding carries a sign bit and the
/// retarget arithmetic is defined over signed integers.
pub type Target = num_bigint::BigInt;

/// A read-only view of a stored block header, as seen by the retarget
/// engine.
///
/// Block references are handed out by a [`store::ChainStore`]; the core
/// never owns or mutates chain storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    /// Height of the block in the chain.
    pub height: Height,
    /// Header timestamp.
    pub time: BlockTime,
    /// Compact difficulty target of the header.
    pub bits: Bits,
    /// Hash of the previous block.
    pub prev_blockhash: BlockHash,
    /// Whether this block is proof-of-stake, as opposed to proof-of-work.
    pub proof_of_stake: bool,
}
